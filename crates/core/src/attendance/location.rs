//! Location capture validation.
//!
//! Turns the raw `location` object a mobile client sends with a duty toggle
//! into an immutable [`LocationSnapshot`] annotated with how it was captured
//! and how much we trust it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::AttendanceError;
use crate::types::Timestamp;

/// Capture method used when the client does not say.
pub const CAPTURE_GPS: &str = "gps";
/// Fresh GPS fix taken at the moment of the toggle.
pub const CAPTURE_GPS_CURRENT: &str = "gps_current";
/// User dropped a pin on the map.
pub const CAPTURE_MANUAL_MAP_SELECTION: &str = "manual_map_selection";
/// User picked a result from an address search.
pub const CAPTURE_MANUAL_SEARCH: &str = "manual_search";

pub const VALIDATION_VERIFIED: &str = "verified";
pub const VALIDATION_UNVERIFIED: &str = "unverified";

/// Confidence assigned to capture methods without a specific rating.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Structured address parts, usually filled by the client's geocoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressComponents {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Raw location object as posted by the client.
///
/// Every field is optional at the wire level so that a missing coordinate is
/// reported as a validation error rather than a body deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub address_components: Option<AddressComponents>,
    pub capture_method: Option<String>,
    /// RFC 3339 capture time reported by the device.
    pub timestamp: Option<String>,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

/// Validated, enriched location attached to a duty session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub address_components: Option<AddressComponents>,
    pub capture_method: String,
    pub confidence: f64,
    pub validation_status: String,
    pub timestamp: Timestamp,
}

/// Check that a coordinate pair is finite and within WGS84 bounds.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<Coordinates, AttendanceError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(AttendanceError::Validation(
            "latitude and longitude must be finite numbers".to_string(),
        ));
    }
    let coords = Coordinates {
        latitude,
        longitude,
    };
    coords
        .validate()
        .map_err(|e| AttendanceError::Validation(describe_errors(&e)))?;
    Ok(coords)
}

/// Confidence score for a capture method.
pub fn confidence_for(capture_method: &str) -> f64 {
    match capture_method {
        CAPTURE_MANUAL_MAP_SELECTION => 0.9,
        CAPTURE_GPS_CURRENT => 0.95,
        CAPTURE_MANUAL_SEARCH => 0.7,
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Validation status for a capture method. Only map pins count as verified.
pub fn validation_status_for(capture_method: &str) -> &'static str {
    if capture_method == CAPTURE_MANUAL_MAP_SELECTION {
        VALIDATION_VERIFIED
    } else {
        VALIDATION_UNVERIFIED
    }
}

/// Validate a raw payload into a [`LocationSnapshot`].
///
/// `now` becomes the snapshot timestamp when the device did not report one.
pub fn validate_location(
    payload: &LocationPayload,
    now: Timestamp,
) -> Result<LocationSnapshot, AttendanceError> {
    let (Some(latitude), Some(longitude)) = (payload.latitude, payload.longitude) else {
        return Err(AttendanceError::Validation(
            "location latitude and longitude are required".to_string(),
        ));
    };
    let coords = validate_coordinates(latitude, longitude)?;

    let components = payload.address_components.as_ref();

    let address = non_blank(payload.address.as_deref())
        .map(str::to_string)
        .or_else(|| components.and_then(compose_address))
        .ok_or_else(|| AttendanceError::Validation("location address is required".to_string()))?;

    let capture_method = non_blank(payload.capture_method.as_deref())
        .unwrap_or(CAPTURE_GPS)
        .to_string();

    let timestamp = match non_blank(payload.timestamp.as_deref()) {
        Some(raw) => chrono::DateTime::parse_from_rfc3339(raw)
            .map_err(|_| {
                AttendanceError::Validation(format!(
                    "location timestamp '{raw}' is not a valid ISO 8601 date-time"
                ))
            })?
            .with_timezone(&chrono::Utc),
        None => now,
    };

    let pick = |top: &Option<String>, nested: fn(&AddressComponents) -> &Option<String>| {
        non_blank(top.as_deref())
            .or_else(|| components.and_then(|c| non_blank(nested(c).as_deref())))
            .map(str::to_string)
    };

    Ok(LocationSnapshot {
        latitude: coords.latitude,
        longitude: coords.longitude,
        address,
        city: pick(&payload.city, |c| &c.city),
        state: pick(&payload.state, |c| &c.state),
        pincode: pick(&payload.pincode, |c| &c.pincode),
        address_components: payload.address_components.clone(),
        confidence: confidence_for(&capture_method),
        validation_status: validation_status_for(&capture_method).to_string(),
        capture_method,
        timestamp,
    })
}

/// Build a one-line address from structured parts, or `None` if all are blank.
fn compose_address(components: &AddressComponents) -> Option<String> {
    let parts: Vec<&str> = [
        &components.city,
        &components.state,
        &components.pincode,
        &components.country,
    ]
    .into_iter()
    .filter_map(|p| non_blank(p.as_deref()))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn describe_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn payload(lat: f64, lon: f64) -> LocationPayload {
        LocationPayload {
            latitude: Some(lat),
            longitude: Some(lon),
            address: Some("MG Road, Bengaluru".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_payload_defaults_to_gps() {
        let snap = validate_location(&payload(12.9716, 77.5946), now()).unwrap();
        assert_eq!(snap.capture_method, CAPTURE_GPS);
        assert_eq!(snap.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(snap.validation_status, VALIDATION_UNVERIFIED);
        assert_eq!(snap.timestamp, now());
        assert_eq!(snap.address, "MG Road, Bengaluru");
    }

    #[test]
    fn missing_coordinates_are_rejected() {
        let mut p = payload(0.0, 0.0);
        p.latitude = None;
        assert_matches!(
            validate_location(&p, now()),
            Err(AttendanceError::Validation(msg)) if msg.contains("required")
        );
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert_matches!(
            validate_location(&payload(90.5, 0.0), now()),
            Err(AttendanceError::Validation(msg)) if msg.contains("latitude")
        );
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert_matches!(
            validate_location(&payload(0.0, -180.01), now()),
            Err(AttendanceError::Validation(msg)) if msg.contains("longitude")
        );
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        assert!(validate_location(&payload(90.0, 180.0), now()).is_ok());
        assert!(validate_location(&payload(-90.0, -180.0), now()).is_ok());
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert_matches!(
            validate_coordinates(f64::NAN, 0.0),
            Err(AttendanceError::Validation(_))
        );
        assert_matches!(
            validate_coordinates(0.0, f64::INFINITY),
            Err(AttendanceError::Validation(_))
        );
    }

    #[test]
    fn blank_address_without_components_is_rejected() {
        let mut p = payload(1.0, 1.0);
        p.address = Some("   ".to_string());
        assert_matches!(
            validate_location(&p, now()),
            Err(AttendanceError::Validation(msg)) if msg.contains("address")
        );
    }

    #[test]
    fn address_defaults_from_components() {
        let mut p = payload(1.0, 1.0);
        p.address = None;
        p.address_components = Some(AddressComponents {
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            pincode: None,
            country: Some("India".to_string()),
        });
        let snap = validate_location(&p, now()).unwrap();
        assert_eq!(snap.address, "Pune, Maharashtra, India");
    }

    #[test]
    fn city_state_pincode_fall_back_to_components() {
        let mut p = payload(1.0, 1.0);
        p.state = Some("Karnataka".to_string());
        p.address_components = Some(AddressComponents {
            city: Some("Mysuru".to_string()),
            state: Some("ignored".to_string()),
            pincode: Some("570001".to_string()),
            country: None,
        });
        let snap = validate_location(&p, now()).unwrap();
        assert_eq!(snap.city.as_deref(), Some("Mysuru"));
        assert_eq!(snap.state.as_deref(), Some("Karnataka"));
        assert_eq!(snap.pincode.as_deref(), Some("570001"));
    }

    #[test]
    fn confidence_follows_capture_method() {
        assert_eq!(confidence_for(CAPTURE_MANUAL_MAP_SELECTION), 0.9);
        assert_eq!(confidence_for(CAPTURE_GPS_CURRENT), 0.95);
        assert_eq!(confidence_for(CAPTURE_MANUAL_SEARCH), 0.7);
        assert_eq!(confidence_for("network"), 0.8);
        assert_eq!(confidence_for(CAPTURE_GPS), 0.8);
    }

    #[test]
    fn map_selection_is_verified() {
        let mut p = payload(1.0, 1.0);
        p.capture_method = Some(CAPTURE_MANUAL_MAP_SELECTION.to_string());
        let snap = validate_location(&p, now()).unwrap();
        assert_eq!(snap.validation_status, VALIDATION_VERIFIED);
        assert_eq!(snap.confidence, 0.9);
    }

    #[test]
    fn device_timestamp_is_parsed() {
        let mut p = payload(1.0, 1.0);
        p.timestamp = Some("2026-03-02T08:59:30+05:30".to_string());
        let snap = validate_location(&p, now()).unwrap();
        assert_eq!(
            snap.timestamp,
            chrono::Utc.with_ymd_and_hms(2026, 3, 2, 3, 29, 30).unwrap()
        );
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut p = payload(1.0, 1.0);
        p.timestamp = Some("yesterday".to_string());
        assert_matches!(
            validate_location(&p, now()),
            Err(AttendanceError::Validation(msg)) if msg.contains("timestamp")
        );
    }
}
