//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::TimeZone;
use fieldcrm_api::error::AppError;
use fieldcrm_core::attendance::location::{LocationSnapshot, CAPTURE_GPS, VALIDATION_UNVERIFIED};
use fieldcrm_core::attendance::{AttendanceError, DutySession, SessionStatus};
use fieldcrm_core::error::CoreError;
use fieldcrm_db::models::attendance::TransitionError;
use http_body_util::BodyExt;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn active_session() -> DutySession {
    let start = chrono::Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
    DutySession {
        start_time: start,
        start_location: LocationSnapshot {
            latitude: 19.076,
            longitude: 72.8777,
            address: "Andheri Office".to_string(),
            city: None,
            state: None,
            pincode: None,
            address_components: None,
            capture_method: CAPTURE_GPS.to_string(),
            confidence: 0.8,
            validation_status: VALIDATION_UNVERIFIED.to_string(),
            timestamp: start,
        },
        end_time: None,
        end_location: None,
        duration: None,
        status: SessionStatus::Active,
    }
}

// ---------------------------------------------------------------------------
// CoreError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "DailyAttendance",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "DailyAttendance with id 42 not found");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("not yours".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Missing Authorization header".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

// ---------------------------------------------------------------------------
// AttendanceError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attendance_validation_returns_400() {
    let err = AppError::from(AttendanceError::Validation(
        "latitude must be between -90 and 90".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "latitude must be between -90 and 90");
}

#[tokio::test]
async fn active_session_conflict_carries_the_open_session() {
    let err = AppError::from(AttendanceError::ActiveSessionExists {
        session: Box::new(active_session()),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "ACTIVE_SESSION_EXISTS");
    assert_eq!(
        json["details"]["activeSession"]["startTime"],
        "2026-03-02T09:00:00Z"
    );
    assert_eq!(
        json["details"]["activeSession"]["startLocation"]["address"],
        "Andheri Office"
    );
    assert_eq!(json["details"]["activeSession"]["status"], "active");
}

#[tokio::test]
async fn no_active_session_returns_400() {
    let err = AppError::from(TransitionError::Rejected(AttendanceError::NoActiveSession));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "NO_ACTIVE_SESSION");
}

// ---------------------------------------------------------------------------
// Infrastructure errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transition_database_error_is_sanitized() {
    let err = AppError::from(TransitionError::Database(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("connection string leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("leaked"));
}

#[tokio::test]
async fn core_validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("invalid field value".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "invalid field value");
}
