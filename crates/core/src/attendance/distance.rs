//! Great-circle distance between two coordinates.

use super::location::Coordinates;

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between `(lat1, lon1)` and `(lat2, lon2)`.
///
/// Inputs are decimal degrees. The result is symmetric and exactly `0.0` for
/// identical points.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two validated coordinate pairs.
pub fn distance_between(a: &Coordinates, b: &Coordinates) -> f64 {
    distance_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    const POINTS: &[(f64, f64)] = &[
        (0.0, 0.0),
        (19.0760, 72.8777),
        (28.6139, 77.2090),
        (-33.8688, 151.2093),
        (90.0, 0.0),
        (-90.0, 180.0),
        (51.5074, -0.1278),
    ];

    #[test]
    fn same_point_is_zero() {
        for &(lat, lon) in POINTS {
            assert_eq!(distance_km(lat, lon, lat, lon), 0.0, "({lat}, {lon})");
        }
    }

    #[test]
    fn distance_is_symmetric() {
        for &(lat1, lon1) in POINTS {
            for &(lat2, lon2) in POINTS {
                let ab = distance_km(lat1, lon1, lat2, lon2);
                let ba = distance_km(lat2, lon2, lat1, lon1);
                assert!((ab - ba).abs() < EPSILON, "{ab} != {ba}");
            }
        }
    }

    #[test]
    fn mumbai_to_delhi_is_about_1148_km() {
        let d = distance_km(19.0760, 72.8777, 28.6139, 77.2090);
        assert!((d - 1148.09).abs() < 0.5, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn quarter_turn_along_equator_is_quarter_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 90.0);
        assert!((d - std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn distance_between_matches_raw_coordinates() {
        let mumbai = Coordinates {
            latitude: 19.0760,
            longitude: 72.8777,
        };
        let delhi = Coordinates {
            latitude: 28.6139,
            longitude: 77.2090,
        };
        assert_eq!(
            distance_between(&mumbai, &delhi),
            distance_km(19.0760, 72.8777, 28.6139, 77.2090)
        );
        assert_eq!(distance_between(&delhi, &delhi), 0.0);
    }
}
