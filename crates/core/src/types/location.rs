//! Geographic coordinates for store locations.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`GeoPoint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// Latitude outside the valid range.
    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    /// Longitude outside the valid range.
    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
    /// The input string is not a number.
    #[error("coordinate is not a valid number: {0}")]
    NotNumeric(String),
}

/// A latitude/longitude pair, serialized as `{lat, lng}` for the store
/// location endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90..=90.
    pub lat: f64,
    /// Longitude in degrees, -180..=180.
    pub lng: f64,
}

impl GeoPoint {
    /// Construct a `GeoPoint`, validating coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if either coordinate is outside its valid range or
    /// is not a finite number.
    pub fn new(lat: f64, lng: f64) -> Result<Self, LocationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LocationError::LatitudeOutOfRange(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(LocationError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Parse a `GeoPoint` from the string fields a coordinate form produces.
    ///
    /// # Errors
    ///
    /// Returns an error if either string is not a number, or the parsed
    /// coordinates fall outside their ranges.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, LocationError> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| LocationError::NotNumeric(lat.to_string()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| LocationError::NotNumeric(lng.to_string()))?;
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let point = GeoPoint::new(24.8607, 67.0011).expect("valid");
        assert!((point.lat - 24.8607).abs() < f64::EPSILON);
        assert!((point.lng - 67.0011).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            GeoPoint::new(91.0, 0.0).expect_err("lat"),
            LocationError::LatitudeOutOfRange(_)
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -181.0).expect_err("lng"),
            LocationError::LongitudeOutOfRange(_)
        ));
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0).expect_err("nan"),
            LocationError::LatitudeOutOfRange(_)
        ));
    }

    #[test]
    fn test_parse_from_form_strings() {
        let point = GeoPoint::parse(" 24.86 ", "67.00").expect("parse");
        assert!((point.lat - 24.86).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            GeoPoint::parse("here", "67").expect_err("text"),
            LocationError::NotNumeric(_)
        ));
    }

    #[test]
    fn test_serializes_as_lat_lng() {
        let point = GeoPoint::new(1.5, -2.5).expect("valid");
        let json = serde_json::to_value(point).expect("serialize");
        assert_eq!(json, serde_json::json!({"lat": 1.5, "lng": -2.5}));
    }
}
