use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A WGS84 coordinate pair. Both halves are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting coordinates outside their valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude) {
            return Err(ValidationError::new(
                "latitude",
                "Latitude must be between -90 and 90",
            ));
        }
        if !(LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude) {
            return Err(ValidationError::new(
                "longitude",
                "Longitude must be between -180 and 180",
            ));
        }
        Ok(Self { latitude, longitude })
    }

    /// Pair up two independently optional coordinates. Missing either one means no location.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }

    /// Parse user-entered coordinate text.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, ValidationError> {
        let (latitude, longitude) = (latitude.trim(), longitude.trim());
        if latitude.is_empty() || longitude.is_empty() {
            return Err(ValidationError::new(
                "location",
                "Please enter both latitude and longitude",
            ));
        }

        let lat: f64 = latitude
            .parse()
            .map_err(|_| ValidationError::new("latitude", "Please enter valid coordinates"))?;
        let lon: f64 = longitude
            .parse()
            .map_err(|_| ValidationError::new("longitude", "Please enter valid coordinates"))?;

        Self::new(lat, lon)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(Location::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = Location::new(90.5, 0.0).unwrap_err();
        assert_eq!(err.field, "latitude");

        let err = Location::new(0.0, -180.01).unwrap_err();
        assert_eq!(err.field, "longitude");

        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert!(Location::from_parts(Some(1.0), None).is_none());
        assert!(Location::from_parts(None, Some(1.0)).is_none());
        assert_eq!(
            Location::from_parts(Some(48.1), Some(11.5)),
            Some(Location { latitude: 48.1, longitude: 11.5 })
        );
    }

    #[test]
    fn test_parse() {
        let loc = Location::parse(" 52.52 ", "13.405").unwrap();
        assert_eq!(loc.latitude, 52.52);
        assert_eq!(loc.longitude, 13.405);

        let err = Location::parse("52.52", "").unwrap_err();
        assert_eq!(err.message, "Please enter both latitude and longitude");

        let err = Location::parse("north", "13").unwrap_err();
        assert_eq!(err.message, "Please enter valid coordinates");

        assert!(Location::parse("95", "13").is_err());
    }

    #[test]
    fn test_display() {
        let loc = Location::new(1.5, -2.25).unwrap();
        assert_eq!(loc.to_string(), "1.500000, -2.250000");
    }
}
