use serde::{Deserialize, Serialize};

use super::Location;
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Contact {
    /// Row id assigned by the store. Zero until the contact is created.
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub notes: String,
    pub location: Option<Location>,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            phone_number: phone_number.into(),
            notes: notes.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[inline]
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|l| l.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|l| l.longitude)
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Set both coordinates at once. If either is absent the contact has no location.
    pub fn set_coordinates(&mut self, latitude: Option<f64>, longitude: Option<f64>) {
        self.location = Location::from_parts(latitude, longitude);
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    /// Caller-side checks before a record is handed to the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "Please enter a name"));
        }
        if let Some(loc) = self.location {
            Location::new(loc.latitude, loc.longitude)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.phone_number.is_empty() {
            write!(f, " ({})", self.phone_number)?;
        }
        Ok(())
    }
}

/// Join an optional dialling prefix and a local number, e.g. `+49` and `170 1234567`.
pub fn format_phone(country_code: Option<&str>, number: &str) -> String {
    let number = number.trim();
    let code = country_code.map(str::trim).unwrap_or("");
    if code.is_empty() || number.is_empty() || number.starts_with('+') {
        return number.to_string();
    }

    let code = code.trim_start_matches('+');
    let local = number.trim_start_matches('0');
    format!("+{} {}", code, local)
}
