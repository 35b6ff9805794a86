//! Synchronous checks on the raw city input

use crate::error::ValidationError;

/// A trimmed city name that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Checks run in order: empty, then letters, then length.
pub fn validate_query(raw: &str) -> Result<CityQuery, ValidationError> {
    let city = raw.trim();
    if city.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !city.chars().any(char::is_alphabetic) {
        return Err(ValidationError::NoLetters);
    }
    if city.chars().count() < 2 {
        return Err(ValidationError::TooShort);
    }
    Ok(CityQuery(city.to_string()))
}
