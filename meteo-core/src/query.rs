//! Validated city lookup request.

use std::fmt;

use thiserror::Error;

/// Rejection of the caller's city before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No `city` parameter was supplied.
    #[error("city name is missing")]
    MissingCity,
    /// The `city` parameter is empty or whitespace only.
    #[error("city name is blank")]
    BlankCity,
}

/// A city name that is known to be non-blank.
///
/// Surrounding whitespace is stripped; inner whitespace ("New York") is kept.
///
/// # Examples
///
/// ```
/// use meteo_core::{ValidationError, WeatherQuery};
///
/// let query = WeatherQuery::parse(Some("  London ")).unwrap();
/// assert_eq!(query.city(), "London");
///
/// assert_eq!(WeatherQuery::parse(Some("   ")), Err(ValidationError::BlankCity));
/// assert_eq!(WeatherQuery::parse(None), Err(ValidationError::MissingCity));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    /// Validates an optional raw `city` value.
    pub fn parse(city: Option<&str>) -> Result<Self, ValidationError> {
        let city = city.ok_or(ValidationError::MissingCity)?.trim();
        if city.is_empty() {
            return Err(ValidationError::BlankCity);
        }
        Ok(Self {
            city: city.to_string(),
        })
    }

    /// Shortcut for [`WeatherQuery::parse`] with a present value.
    pub fn new(city: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::parse(Some(city.as_ref()))
    }

    /// The validated city name.
    pub fn city(&self) -> &str {
        &self.city
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.city)
    }
}
