//! Successful lookup payload.

use serde::Serialize;

/// Simplified current weather returned to the caller.
///
/// Serializes as `{"temp": <number>, "description": <string>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherResult {
    /// Current temperature in degrees Celsius.
    #[serde(rename = "temp")]
    pub temperature_celsius: f64,
    /// Human readable condition, e.g. "clear sky".
    pub description: String,
}

impl WeatherResult {
    /// Creates a new result.
    pub fn new(temperature_celsius: f64, description: impl Into<String>) -> Self {
        Self {
            temperature_celsius,
            description: description.into(),
        }
    }
}
