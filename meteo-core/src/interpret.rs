//! Interpretation of raw OpenWeatherMap "current weather" bodies.
//!
//! The provider embeds its own status in the body as `cod`, separate from
//! the HTTP status of the exchange. A successful body looks like:
//!
//! ```json
//! {"main": {"temp": 15.0}, "weather": [{"description": "clear sky"}], "cod": 200}
//! ```
//!
//! while an unknown city comes back as `{"cod": "404", "message": "city not found"}`.
//! Note that the provider sends `cod` as a number on success and as a string
//! on most errors; both forms are accepted.

use serde_json::{Map, Value};

use crate::error::UpstreamError;
use crate::weather::WeatherResult;

/// Provider `cod` value meaning "ok".
pub const PROVIDER_OK: u64 = 200;

/// Turns a raw provider body into a [`WeatherResult`].
///
/// - Empty (or whitespace-only) body: [`UpstreamError::EmptyResponse`].
/// - Not a JSON object: [`UpstreamError::Malformed`].
/// - `cod` present and not `200`: [`UpstreamError::NotFound`], checked
///   before any field is read.
/// - `main.temp` may be a number or a numeric string.
/// - Missing `main.temp` or `weather[0].description` fall back to `0.0`
///   and `""` respectively.
///
/// # Examples
///
/// ```
/// use meteo_core::{UpstreamError, interpret};
///
/// let body = r#"{"main":{"temp":15.0},"weather":[{"description":"clear sky"}],"cod":200}"#;
/// let result = interpret(body).unwrap();
/// assert_eq!(result.temperature_celsius, 15.0);
/// assert_eq!(result.description, "clear sky");
///
/// let body = r#"{"cod":"404","message":"city not found"}"#;
/// assert!(matches!(interpret(body), Err(UpstreamError::NotFound { .. })));
/// ```
pub fn interpret(raw: &str) -> Result<WeatherResult, UpstreamError> {
    if raw.trim().is_empty() {
        return Err(UpstreamError::EmptyResponse);
    }

    let body: Map<String, Value> = serde_json::from_str(raw)?;

    if let Some(cod) = body.get("cod") {
        if provider_status(cod) != Some(PROVIDER_OK) {
            return Err(UpstreamError::NotFound {
                code: cod_text(cod),
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }

    let temperature_celsius = body
        .get("main")
        .and_then(|main| main.get("temp"))
        .and_then(number)
        .unwrap_or_default();

    let description = body
        .get("weather")
        .and_then(|weather| weather.get(0))
        .and_then(|first| first.get("description"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(WeatherResult::new(temperature_celsius, description))
}

/// Reads a JSON number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn provider_status(cod: &Value) -> Option<u64> {
    match cod {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && *value >= 0.0)
                .map(|value| value as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn cod_text(cod: &Value) -> String {
    match cod {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
