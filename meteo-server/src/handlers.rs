//! Route handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use meteo_core::{WeatherQuery, lookup};
use serde::Deserialize;
use tracing::{Span, field, info, warn};

use crate::state::AppState;

/// Body of `GET /health`.
pub const HEALTH_MESSAGE: &str = "Backend is running";

/// Query string of `GET /weather`.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
}

/// Every failure is reported to the caller the same way.
fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

#[tracing::instrument(name = "weather", skip_all, fields(city = field::Empty))]
pub(crate) async fn weather(
    State(state): State<AppState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Response {
    let city = match params {
        Ok(Query(params)) => params.city,
        Err(rejection) => {
            warn!(%rejection, "unreadable query string");
            return not_found();
        }
    };

    let query = match WeatherQuery::parse(city.as_deref()) {
        Ok(query) => query,
        Err(error) => {
            warn!(%error, "rejected weather request");
            return not_found();
        }
    };
    Span::current().record("city", query.city());

    match lookup(state.upstream(), &query).await {
        Ok(weather) => {
            info!(
                temp = weather.temperature_celsius,
                description = %weather.description,
                "weather lookup succeeded"
            );
            Json(weather).into_response()
        }
        Err(error) => {
            warn!(kind = error.kind(), %error, "weather lookup failed");
            not_found()
        }
    }
}

pub(crate) async fn health() -> &'static str {
    HEALTH_MESSAGE
}
