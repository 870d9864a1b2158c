use axum::{Router, routing::get};
use http::Method;
use meteo_configuration::{ConfigError, CorsConfig};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the application router with request tracing.
///
/// CORS is left to the caller, see [`cors_layer`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(handlers::weather))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS layer allowing `GET` from the configured origins.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origins = config.origins()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET]))
}
