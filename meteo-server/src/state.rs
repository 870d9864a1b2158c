use std::fmt;
use std::sync::Arc;

use meteo_core::WeatherUpstream;

/// Shared handler state.
///
/// Cloned per request; the upstream itself is shared behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<dyn WeatherUpstream>,
}

impl AppState {
    pub fn new<U>(upstream: U) -> Self
    where
        U: WeatherUpstream + 'static,
    {
        Self {
            upstream: Arc::new(upstream),
        }
    }

    /// Wraps an upstream that is already shared, e.g. one a test keeps a
    /// handle to.
    pub fn from_shared(upstream: Arc<dyn WeatherUpstream>) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &dyn WeatherUpstream {
        self.upstream.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
