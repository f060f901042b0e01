use std::sync::Arc;

use crate::config::Config;
use crate::store::TelemetryStore;

/// Shared handler state: the store handle and immutable configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TelemetryStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn TelemetryStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
