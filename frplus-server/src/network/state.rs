use crate::config::Config;
use crate::store::Store;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

// Shared state accessible by all handlers
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }
}
