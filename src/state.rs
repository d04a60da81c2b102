use std::sync::Arc;

use crate::config::Config;
use crate::retrieval::IndexClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when index credentials are missing; search requests then fail closed.
    pub index: Option<Arc<IndexClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let index = match IndexClient::from_config(&config.index) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Search disabled: {e}");
                None
            }
        };

        Self {
            config: Arc::new(config),
            index,
        }
    }

    /// Build state around an already-constructed client.
    pub fn with_index(config: Config, index: Option<IndexClient>) -> Self {
        Self {
            config: Arc::new(config),
            index: index.map(Arc::new),
        }
    }
}
