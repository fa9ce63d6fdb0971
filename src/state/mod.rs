mod corpus;

use crate::config::ServerConfig;
use crate::loader::{source_from_root, Corpus, DataSource};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub source: Arc<dyn DataSource>,
    /// Loaded corpora by streamer name. Only successful loads are cached.
    pub corpora: Arc<RwLock<HashMap<String, Arc<Corpus>>>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let source = source_from_root(&config.data_root);
        Self::with_source(config, source)
    }

    pub fn with_source(config: ServerConfig, source: Arc<dyn DataSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            corpora: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
