use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{EmbeddingService, ModelService};
use crate::screening::chunker::ChunkerConfig;
use crate::screening::scoring::RoleWeights;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ModelService>,
    pub embedder: Arc<dyn EmbeddingService>,
    pub role_weights: Arc<RoleWeights>,
    pub chunker: ChunkerConfig,
    pub config: Config,
}
