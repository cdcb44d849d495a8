use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness only: Ollama is not contacted. Reports which models a run would use.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "screener",
        "version": env!("CARGO_PKG_VERSION"),
        "llm_model": state.config.llm_model,
        "embedding_model": state.config.embedding_model,
        "roles": state.role_weights.iter().count(),
    }))
}
