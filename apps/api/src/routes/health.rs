use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and whether the LLM provider has a credential.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobmatch-api",
        "llm": {
            "provider": state.analyzer.provider_name(),
            "model": state.config.gemini_model,
            "configured": state.analyzer.is_configured(),
        }
    }))
}
