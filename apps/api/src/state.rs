use crate::analysis::service::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every analysis is independent.
#[derive(Clone)]
pub struct AppState {
    /// Wraps the pluggable `LlmProvider`. Default: `GeminiClient`.
    pub analyzer: Analyzer,
    pub config: Config,
}
