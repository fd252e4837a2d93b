//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::analysis::models::{AnalysisRequest, Language};
use crate::analysis::service::Analysis;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
}

/// POST /api/v1/analyze
///
/// Runs one résumé / job description analysis and returns the normalized
/// result plus its render-ready view.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Analysis>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let analysis = state.analyzer.analyze(&request).await?;
    Ok(Json(analysis))
}

/// GET /api/v1/languages
///
/// Values accepted in `AnalysisRequest.language`, for the language selector.
pub async fn handle_languages() -> Json<Vec<LanguageOption>> {
    Json(
        Language::ALL
            .into_iter()
            .map(|l| LanguageOption {
                code: l.code(),
                label: l.label(),
            })
            .collect(),
    )
}
