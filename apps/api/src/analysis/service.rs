//! Analysis pipeline.
//!
//! Flow: validate → credential check → build prompt → one LLM call →
//!       normalize → view.
//!
//! Nothing is stored. Logs carry ids and sizes, never résumé or job text.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::{AnalysisRequest, Language};
use crate::analysis::normalizer::normalize;
use crate::analysis::presentation::ResultView;
use crate::analysis::prompt_builder::build_prompt;
use crate::analysis::result::AnalysisResult;
use crate::errors::AppError;
use crate::llm_client::LlmProvider;

/// One completed analysis, returned to the caller and then dropped.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub language: Language,
    pub result: AnalysisResult,
    pub view: ResultView,
}

#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn LlmProvider>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.ensure_configured().is_ok()
    }

    /// Runs one analysis. Every failure is terminal; nothing is retried.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, AppError> {
        request.validate()?;
        self.provider.ensure_configured()?;

        let analysis_id = Uuid::new_v4();
        info!(
            "Analysis {analysis_id} started: language={}, resume_chars={}, jd_chars={}, provider={}",
            request.language.code(),
            request.resume_text.chars().count(),
            request.job_description.chars().count(),
            self.provider.name()
        );

        let prompt = build_prompt(
            &request.resume_text,
            &request.job_description,
            request.language,
        );

        let raw_reply = self.provider.invoke(&prompt).await.map_err(|e| {
            warn!("Analysis {analysis_id}: provider call failed: {e}");
            AppError::from(e)
        })?;

        let result = normalize(&raw_reply).map_err(|e| {
            warn!(
                "Analysis {analysis_id}: reply of {} chars rejected: {e}",
                raw_reply.chars().count()
            );
            AppError::from(e)
        })?;

        info!(
            "Analysis {analysis_id} complete: score={}, priorities={}, matched={}, missing={}",
            result.match_score,
            result.priorities.len(),
            result.matched.len(),
            result.missing.len()
        );

        let view = ResultView::from_result(&result, request.language);

        Ok(Analysis {
            analysis_id,
            analyzed_at: Utc::now(),
            language: request.language,
            result,
            view,
        })
    }
}
