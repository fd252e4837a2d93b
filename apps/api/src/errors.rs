use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::analysis::normalizer::NormalizeError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the request: nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential => AppError::Configuration(
                "GOOGLE_API_KEY is not set; configure it in the environment or .env".to_string(),
            ),
            other => AppError::Provider(other.to_string()),
        }
    }
}

impl AppError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::Normalize(NormalizeError::EmptyReply) => "EMPTY_REPLY",
            AppError::Normalize(NormalizeError::ExtractionFailure { .. }) => "EXTRACTION_FAILURE",
            AppError::Normalize(NormalizeError::ParseFailure { .. }) => "PARSE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Provider(_) | AppError::Normalize(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic payload for model-output failures: the raw reply and, for
    /// parse failures, the repaired text the parser actually saw.
    fn details(&self) -> Option<Value> {
        match self {
            AppError::Normalize(NormalizeError::ExtractionFailure { raw_reply }) => {
                Some(json!({ "raw_reply": raw_reply }))
            }
            AppError::Normalize(NormalizeError::ParseFailure {
                message,
                repaired,
                raw_reply,
            }) => Some(json!({
                "parser_message": message,
                "repaired": repaired,
                "raw_reply": raw_reply,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                msg.clone()
            }
            AppError::Provider(msg) => {
                tracing::error!("LLM provider error: {msg}");
                "The AI provider call failed, please check the API settings or try again later"
                    .to_string()
            }
            AppError::Normalize(e) => {
                tracing::error!("Model reply rejected: {e}");
                e.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let mut error = json!({
            "code": self.code(),
            "message": message,
        });
        if let Some(details) = self.details() {
            error["details"] = details;
        }

        (self.status(), Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_missing_credential_maps_to_configuration() {
        let err: AppError = LlmError::MissingCredential.into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_failure_maps_to_provider() {
        let err: AppError = LlmError::Api {
            status: 500,
            message: "backend overloaded".to_string(),
        }
        .into();
        assert_eq!(err.code(), "PROVIDER_ERROR");
        assert!(err.to_string().contains("backend overloaded"));
    }

    #[test]
    fn test_normalize_codes_are_distinct() {
        let empty: AppError = NormalizeError::EmptyReply.into();
        let extraction: AppError = NormalizeError::ExtractionFailure {
            raw_reply: "x".into(),
        }
        .into();
        let parse: AppError = NormalizeError::ParseFailure {
            message: "eof".into(),
            repaired: "{}".into(),
            raw_reply: "{".into(),
        }
        .into();
        assert_eq!(empty.code(), "EMPTY_REPLY");
        assert_eq!(extraction.code(), "EXTRACTION_FAILURE");
        assert_eq!(parse.code(), "PARSE_FAILURE");
    }

    #[tokio::test]
    async fn test_parse_failure_body_carries_diagnostics() {
        let err: AppError = NormalizeError::ParseFailure {
            message: "EOF while parsing".into(),
            repaired: "{\"a\": [1}".into(),
            raw_reply: "{\"a\": [1".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PARSE_FAILURE");
        assert_eq!(body["error"]["details"]["repaired"], "{\"a\": [1}");
        assert_eq!(body["error"]["details"]["raw_reply"], "{\"a\": [1");
    }

    #[tokio::test]
    async fn test_validation_body_has_no_details() {
        let response = AppError::Validation("resume_text cannot be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "resume_text cannot be empty");
        assert!(body["error"].get("details").is_none());
    }
}
