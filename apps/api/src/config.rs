use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{GeminiConfig, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
///
/// `GOOGLE_API_KEY` is deliberately optional: the service still starts without
/// it and every analysis request reports a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub gemini_max_output_tokens: u32,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = lookup("GOOGLE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Config {
            google_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_temperature: parse_or(&lookup, "GEMINI_TEMPERATURE", 0.3)?,
            gemini_max_output_tokens: parse_or(&lookup, "GEMINI_MAX_OUTPUT_TOKENS", 2000)?,
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Settings handed to the Gemini adapter.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.google_api_key.clone(),
            model: self.gemini_model.clone(),
            temperature: self.gemini_temperature,
            max_output_tokens: self.gemini_max_output_tokens,
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
