//! Scripted `LlmProvider` for tests. Counts every `invoke`.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{LlmError, LlmProvider};

pub struct StubProvider {
    configured: bool,
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubProvider {
    /// Configured provider that answers every prompt with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self {
            configured: true,
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Configured provider whose calls fail with a 500.
    pub fn failing() -> Self {
        Self {
            configured: true,
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider with no credential.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            reply: Some("{}".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn ensure_configured(&self) -> Result<(), LlmError> {
        if self.configured {
            Ok(())
        } else {
            Err(LlmError::MissingCredential)
        }
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_configured()?;
        self.reply.clone().ok_or(LlmError::Api {
            status: 500,
            message: "stub failure".to_string(),
        })
    }
}
