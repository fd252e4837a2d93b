//! Response Normalizer: raw model reply → `AnalysisResult`.
//!
//! Steps:
//! 1. reject empty / whitespace-only replies
//! 2. extract the JSON payload (```json fence → outer `{…}` span → whole reply)
//! 3. heuristic brace repair (`repair_braces`)
//! 4. parse
//! 5. tolerant field mapping (`AnalysisResult::from_object`)
//!
//! Brace repair counts characters only. Braces inside string values are not
//! protected, so a reply whose strings contain unmatched braces can be
//! corrupted by the repair step.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::result::AnalysisResult;

const JSON_FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model reply was empty")]
    EmptyReply,

    #[error("no JSON content could be extracted from the model reply")]
    ExtractionFailure { raw_reply: String },

    #[error("model reply is not valid JSON: {message}")]
    ParseFailure {
        message: String,
        repaired: String,
        raw_reply: String,
    },
}

/// Outcome of `repair_braces`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraceRepair {
    pub text: String,
    /// `true` when the brace counts differed and `text` was changed.
    pub applied: bool,
}

/// Normalizes one raw model reply.
pub fn normalize(raw_reply: &str) -> Result<AnalysisResult, NormalizeError> {
    if raw_reply.trim().is_empty() {
        return Err(NormalizeError::EmptyReply);
    }

    let extracted = extract_json(raw_reply);
    if extracted.is_empty() {
        return Err(NormalizeError::ExtractionFailure {
            raw_reply: raw_reply.to_string(),
        });
    }

    let repair = repair_braces(extracted);
    if repair.applied {
        warn!(
            "Model reply JSON looks truncated or over-closed; repaired {} → {} chars",
            extracted.chars().count(),
            repair.text.chars().count()
        );
    }

    let parse_failure = |message: String, repaired: &str| NormalizeError::ParseFailure {
        message,
        repaired: repaired.to_string(),
        raw_reply: raw_reply.to_string(),
    };

    let value: Value =
        serde_json::from_str(&repair.text).map_err(|e| parse_failure(e.to_string(), &repair.text))?;

    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(parse_failure(
                format!("expected a JSON object, got {}", json_kind(&other)),
                &repair.text,
            ))
        }
    };

    debug!("Model reply parsed: {} top-level keys", obj.len());
    Ok(AnalysisResult::from_object(&obj))
}

/// Locates the JSON payload in a free-form reply. First rule that applies wins:
///
/// 1. a "```json" fence: the text up to the next "```" after it, trimmed
///    (empty if the fence is never closed);
/// 2. a `{` and a `}` anywhere: first `{` through last `}` (empty when the
///    last `}` comes before the first `{`);
/// 3. the trimmed reply.
pub fn extract_json(reply: &str) -> &str {
    if let Some(open) = reply.find(JSON_FENCE_OPEN) {
        let start = open + JSON_FENCE_OPEN.len();
        return match reply[start..].find(FENCE_CLOSE) {
            Some(len) => reply[start..start + len].trim(),
            None => "",
        };
    }

    if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
        // A last `}` before the first `{` spans nothing.
        return if end > start { &reply[start..=end] } else { "" };
    }

    reply.trim()
}

/// Balances `{` / `}` counts.
///
/// - More opens than closes: appends the missing `}` at the end.
/// - More closes than opens: once per extra `}`, cuts the text at its last
///   `}` (that brace and everything after it are dropped).
pub fn repair_braces(text: &str) -> BraceRepair {
    let opens = text.matches('{').count();
    let closes = text.matches('}').count();

    if opens == closes {
        return BraceRepair {
            text: text.to_string(),
            applied: false,
        };
    }

    let mut repaired = text.to_string();
    if opens > closes {
        repaired.push_str(&"}".repeat(opens - closes));
    } else {
        for _ in 0..(closes - opens) {
            if let Some(last) = repaired.rfind('}') {
                repaired.truncate(last);
            }
        }
    }

    BraceRepair {
        text: repaired,
        applied: true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
