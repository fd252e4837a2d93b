// Cross-cutting prompt fragments shared by every prompt sent through llm_client.
// Feature-specific templates live next to the feature (see analysis::prompts).

/// Instruction that enforces JSON-only output. Gemini has no separate system
/// channel in the request we send, so this is prepended to the prompt body.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Instruction that pins the output language. Replace `{language}` before sending.
pub const LANGUAGE_INSTRUCTION: &str =
    "Every human-readable string in your reply MUST be written in {language}.";
