// All LLM prompt constants for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Analysis instruction template.
/// Replace: {json_only}, {language_rule}, {language}, {advice_schema}, {advice_rules}
///
/// User text is never substituted into this template; it is appended after it
/// (see `prompt_builder`).
pub const ANALYSIS_INSTRUCTION_TEMPLATE: &str = r#"You are a professional career advisor. Read the RESUME and the JOB DESCRIPTION below and evaluate how well the candidate fits the job.

{json_only}

Return a JSON object with this EXACT schema:
{
  "match_score": integer 0-100,
  "confidence": float 0-1,
  "match_explanation": "why the score is what it is, e.g. 3 of 5 key skills are met, so the score is 75",
  "priorities": [{"name": string, "weight": 0-1, "explanation": string}],
  "matched": [{"item": string, "evidence": [string, ...]}],
  "missing": [{"item": string, "action": string}],
  "advice": {
{advice_schema}
  }
}

RULES:
- {language_rule}
- match_explanation: MUST explain the arithmetic behind the score, e.g. "3 of the 5 key skills are met, score 75".
- priorities: ONLY key skills the job description explicitly mentions or requires. Never include a skill because the resume has it. Every job is different. Each entry needs an explanation of why it carries that weight.
- matched: `item` is the key skill, capitalized. `evidence` lists concrete points from the resume, one point per entry. Do not write "from the resume".
- missing: `item` names a skill or experience in terms a reader understands. `action` is a specific, reasoned next step with a beginning and an end, not boilerplate such as "add related experience to your resume".
- advice: MUST contain all five categories below, each with specific, actionable suggestions in {language}:
{advice_rules}
- Reply with JSON only, nothing else.

IMPORTANT: every skill in priorities must be explicitly mentioned or required by the job description. Never add a skill to priorities just because the resume shows related experience."#;

/// Markers around the user texts. `PromptBuilder::build` joins them with `format!`;
/// the user texts never pass through `str::replace`.
pub const USER_SECTION_HEADER_RESUME: &str = "RESUME:";
pub const USER_SECTION_HEADER_JOB: &str = "JOB DESCRIPTION:";
pub const USER_SECTION_FOOTER: &str = "Analyze the match and provide advice.";
