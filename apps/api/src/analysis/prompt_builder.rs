//! Prompt Builder: fixed instruction template + the two user texts.
//!
//! User text is appended verbatim. Nothing here guards against prompt
//! injection from résumé or job text.

use crate::analysis::models::{AdviceCategory, Language};
use crate::analysis::prompts::{
    ANALYSIS_INSTRUCTION_TEMPLATE, USER_SECTION_FOOTER, USER_SECTION_HEADER_JOB,
    USER_SECTION_HEADER_RESUME,
};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, LANGUAGE_INSTRUCTION};

/// Builds analysis prompts for one output language.
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    language: Language,
}

impl PromptBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// The instruction part of the prompt, with no user text in it.
    pub fn instruction(&self) -> String {
        let advice_schema = AdviceCategory::ALL
            .iter()
            .map(|c| format!("    \"{}\": [string, ...]", c.label(self.language)))
            .collect::<Vec<_>>()
            .join(",\n");

        let advice_rules = AdviceCategory::ALL
            .iter()
            .map(|c| format!("  * {}: {}", c.label(self.language), c.guidance()))
            .collect::<Vec<_>>()
            .join("\n");

        let language_name = self.language.prompt_name();

        ANALYSIS_INSTRUCTION_TEMPLATE
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
            .replace(
                "{language_rule}",
                &LANGUAGE_INSTRUCTION.replace("{language}", language_name),
            )
            .replace("{language}", language_name)
            .replace("{advice_schema}", &advice_schema)
            .replace("{advice_rules}", &advice_rules)
    }

    /// Full prompt: instruction, then résumé and job description verbatim.
    pub fn build(&self, resume_text: &str, job_description: &str) -> String {
        format!(
            "{}\n\n{USER_SECTION_HEADER_RESUME}\n{resume_text}\n\n{USER_SECTION_HEADER_JOB}\n{job_description}\n\n{USER_SECTION_FOOTER}\n",
            self.instruction()
        )
    }
}

/// Convenience wrapper over `PromptBuilder`.
pub fn build_prompt(resume_text: &str, job_description: &str, language: Language) -> String {
    PromptBuilder::new(language).build(resume_text, job_description)
}
