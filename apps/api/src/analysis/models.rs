use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Output language of an analysis. Drives the prompt's language rule and the
/// advice category labels the model is asked to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "zh", alias = "中文")]
    Chinese,
    #[serde(rename = "en", alias = "English")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Chinese, Language::English];

    pub fn code(self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }

    /// Label shown in the language selector.
    pub fn label(self) -> &'static str {
        match self {
            Language::Chinese => "中文",
            Language::English => "English",
        }
    }

    /// How the language is named inside the prompt.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::Chinese => "Traditional Chinese (natural Taiwanese usage)",
            Language::English => "English",
        }
    }
}

/// The five advice categories the prompt asks for.
///
/// The model may answer with labels in either language, or with labels of its
/// own; unknown labels are kept verbatim by the normalizer and map to `None`
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    ResumeOptimization,
    CoverLetter,
    SkillGap,
    InterviewPrep,
    Portfolio,
}

impl AdviceCategory {
    pub const ALL: [AdviceCategory; 5] = [
        AdviceCategory::ResumeOptimization,
        AdviceCategory::CoverLetter,
        AdviceCategory::SkillGap,
        AdviceCategory::InterviewPrep,
        AdviceCategory::Portfolio,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AdviceCategory::ResumeOptimization => "resume_optimization",
            AdviceCategory::CoverLetter => "cover_letter",
            AdviceCategory::SkillGap => "skill_gap",
            AdviceCategory::InterviewPrep => "interview_prep",
            AdviceCategory::Portfolio => "portfolio",
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (AdviceCategory::ResumeOptimization, Language::Chinese) => "履歷優化",
            (AdviceCategory::CoverLetter, Language::Chinese) => "求職信建議",
            (AdviceCategory::SkillGap, Language::Chinese) => "技能差距分析",
            (AdviceCategory::InterviewPrep, Language::Chinese) => "面試準備建議",
            (AdviceCategory::Portfolio, Language::Chinese) => "作品集建議",
            (AdviceCategory::ResumeOptimization, Language::English) => "Resume Optimization",
            (AdviceCategory::CoverLetter, Language::English) => "Cover Letter",
            (AdviceCategory::SkillGap, Language::English) => "Skill Gap Analysis",
            (AdviceCategory::InterviewPrep, Language::English) => "Interview Preparation",
            (AdviceCategory::Portfolio, Language::English) => "Portfolio",
        }
    }

    /// What the model should put under this category.
    pub fn guidance(self) -> &'static str {
        match self {
            AdviceCategory::ResumeOptimization => {
                "key missing skills to surface, concrete sentences to add, skill section ordering, \
                 ways to quantify achievements"
            }
            AdviceCategory::CoverLetter => {
                "an opening sentence template, a middle paragraph linking past experience to the role, \
                 a closing sentence template; plain and direct, addressing the reader as \"you\""
            }
            AdviceCategory::SkillGap => {
                "missing skills, a learning direction for each, free resources or courses"
            }
            AdviceCategory::InterviewPrep => {
                "likely questions, answer directions, hints for structuring answers with STAR"
            }
            AdviceCategory::Portfolio => "small project ideas and how to present them",
        }
    }

    /// Matches a label in any supported language, ignoring surrounding
    /// whitespace and ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|category| {
            Language::ALL
                .into_iter()
                .any(|lang| category.label(lang).eq_ignore_ascii_case(label))
                || category.key() == label
        })
    }
}

/// Request body for an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Absent fields deserialize as empty and are rejected by `validate`.
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub language: Language,
}

impl AnalysisRequest {
    /// Both text fields must carry something other than whitespace.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut blank = Vec::new();
        if self.resume_text.trim().is_empty() {
            blank.push("resume_text");
        }
        if self.job_description.trim().is_empty() {
            blank.push("job_description");
        }

        if blank.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "{} cannot be empty",
                blank.join(" and ")
            )))
        }
    }
}
