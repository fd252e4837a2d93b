//! Render-ready view of an `AnalysisResult`.
//!
//! The browser front end only lays these blocks out; every shape decision
//! (which variant becomes which card, weight colour bands, empty states,
//! markdown emphasis in advice) is made here.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::analysis::models::Language;
use crate::analysis::result::{Advice, AnalysisResult, MatchedItem, MissingItem, Priority};

/// Weight at or above which a priority is shown as strong.
const STRONG_WEIGHT: f64 = 0.7;
/// Weight at or above which a priority is shown as moderate.
const MODERATE_WEIGHT: f64 = 0.5;

/// Section key for advice that came without category labels.
const GENERAL_ADVICE_KEY: &str = "general";
const OTHER_ADVICE_KEY: &str = "other";

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBand {
    Strong,
    Moderate,
    Weak,
}

impl WeightBand {
    pub fn from_weight(weight: f64) -> Self {
        if weight >= STRONG_WEIGHT {
            WeightBand::Strong
        } else if weight >= MODERATE_WEIGHT {
            WeightBand::Moderate
        } else {
            WeightBand::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityView {
    /// 1-based position in the model's list.
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<WeightBand>,
    pub explanation: String,
}

/// A matched or missing experience block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub title: String,
    pub body: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSegment {
    pub text: String,
    pub strong: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceItemView {
    pub segments: Vec<TextSegment>,
    /// The same text with emphasis dropped.
    pub plain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceSectionView {
    /// Known category key, `other` for unknown labels, `general` for
    /// unlabelled advice.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub items: Vec<AdviceItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub score: i64,
    pub match_explanation: String,
    pub score_explanation: String,
    pub priorities: Vec<PriorityView>,
    pub matched: Vec<CardView>,
    pub missing: Vec<CardView>,
    pub no_matched: bool,
    pub all_skills_met: bool,
    pub advice: Vec<AdviceSectionView>,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult, language: Language) -> Self {
        ResultView {
            score: result.match_score,
            match_explanation: result.match_explanation.clone(),
            score_explanation: result.score_explanation.clone(),
            priorities: result
                .priorities
                .iter()
                .enumerate()
                .map(|(i, p)| priority_view(i + 1, p))
                .collect(),
            matched: result.matched.iter().map(matched_card).collect(),
            missing: result.missing.iter().map(missing_card).collect(),
            no_matched: result.matched.is_empty(),
            all_skills_met: result.missing.is_empty(),
            advice: advice_sections(&result.advice, language),
        }
    }
}

fn priority_view(rank: usize, priority: &Priority) -> PriorityView {
    let (weight, explanation) = match priority {
        Priority::Weighted {
            weight,
            explanation,
            ..
        } => (Some(*weight), explanation.clone()),
        Priority::Plain(_) => (None, String::new()),
    };
    PriorityView {
        rank,
        name: priority.name().to_string(),
        weight_percent: weight.map(|w| (w * 100.0).trunc() as i64),
        band: weight.map(WeightBand::from_weight),
        explanation,
    }
}

fn matched_card(item: &MatchedItem) -> CardView {
    match item {
        MatchedItem::Evidence { item, evidence } => CardView {
            title: item.clone(),
            body: String::new(),
            bullets: evidence.clone(),
        },
        MatchedItem::Described { title, description } => CardView {
            title: title.clone(),
            body: description.clone(),
            bullets: Vec::new(),
        },
        MatchedItem::Plain(text) => plain_card(text),
    }
}

fn missing_card(item: &MissingItem) -> CardView {
    match item {
        MissingItem::Action { item, action } => CardView {
            title: item.clone(),
            body: action.clone(),
            bullets: Vec::new(),
        },
        MissingItem::Described { title, description } => CardView {
            title: title.clone(),
            body: description.clone(),
            bullets: Vec::new(),
        },
        MissingItem::Plain(text) => plain_card(text),
    }
}

fn plain_card(text: &str) -> CardView {
    CardView {
        title: String::new(),
        body: text.to_string(),
        bullets: Vec::new(),
    }
}

fn advice_sections(advice: &Advice, language: Language) -> Vec<AdviceSectionView> {
    if advice.is_empty() {
        return Vec::new();
    }
    match advice {
        Advice::Sections(sections) => sections
            .iter()
            .filter(|s| !s.items.is_empty())
            .map(|s| {
                let (key, label) = match s.category() {
                    Some(category) => (category.key(), category.label(language).to_string()),
                    None => (OTHER_ADVICE_KEY, s.label.clone()),
                };
                AdviceSectionView {
                    key: key.to_string(),
                    label: Some(label),
                    items: s.items.iter().map(|i| clean_advice_item(i)).collect(),
                }
            })
            .collect(),
        Advice::Text(text) => vec![general_section(&[text.as_str()])],
        Advice::List(items) => {
            let items: Vec<&str> = items.iter().map(String::as_str).collect();
            vec![general_section(&items)]
        }
    }
}

fn general_section(items: &[&str]) -> AdviceSectionView {
    AdviceSectionView {
        key: GENERAL_ADVICE_KEY.to_string(),
        label: None,
        items: items.iter().map(|i| clean_advice_item(i)).collect(),
    }
}

/// Turns `**text**` into a strong segment, drops every other `*`, and trims
/// the outer whitespace.
pub fn clean_advice_item(item: &str) -> AdviceItemView {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in BOLD.captures_iter(item) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_segment(&mut segments, &item[last..whole.start()], false);
        push_segment(&mut segments, inner.as_str(), true);
        last = whole.end();
    }
    push_segment(&mut segments, &item[last..], false);

    trim_outer(&mut segments);

    let plain: String = segments.iter().map(|s| s.text.as_str()).collect();
    AdviceItemView { segments, plain }
}

fn push_segment(segments: &mut Vec<TextSegment>, text: &str, strong: bool) {
    let text = text.replace('*', "");
    if !text.is_empty() {
        segments.push(TextSegment { text, strong });
    }
}

fn trim_outer(segments: &mut Vec<TextSegment>) {
    while let Some(first) = segments.first_mut().filter(|s| !s.strong) {
        first.text = first.text.trim_start().to_string();
        if !first.text.is_empty() {
            break;
        }
        segments.remove(0);
    }
    while let Some(last) = segments.last_mut().filter(|s| !s.strong) {
        last.text = last.text.trim_end().to_string();
        if !last.text.is_empty() {
            break;
        }
        segments.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::AdviceSection;

    fn plain(text: &str) -> TextSegment {
        TextSegment {
            text: text.to_string(),
            strong: false,
        }
    }

    fn strong(text: &str) -> TextSegment {
        TextSegment {
            text: text.to_string(),
            strong: true,
        }
    }

    #[test]
    fn test_weight_band_thresholds() {
        assert_eq!(WeightBand::from_weight(0.9), WeightBand::Strong);
        assert_eq!(WeightBand::from_weight(0.7), WeightBand::Strong);
        assert_eq!(WeightBand::from_weight(0.69), WeightBand::Moderate);
        assert_eq!(WeightBand::from_weight(0.5), WeightBand::Moderate);
        assert_eq!(WeightBand::from_weight(0.49), WeightBand::Weak);
        assert_eq!(WeightBand::from_weight(0.0), WeightBand::Weak);
    }

    #[test]
    fn test_priority_views() {
        let result = AnalysisResult {
            priorities: vec![
                Priority::Weighted {
                    name: "Rust".into(),
                    weight: 0.857,
                    explanation: "Title".into(),
                },
                Priority::Plain("Docker".into()),
            ],
            ..Default::default()
        };
        let view = ResultView::from_result(&result, Language::English);
        assert_eq!(view.priorities[0].rank, 1);
        assert_eq!(view.priorities[0].weight_percent, Some(85));
        assert_eq!(view.priorities[0].band, Some(WeightBand::Strong));
        assert_eq!(view.priorities[1].rank, 2);
        assert_eq!(view.priorities[1].name, "Docker");
        assert!(view.priorities[1].band.is_none());
    }

    #[test]
    fn test_empty_result_view_states() {
        let view = ResultView::from_result(&AnalysisResult::default(), Language::Chinese);
        assert_eq!(view.score, 0);
        assert!(view.no_matched);
        assert!(view.all_skills_met);
        assert!(view.priorities.is_empty());
        assert!(view.advice.is_empty());
    }

    #[test]
    fn test_cards_for_each_shape() {
        let result = AnalysisResult {
            matched: vec![
                MatchedItem::Evidence {
                    item: "Rust".into(),
                    evidence: vec!["Built an API".into()],
                },
                MatchedItem::Described {
                    title: "SQL".into(),
                    description: "Postgres tuning".into(),
                },
                MatchedItem::Plain("Git".into()),
            ],
            missing: vec![MissingItem::Action {
                item: "Kafka".into(),
                action: "Build a pipeline".into(),
            }],
            ..Default::default()
        };
        let view = ResultView::from_result(&result, Language::English);
        assert!(!view.no_matched);
        assert!(!view.all_skills_met);
        assert_eq!(view.matched[0].bullets, vec!["Built an API".to_string()]);
        assert_eq!(view.matched[1].body, "Postgres tuning");
        assert_eq!(view.matched[2].title, "");
        assert_eq!(view.matched[2].body, "Git");
        assert_eq!(view.missing[0].title, "Kafka");
        assert_eq!(view.missing[0].body, "Build a pipeline");
    }

    #[test]
    fn test_advice_sections_localize_known_and_keep_unknown() {
        let result = AnalysisResult {
            advice: Advice::Sections(vec![
                AdviceSection {
                    label: "履歷優化".into(),
                    items: vec!["Lead with impact".into()],
                },
                AdviceSection {
                    label: "作品集建議".into(),
                    items: vec![],
                },
                AdviceSection {
                    label: "Networking".into(),
                    items: vec!["Reach out to the team".into()],
                },
            ]),
            ..Default::default()
        };
        let view = ResultView::from_result(&result, Language::English);
        assert_eq!(view.advice.len(), 2);
        assert_eq!(view.advice[0].key, "resume_optimization");
        assert_eq!(view.advice[0].label.as_deref(), Some("Resume Optimization"));
        assert_eq!(view.advice[1].key, "other");
        assert_eq!(view.advice[1].label.as_deref(), Some("Networking"));
    }

    #[test]
    fn test_text_and_list_advice_become_general_section() {
        let text = AnalysisResult {
            advice: Advice::Text("Tailor the summary".into()),
            ..Default::default()
        };
        let view = ResultView::from_result(&text, Language::English);
        assert_eq!(view.advice.len(), 1);
        assert_eq!(view.advice[0].key, "general");
        assert!(view.advice[0].label.is_none());
        assert_eq!(view.advice[0].items[0].plain, "Tailor the summary");

        let list = AnalysisResult {
            advice: Advice::List(vec!["a".into(), "b".into()]),
            ..Default::default()
        };
        let view = ResultView::from_result(&list, Language::English);
        assert_eq!(view.advice[0].items.len(), 2);
    }

    #[test]
    fn test_clean_advice_item_bold_and_stray_stars() {
        let item = clean_advice_item("  * **Quantify** your *impact* with **numbers**. ");
        assert_eq!(
            item.segments,
            vec![
                strong("Quantify"),
                plain(" your impact with "),
                strong("numbers"),
                plain("."),
            ]
        );
        assert_eq!(item.plain, "Quantify your impact with numbers.");
    }

    #[test]
    fn test_clean_advice_item_without_markup() {
        let item = clean_advice_item("Add a metrics section");
        assert_eq!(item.segments, vec![plain("Add a metrics section")]);
    }

    #[test]
    fn test_clean_advice_item_only_stars() {
        let item = clean_advice_item(" *** ");
        assert!(item.segments.is_empty());
        assert_eq!(item.plain, "");
    }
}
