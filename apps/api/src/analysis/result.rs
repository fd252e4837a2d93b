//! Tolerant analysis result schema.
//!
//! Model replies drift between a structured shape and older flat shapes, and
//! fields go missing. Each multi-shape field is a small enum with one
//! `from_value` function; nothing downstream inspects raw JSON.
//!
//! Serialization writes every variant back in its own JSON shape, so the
//! serialized form of a result normalizes to an equal result.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::analysis::models::AdviceCategory;

/// Normalized model output for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Nominally 0–100; not range-checked.
    pub match_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub match_explanation: String,
    /// Legacy top-level field some replies still carry.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub score_explanation: String,
    pub priorities: Vec<Priority>,
    pub matched: Vec<MatchedItem>,
    pub missing: Vec<MissingItem>,
    pub advice: Advice,
}

/// A key skill or experience the job asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Priority {
    Weighted {
        name: String,
        weight: f64,
        explanation: String,
    },
    Plain(String),
}

/// Something the résumé covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchedItem {
    Evidence { item: String, evidence: Vec<String> },
    Described { title: String, description: String },
    Plain(String),
}

/// Something the résumé lacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MissingItem {
    Action { item: String, action: String },
    Described { title: String, description: String },
    Plain(String),
}

/// One labelled advice group, in the order the model returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceSection {
    pub label: String,
    pub items: Vec<String>,
}

impl AdviceSection {
    pub fn category(&self) -> Option<AdviceCategory> {
        AdviceCategory::from_label(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    Sections(Vec<AdviceSection>),
    Text(String),
    List(Vec<String>),
}

impl Default for Advice {
    fn default() -> Self {
        Advice::List(Vec::new())
    }
}

impl Advice {
    pub fn is_empty(&self) -> bool {
        match self {
            Advice::Sections(sections) => sections.iter().all(|s| s.items.is_empty()),
            Advice::Text(text) => text.trim().is_empty(),
            Advice::List(items) => items.is_empty(),
        }
    }
}

impl Serialize for Advice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Advice::Sections(sections) => {
                let mut map = serializer.serialize_map(Some(sections.len()))?;
                for section in sections {
                    map.serialize_entry(&section.label, &section.items)?;
                }
                map.end()
            }
            Advice::Text(text) => serializer.serialize_str(text),
            Advice::List(items) => items.serialize(serializer),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field tolerance mapping
// ────────────────────────────────────────────────────────────────────────────

impl AnalysisResult {
    /// Maps a parsed reply object onto the tolerant schema. Unknown keys are
    /// ignored; absent or mis-shaped keys fall back to their defaults.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        AnalysisResult {
            match_score: obj.get("match_score").and_then(integer_of).unwrap_or(0),
            confidence: obj.get("confidence").and_then(number_of),
            match_explanation: obj.get("match_explanation").and_then(text_of).unwrap_or_default(),
            score_explanation: obj.get("score_explanation").and_then(text_of).unwrap_or_default(),
            priorities: collect(obj.get("priorities"), Priority::from_value),
            matched: collect(obj.get("matched"), MatchedItem::from_value),
            missing: collect(obj.get("missing"), MissingItem::from_value),
            advice: obj.get("advice").map(Advice::from_value).unwrap_or_default(),
        }
    }
}

impl Priority {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => {
                match first_text(map, &["name", "item", "title"]) {
                    Some(name) => Some(Priority::Weighted {
                        name,
                        weight: map.get("weight").and_then(number_of).unwrap_or(0.0),
                        explanation: map.get("explanation").and_then(text_of).unwrap_or_default(),
                    }),
                    None => Some(Priority::Plain(value.to_string())),
                }
            }
            other => Some(Priority::Plain(plain_text(other))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Priority::Weighted { name, .. } => name,
            Priority::Plain(name) => name,
        }
    }
}

impl MatchedItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) if map.contains_key("item") => Some(MatchedItem::Evidence {
                item: map.get("item").and_then(text_of).unwrap_or_default(),
                evidence: map.get("evidence").map(string_list).unwrap_or_default(),
            }),
            Value::Object(map) if map.contains_key("title") => Some(MatchedItem::Described {
                title: map.get("title").and_then(text_of).unwrap_or_default(),
                description: map.get("description").and_then(text_of).unwrap_or_default(),
            }),
            other => Some(MatchedItem::Plain(plain_text(other))),
        }
    }
}

impl MissingItem {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) if map.contains_key("item") => Some(MissingItem::Action {
                item: map.get("item").and_then(text_of).unwrap_or_default(),
                action: map.get("action").and_then(text_of).unwrap_or_default(),
            }),
            Value::Object(map) if map.contains_key("title") => Some(MissingItem::Described {
                title: map.get("title").and_then(text_of).unwrap_or_default(),
                description: map.get("description").and_then(text_of).unwrap_or_default(),
            }),
            other => Some(MissingItem::Plain(plain_text(other))),
        }
    }
}

impl Advice {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Advice::Sections(
                map.iter()
                    .map(|(label, items)| AdviceSection {
                        label: label.clone(),
                        items: string_list(items),
                    })
                    .collect(),
            ),
            Value::Array(_) => Advice::List(string_list(value)),
            Value::Null => Advice::default(),
            other => Advice::Text(plain_text(other)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Value coercion helpers
// ────────────────────────────────────────────────────────────────────────────

fn collect<T>(value: Option<&Value>, map_item: fn(&Value) -> Option<T>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(map_item).collect(),
        Some(Value::Null) | None => Vec::new(),
        // A lone element where a list was expected.
        Some(single) => map_item(single).into_iter().collect(),
    }
}

/// Scalars as text; containers and null are not text.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text of a scalar, or compact JSON of anything else.
fn plain_text(value: &Value) -> String {
    text_of(value).unwrap_or_else(|| value.to_string())
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| map.get(*k).and_then(text_of))
}

fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| number_of(value).map(|f| f.round() as i64)),
        _ => number_of(value).map(|f| f.round() as i64),
    }
}

/// A list of strings from an array (scalars as text, other elements as JSON,
/// nulls dropped) or from a single scalar.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(plain_text)
            .collect(),
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        other => vec![plain_text(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn from(value: Value) -> AnalysisResult {
        AnalysisResult::from_object(value.as_object().unwrap())
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let result = from(json!({}));
        assert_eq!(result, AnalysisResult::default());
        assert_eq!(result.match_score, 0);
        assert!(result.confidence.is_none());
        assert!(result.priorities.is_empty());
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert_eq!(result.advice, Advice::List(vec![]));
    }

    #[test]
    fn test_match_score_coercions() {
        assert_eq!(from(json!({"match_score": 75})).match_score, 75);
        assert_eq!(from(json!({"match_score": 74.6})).match_score, 75);
        assert_eq!(from(json!({"match_score": "62"})).match_score, 62);
        assert_eq!(from(json!({"match_score": "80%"})).match_score, 80);
        assert_eq!(from(json!({"match_score": "high"})).match_score, 0);
        assert_eq!(from(json!({"match_score": null})).match_score, 0);
        // Out of the nominal range is kept as-is.
        assert_eq!(from(json!({"match_score": 140})).match_score, 140);
    }

    #[test]
    fn test_confidence_accepts_number_and_string() {
        assert_eq!(from(json!({"confidence": 0.85})).confidence, Some(0.85));
        assert_eq!(from(json!({"confidence": "0.4"})).confidence, Some(0.4));
        assert_eq!(from(json!({"confidence": [1]})).confidence, None);
    }

    #[test]
    fn test_priorities_structured_and_legacy() {
        let result = from(json!({
            "priorities": [
                {"name": "Rust", "weight": 0.9, "explanation": "Named in the title"},
                "Kubernetes",
                {"name": "SQL"},
                null
            ]
        }));
        assert_eq!(
            result.priorities,
            vec![
                Priority::Weighted {
                    name: "Rust".into(),
                    weight: 0.9,
                    explanation: "Named in the title".into()
                },
                Priority::Plain("Kubernetes".into()),
                Priority::Weighted {
                    name: "SQL".into(),
                    weight: 0.0,
                    explanation: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_priority_object_without_name_is_kept_as_plain() {
        let priority = Priority::from_value(&json!({"weight": 0.5})).unwrap();
        assert_eq!(priority, Priority::Plain(r#"{"weight":0.5}"#.into()));
    }

    #[test]
    fn test_matched_accepts_all_three_shapes() {
        let shapes = [
            json!([{"item": "X", "evidence": ["a"]}]),
            json!(["X"]),
            json!([{"title": "X", "description": "d"}]),
        ];
        for shape in shapes {
            let result = from(json!({ "matched": shape.clone() }));
            assert_eq!(result.matched.len(), 1, "shape {shape} produced nothing");
        }
    }

    #[test]
    fn test_matched_evidence_as_single_string() {
        let item = MatchedItem::from_value(&json!({"item": "React", "evidence": "3 years"})).unwrap();
        assert_eq!(
            item,
            MatchedItem::Evidence {
                item: "React".into(),
                evidence: vec!["3 years".into()]
            }
        );
    }

    #[test]
    fn test_missing_accepts_all_three_shapes() {
        let result = from(json!({
            "missing": [
                {"item": "Kafka", "action": "Build a small event pipeline"},
                {"title": "Go", "description": "Not mentioned"},
                "Terraform",
                42
            ]
        }));
        assert_eq!(result.missing.len(), 4);
        assert!(matches!(result.missing[0], MissingItem::Action { .. }));
        assert!(matches!(result.missing[1], MissingItem::Described { .. }));
        assert_eq!(result.missing[2], MissingItem::Plain("Terraform".into()));
        assert_eq!(result.missing[3], MissingItem::Plain("42".into()));
    }

    #[test]
    fn test_lone_object_where_list_expected() {
        let result = from(json!({"matched": {"item": "Rust", "evidence": []}}));
        assert_eq!(result.matched.len(), 1);
    }

    #[test]
    fn test_advice_sections_keep_order_and_unknown_labels() {
        let result = from(json!({
            "advice": {
                "面試準備建議": ["Prepare a STAR story"],
                "Salary Negotiation": ["Research the band"],
                "履歷優化": "Lead with impact"
            }
        }));
        let Advice::Sections(sections) = &result.advice else {
            panic!("expected sections, got {:?}", result.advice);
        };
        let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["面試準備建議", "Salary Negotiation", "履歷優化"]);
        assert_eq!(sections[0].category(), Some(AdviceCategory::InterviewPrep));
        assert_eq!(sections[1].category(), None);
        assert_eq!(sections[2].items, vec!["Lead with impact".to_string()]);
    }

    #[test]
    fn test_advice_text_and_list_shapes() {
        assert_eq!(
            from(json!({"advice": "Tailor the summary"})).advice,
            Advice::Text("Tailor the summary".into())
        );
        assert_eq!(
            from(json!({"advice": ["One", null, "Two"]})).advice,
            Advice::List(vec!["One".into(), "Two".into()])
        );
    }

    #[test]
    fn test_advice_is_empty() {
        assert!(Advice::default().is_empty());
        assert!(Advice::Text("  ".into()).is_empty());
        assert!(Advice::Sections(vec![AdviceSection {
            label: "Portfolio".into(),
            items: vec![]
        }])
        .is_empty());
        assert!(!Advice::List(vec!["x".into()]).is_empty());
    }

    #[test]
    fn test_serialization_uses_reply_shapes() {
        let result = from(json!({
            "match_score": 70,
            "priorities": ["Rust"],
            "matched": [{"title": "API design", "description": "Built REST APIs"}],
            "advice": {"Portfolio": ["Ship a CLI"]}
        }));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["priorities"], json!(["Rust"]));
        assert_eq!(
            value["matched"],
            json!([{"title": "API design", "description": "Built REST APIs"}])
        );
        assert_eq!(value["advice"], json!({"Portfolio": ["Ship a CLI"]}));
        assert!(value.get("confidence").is_none());
        assert!(value.get("score_explanation").is_none());
    }
}
