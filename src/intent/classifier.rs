use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::normalize::{normalize, tokenize};
use super::{Action, Breakpoint, Confidence, Intent, ScoredField};
use crate::schema::{ComponentSchemaEntry, FieldDescriptor, SchemaIndex};

/// Fields scoring below this are not considered matches
pub const MIN_FIELD_SCORE: u32 = 15;
/// A top score at or above this yields high confidence
pub const HIGH_CONFIDENCE_SCORE: u32 = 50;

const LABEL_WORD_SCORE: u32 = 20;
const NAME_SEGMENT_SCORE: u32 = 15;
const OPTION_SCORE: u32 = 30;
const SECTION_WORD_SCORE: u32 = 10;

/// Phrase → action, checked by substring in this order. First hit wins.
const ACTION_PHRASES: &[(&str, Action)] = &[
    ("change", Action::Change),
    ("set", Action::Change),
    ("make", Action::Change),
    ("update", Action::Change),
    ("modify", Action::Change),
    ("edit", Action::Change),
    ("where", Action::Find),
    ("find", Action::Find),
    ("show", Action::Find),
    ("locate", Action::Find),
    ("how do i", Action::Find),
    ("open", Action::Find),
    ("enable", Action::Enable),
    ("turn on", Action::Enable),
    ("activate", Action::Enable),
    ("disable", Action::Disable),
    ("turn off", Action::Disable),
    ("hide", Action::Disable),
    ("remove", Action::Disable),
];

/// Token → breakpoint. `responsive` is recognized but names no breakpoint.
const BREAKPOINT_KEYWORDS: &[(&str, Option<Breakpoint>)] = &[
    ("phone", Some(Breakpoint::Phone)),
    ("mobile", Some(Breakpoint::Phone)),
    ("tablet", Some(Breakpoint::Tablet)),
    ("ipad", Some(Breakpoint::Tablet)),
    ("desktop", Some(Breakpoint::Desktop)),
    ("laptop", Some(Breakpoint::Desktop)),
    ("responsive", None),
];

lazy_static! {
    static ref VALUE_PATTERNS: [Regex; 2] = [
        Regex::new(r"\bto\s+(#?\w[\w.%-]*)").expect("value pattern"),
        Regex::new(r"[=:]\s?(#?\w[\w.%-]*)").expect("value pattern"),
    ];
}

pub(crate) fn detect_action(normalized: &str) -> Action {
    ACTION_PHRASES
        .iter()
        .find(|(phrase, _)| normalized.contains(phrase))
        .map(|(_, action)| *action)
        .unwrap_or(Action::Find)
}

pub(crate) fn detect_breakpoint(tokens: &[String]) -> Option<Breakpoint> {
    tokens.iter().find_map(|token| {
        BREAKPOINT_KEYWORDS
            .iter()
            .find(|(keyword, _)| keyword == token)
            .map(|(_, breakpoint)| *breakpoint)
    })?
}

pub(crate) fn detect_value(normalized: &str) -> Option<String> {
    VALUE_PATTERNS.iter().find_map(|pattern| {
        pattern.captures(normalized).and_then(|caps| {
            let value = caps.get(1)?.as_str().trim_end_matches(['.', '-']);
            (!value.is_empty()).then(|| value.to_string())
        })
    })
}

/// Score every field against the tokens. Sorted descending; ties keep schema order.
pub fn score_fields(fields: &[FieldDescriptor], tokens: &[String]) -> Vec<ScoredField> {
    let mut scored: Vec<ScoredField> = fields
        .iter()
        .map(|field| ScoredField { field: field.clone(), score: score_field(field, tokens) })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

fn score_field(field: &FieldDescriptor, tokens: &[String]) -> u32 {
    let label = field.label.to_lowercase();
    let label_words: Vec<&str> = label.split_whitespace().collect();
    let segments: Vec<&str> = field.field_name.split('_').collect();
    let section = field.section_label.to_lowercase();
    let section_words: Vec<&str> = section.split_whitespace().collect();

    let mut score = 0;
    for token in tokens {
        let token = token.as_str();
        if label_words.contains(&token) {
            score += LABEL_WORD_SCORE;
        }
        if segments.contains(&token) {
            score += NAME_SEGMENT_SCORE;
        }
        if let Some(options) = &field.options {
            for (key, display) in options {
                if key.to_lowercase() == token || display.to_lowercase() == token {
                    score += OPTION_SCORE;
                }
            }
        }
        if section_words.contains(&token) {
            score += SECTION_WORD_SCORE;
        }
    }
    score
}

/// Stateless classifier over a shared schema index
#[derive(Clone)]
pub struct IntentClassifier {
    index: Arc<SchemaIndex>,
}

impl IntentClassifier {
    pub fn new(index: Arc<SchemaIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Classify a request. Never fails: unresolved inputs degrade confidence.
    pub fn classify(&self, text: &str, component_type: Option<&str>) -> Intent {
        let normalized = normalize(text);
        let tokens = tokenize(&normalized);

        let action = detect_action(&normalized);
        let breakpoint = detect_breakpoint(&tokens);
        let value = detect_value(&normalized);

        let entry = match component_type {
            Some(ct) => self.index.get(ct),
            None => self.resolve_component(&tokens),
        };

        let Some(entry) = entry else {
            debug!("No component resolved for {:?}", text);
            return Intent {
                action,
                component_type: None,
                fields: Vec::new(),
                breakpoint,
                value,
                confidence: Confidence::None,
                raw_text: text.to_string(),
            };
        };

        let fields: Vec<ScoredField> = score_fields(&entry.fields, &tokens)
            .into_iter()
            .filter(|f| f.score >= MIN_FIELD_SCORE)
            .collect();

        let confidence = match fields.first() {
            Some(top) if top.score >= HIGH_CONFIDENCE_SCORE => Confidence::High,
            Some(_) => Confidence::Medium,
            None => Confidence::Low,
        };

        debug!(
            component = %entry.component_type,
            action = action.as_str(),
            matches = fields.len(),
            "Classified request as {:?}",
            confidence
        );

        Intent {
            action,
            component_type: Some(entry.component_type.clone()),
            fields,
            breakpoint,
            value,
            confidence,
            raw_text: text.to_string(),
        }
    }

    fn resolve_component(&self, tokens: &[String]) -> Option<&ComponentSchemaEntry> {
        let joined = tokens.join(" ");
        self.index.entries().iter().find(|entry| {
            let label = entry.label.to_lowercase();
            tokens.iter().any(|t| *t == label)
                || entry
                    .aliases
                    .iter()
                    .any(|alias| !alias.is_empty() && joined.contains(&alias.to_lowercase()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, Tab};
    use indexmap::IndexMap;

    fn tokens(text: &str) -> Vec<String> {
        tokenize(&normalize(text))
    }

    #[test]
    fn test_action_table_order() {
        assert_eq!(detect_action("change the color"), Action::Change);
        assert_eq!(detect_action("where is the color"), Action::Find);
        assert_eq!(detect_action("turn on the overlay"), Action::Enable);
        assert_eq!(detect_action("hide the title"), Action::Disable);
        assert_eq!(detect_action("font size"), Action::Find);
        // change phrases outrank disable phrases
        assert_eq!(detect_action("remove and update"), Action::Change);
    }

    #[test]
    fn test_breakpoint_first_token_wins() {
        assert_eq!(detect_breakpoint(&tokens("font on mobile and desktop")), Some(Breakpoint::Phone));
        assert_eq!(detect_breakpoint(&tokens("ipad size")), Some(Breakpoint::Tablet));
        assert_eq!(detect_breakpoint(&tokens("responsive tablet size")), None);
        assert_eq!(detect_breakpoint(&tokens("font size")), None);
    }

    #[test]
    fn test_value_patterns() {
        assert_eq!(detect_value("change alignment to center"), Some("center".to_string()));
        assert_eq!(detect_value("set color to #ff0000."), Some("#ff0000".to_string()));
        assert_eq!(detect_value("font size: 1.5em"), Some("1.5em".to_string()));
        assert_eq!(detect_value("width=50%"), Some("50%".to_string()));
        assert_eq!(detect_value("where is the font"), None);
    }

    #[test]
    fn test_option_match_ignores_unicode_case() {
        let mut options = IndexMap::new();
        options.insert("high".to_string(), "Élevé".to_string());
        let field = FieldDescriptor {
            field_name: "priority".to_string(),
            label: "Priority".to_string(),
            field_type: FieldType::Select,
            tab: Tab::General,
            section_name: "main".to_string(),
            section_label: "Main".to_string(),
            options: Some(options),
            responsive: false,
            default: None,
        };

        let scored = score_fields(std::slice::from_ref(&field), &tokens("ÉLEVÉ"));
        assert_eq!(scored[0].score, OPTION_SCORE);
        assert_eq!(field.option_key_for("ÉLEVÉ"), Some("high"));
        assert_eq!(field.option_display("HIGH"), Some("Élevé"));
    }

    #[test]
    fn test_classify_without_index_has_no_confidence() {
        let classifier = IntentClassifier::new(Arc::new(SchemaIndex::new()));
        let intent = classifier.classify("change text alignment to center", Some("et_pb_text"));
        assert_eq!(intent.confidence, Confidence::None);
        assert!(intent.fields.is_empty());
        assert_eq!(intent.action, Action::Change);
        assert_eq!(intent.value.as_deref(), Some("center"));
    }
}
