//! Dispatch Policy
//!
//! Pure routing of a classified intent, in fixed priority order:
//! no selection, find → guidance, simple local change, AI escalation,
//! fallback → guidance.

use crate::intent::{Action, Confidence, Intent};
use crate::schema::{FieldDescriptor, FieldType};

/// A value that can be written straight to one field
#[derive(Debug, Clone, PartialEq)]
pub struct LocalChange {
    pub field: FieldDescriptor,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    NoSelection,
    Guidance,
    LocalChange(LocalChange),
    AiEscalation,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::NoSelection => "no_selection",
            Route::Guidance => "guidance",
            Route::LocalChange(_) => "local_change",
            Route::AiEscalation => "ai_escalation",
        }
    }
}

/// Fields whose values are too rich to set from a single word
pub fn is_complex_field(field: &FieldDescriptor) -> bool {
    matches!(field.field_type, FieldType::RichText | FieldType::Code)
        || field.field_name.starts_with("custom_css")
}

/// Value to write for the intent, if one can be derived locally.
pub fn resolve_local_value(intent: &Intent, field: &FieldDescriptor) -> Option<String> {
    match intent.action {
        Action::Enable => Some("on".to_string()),
        Action::Disable => Some("off".to_string()),
        Action::Change => {
            let value = intent.value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
            Some(field.option_key_for(value).unwrap_or(value).to_string())
        }
        Action::Find => None,
    }
}

/// High confidence, exactly one match, a resolvable value and a plain field type.
pub fn simple_local_change(intent: &Intent) -> Option<LocalChange> {
    if !intent.action.is_mutation() || intent.confidence != Confidence::High {
        return None;
    }
    let [only] = intent.fields.as_slice() else {
        return None;
    };
    if is_complex_field(&only.field) {
        return None;
    }
    let value = resolve_local_value(intent, &only.field)?;
    Some(LocalChange { field: only.field.clone(), value })
}

pub fn route(intent: &Intent, has_selection: bool) -> Route {
    if !has_selection {
        return Route::NoSelection;
    }
    if intent.action == Action::Find {
        return Route::Guidance;
    }
    if let Some(change) = simple_local_change(intent) {
        return Route::LocalChange(change);
    }
    if intent.action.is_mutation() {
        return Route::AiEscalation;
    }
    Route::Guidance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ScoredField;
    use crate::schema::Tab;
    use indexmap::IndexMap;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        let mut options = IndexMap::new();
        options.insert("center".to_string(), "Center".to_string());
        options.insert("justified".to_string(), "Justify".to_string());
        FieldDescriptor {
            field_name: name.to_string(),
            label: name.to_string(),
            field_type,
            tab: Tab::Design,
            section_name: "text".to_string(),
            section_label: "Text".to_string(),
            options: Some(options),
            responsive: false,
            default: None,
        }
    }

    fn intent(action: Action, fields: Vec<FieldDescriptor>, value: Option<&str>, confidence: Confidence) -> Intent {
        Intent {
            action,
            component_type: Some("et_pb_text".to_string()),
            fields: fields.into_iter().map(|field| ScoredField { field, score: 60 }).collect(),
            breakpoint: None,
            value: value.map(str::to_string),
            confidence,
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_no_selection_first() {
        let i = intent(Action::Find, vec![], None, Confidence::None);
        assert_eq!(route(&i, false), Route::NoSelection);
    }

    #[test]
    fn test_find_routes_to_guidance() {
        let i = intent(Action::Find, vec![field("text_orientation", FieldType::Select)], None, Confidence::High);
        assert_eq!(route(&i, true), Route::Guidance);
    }

    #[test]
    fn test_simple_change_maps_display_to_key() {
        let i = intent(
            Action::Change,
            vec![field("text_orientation", FieldType::Select)],
            Some("justify"),
            Confidence::High,
        );
        match route(&i, true) {
            Route::LocalChange(change) => assert_eq!(change.value, "justified"),
            other => panic!("unexpected route: {:?}", other),
        }
    }

    #[test]
    fn test_toggle_values() {
        let f = field("show_title", FieldType::Toggle);
        let on = intent(Action::Enable, vec![f.clone()], None, Confidence::High);
        let off = intent(Action::Disable, vec![f], None, Confidence::High);
        assert_eq!(simple_local_change(&on).map(|c| c.value).as_deref(), Some("on"));
        assert_eq!(simple_local_change(&off).map(|c| c.value).as_deref(), Some("off"));
    }

    #[test]
    fn test_escalation_cases() {
        let plain = field("text_orientation", FieldType::Select);
        // medium confidence
        let i = intent(Action::Change, vec![plain.clone()], Some("center"), Confidence::Medium);
        assert_eq!(route(&i, true), Route::AiEscalation);
        // two matches
        let i = intent(Action::Change, vec![plain.clone(), plain.clone()], Some("center"), Confidence::High);
        assert_eq!(route(&i, true), Route::AiEscalation);
        // no value
        let i = intent(Action::Change, vec![plain], None, Confidence::High);
        assert_eq!(route(&i, true), Route::AiEscalation);
        // complex field types
        for f in [field("content", FieldType::RichText), field("custom_css_main", FieldType::Text)] {
            let i = intent(Action::Change, vec![f], Some("center"), Confidence::High);
            assert_eq!(route(&i, true), Route::AiEscalation);
        }
    }
}
