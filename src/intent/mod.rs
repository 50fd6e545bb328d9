//! Intent Classification
//!
//! Turns free text plus an optional component type into a structured
//! [`Intent`]. Deterministic and offline: no network, no model.

mod classifier;
mod normalize;

pub use classifier::{score_fields, IntentClassifier, HIGH_CONFIDENCE_SCORE, MIN_FIELD_SCORE};
pub use normalize::{normalize, tokenize};

use serde::{Deserialize, Serialize};

use crate::schema::FieldDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Change,
    Find,
    Enable,
    Disable,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Change => "change",
            Action::Find => "find",
            Action::Enable => "enable",
            Action::Disable => "disable",
        }
    }

    /// Actions that modify the component rather than locate a setting
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Action::Find)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Phone,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Phone, Breakpoint::Tablet, Breakpoint::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Phone => "phone",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Breakpoint::Phone => "Phone",
            Breakpoint::Tablet => "Tablet",
            Breakpoint::Desktop => "Desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

/// A field candidate with its match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredField {
    pub field: FieldDescriptor,
    pub score: u32,
}

/// Structured interpretation of one user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    pub component_type: Option<String>,
    /// Matched fields, highest score first
    pub fields: Vec<ScoredField>,
    pub breakpoint: Option<Breakpoint>,
    pub value: Option<String>,
    pub confidence: Confidence,
    pub raw_text: String,
}

impl Intent {
    pub fn top_field(&self) -> Option<&ScoredField> {
        self.fields.first()
    }
}
