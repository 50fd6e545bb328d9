use serde::{Deserialize, Serialize};

use crate::intent::Breakpoint;
use crate::schema::Tab;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    pub title: String,
    pub body: String,
}

/// One UI action in a guidance sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GuidanceStep {
    OpenSettings,
    SwitchTab {
        tab: Tab,
        tab_index: usize,
    },
    ExpandSection {
        section_name: String,
        section_label: String,
    },
    HighlightField {
        field_name: String,
        tooltip: Option<Tooltip>,
    },
    ShowResponsive {
        breakpoint: Breakpoint,
    },
    ShowTooltip {
        /// Selector of the anchor element; the settings panel when absent
        target: Option<String>,
        title: String,
        body: String,
    },
}

impl GuidanceStep {
    pub fn kind(&self) -> &'static str {
        match self {
            GuidanceStep::OpenSettings => "open_settings",
            GuidanceStep::SwitchTab { .. } => "switch_tab",
            GuidanceStep::ExpandSection { .. } => "expand_section",
            GuidanceStep::HighlightField { .. } => "highlight_field",
            GuidanceStep::ShowResponsive { .. } => "show_responsive",
            GuidanceStep::ShowTooltip { .. } => "show_tooltip",
        }
    }
}

/// Result of planning: steps to run plus the chat message to show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidancePlan {
    pub steps: Vec<GuidanceStep>,
    pub message: String,
    pub success: bool,
}

impl GuidancePlan {
    pub fn failure(message: impl Into<String>) -> Self {
        Self { steps: Vec::new(), message: message.into(), success: false }
    }
}
