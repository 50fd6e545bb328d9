//! Guidance Plan Builder
//!
//! Pure translation of an [`Intent`] into UI steps and a chat message.

use super::step::{GuidancePlan, GuidanceStep, Tooltip};
use crate::intent::{Action, Breakpoint, Intent};
use crate::schema::{FieldDescriptor, Tab};

pub const SELECT_COMPONENT_MESSAGE: &str =
    "Please select a component in the builder first so I know which settings to look at.";

/// Position of a tab in the settings panel tab bar
pub fn tab_index(tab: &Tab) -> usize {
    match tab.as_str() {
        "general" => 0,
        "design" => 1,
        "advanced" => 2,
        "ai" => 3,
        _ => 0,
    }
}

pub fn no_match_message(component_type: &str) -> String {
    format!(
        "I couldn't find a setting matching that in the {} component. Try rephrasing, for example \"change the text color\" or \"where is the font size\".",
        component_type
    )
}

pub fn build_plan(intent: &Intent) -> GuidancePlan {
    let Some(component_type) = intent.component_type.as_deref() else {
        return GuidancePlan::failure(SELECT_COMPONENT_MESSAGE);
    };

    let target = match intent.fields.first() {
        Some(top) => &top.field,
        None => return GuidancePlan::failure(no_match_message(component_type)),
    };

    let responsive_breakpoint = intent.breakpoint.filter(|_| target.responsive);

    let mut steps = vec![
        GuidanceStep::OpenSettings,
        GuidanceStep::SwitchTab { tab: target.tab.clone(), tab_index: tab_index(&target.tab) },
        GuidanceStep::ExpandSection {
            section_name: target.section_name.clone(),
            section_label: target.section_label.clone(),
        },
        GuidanceStep::HighlightField {
            field_name: target.field_name.clone(),
            tooltip: Some(build_tooltip(intent, target, responsive_breakpoint)),
        },
    ];
    if let Some(breakpoint) = responsive_breakpoint {
        steps.push(GuidanceStep::ShowResponsive { breakpoint });
    }

    GuidancePlan { steps, message: build_message(intent, target, responsive_breakpoint), success: true }
}

fn display_value<'a>(field: &'a FieldDescriptor, value: &'a str) -> &'a str {
    field.option_display(value).unwrap_or(value)
}

fn option_list(field: &FieldDescriptor) -> Option<String> {
    let options = field.options.as_ref().filter(|o| !o.is_empty())?;
    Some(options.values().cloned().collect::<Vec<_>>().join(", "))
}

fn build_tooltip(intent: &Intent, field: &FieldDescriptor, breakpoint: Option<Breakpoint>) -> Tooltip {
    let mut body = match (intent.action, intent.value.as_deref()) {
        (Action::Change, Some(value)) => format!("Set this to \"{}\"", display_value(field, value)),
        (Action::Find, _) => {
            let mut body = format!("This is the \"{}\" setting.", field.label);
            if let Some(options) = option_list(field) {
                body.push_str(&format!(" Available options: {}.", options));
            }
            body
        }
        (Action::Enable, _) => "Switch this to Yes to enable it.".to_string(),
        (Action::Disable, _) => "Switch this to No to disable it.".to_string(),
        _ => format!(
            "You can adjust this in the {} tab under {}.",
            field.tab.display_name(),
            field.section_label
        ),
    };

    if let Some(bp) = breakpoint {
        body.push_str(&format!(
            " Use the responsive toggle to set a separate {} value.",
            bp.display_name()
        ));
    }

    Tooltip { title: field.label.clone(), body }
}

fn build_message(intent: &Intent, field: &FieldDescriptor, breakpoint: Option<Breakpoint>) -> String {
    let mut message = format!(
        "Found **{}** in the **{}** tab > **{}** section.",
        field.label,
        field.tab.display_name(),
        field.section_label
    );

    if let (Action::Change, Some(value)) = (intent.action, intent.value.as_deref()) {
        message.push_str(&format!(" Set it to **{}**.", display_value(field, value)));
    }

    if let Some(bp) = breakpoint {
        message.push_str(&format!(
            " Use the responsive toggle to edit the **{}** value.",
            bp.display_name()
        ));
    }

    if intent.fields.len() > 1 {
        let others: Vec<&str> =
            intent.fields.iter().skip(1).take(2).map(|f| f.field.label.as_str()).collect();
        message.push_str(&format!("\n\nOther possible matches: {}.", others.join(", ")));
    }

    message
}
