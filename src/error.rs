//! Error types
//!
//! Every failure is caught where it happens and turned into a chat message
//! through [`AssistError::user_message`]. Nothing propagates to the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the remote AI service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("AI editing is disabled")]
    FeatureDisabled,

    #[error("AI provider credentials are missing")]
    MissingCredentials,

    #[error("malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("AI request failed: {0}")]
    Failed(String),
}

impl AiError {
    /// Map an error code returned by the AI endpoint onto a failure kind.
    pub fn from_code(code: &str, detail: impl Into<String>) -> Self {
        match code {
            "feature_disabled" | "ai_disabled" => AiError::FeatureDisabled,
            "no_api_key" | "missing_api_key" | "missing_credentials" => AiError::MissingCredentials,
            "invalid_response" | "parse_error" | "malformed_response" => {
                AiError::MalformedResponse(detail.into())
            }
            _ => AiError::Failed(detail.into()),
        }
    }
}

/// The stage of the AI round trip that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiStage {
    Analyze,
    Generate,
    Validate,
}

impl AiStage {
    fn activity(&self) -> &'static str {
        match self {
            AiStage::Analyze => "analyzing your request",
            AiStage::Generate => "generating the changes",
            AiStage::Validate => "validating the changes",
        }
    }
}

impl std::fmt::Display for AiStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiStage::Analyze => write!(f, "analyze"),
            AiStage::Generate => write!(f, "generate"),
            AiStage::Validate => write!(f, "validate"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot not found: {0}")]
    NotFound(String),

    #[error("snapshot storage failed: {0}")]
    Storage(String),
}

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("no component is selected")]
    NoSelection,

    #[error("no setting matched in component '{component_type}'")]
    NoMatch { component_type: String },

    #[error("field '{0}' could not be located")]
    LocatorMiss(String),

    #[error("AI {stage} stage failed: {source}")]
    AiStage {
        stage: AiStage,
        #[source]
        source: AiError,
    },

    #[error("changeset rejected: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("the component is no longer selected")]
    ApplyFailed,

    #[error("undo failed: {0}")]
    Undo(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl AssistError {
    /// Chat-visible text for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AssistError::NoSelection => {
                "Please select a component in the builder first, then tell me what you want to change."
                    .to_string()
            }
            AssistError::NoMatch { component_type } => crate::guidance::no_match_message(component_type),
            AssistError::LocatorMiss(field) => {
                format!("I couldn't find the \"{}\" control on screen.", field)
            }
            AssistError::AiStage { stage, source } => match source {
                AiError::FeatureDisabled => {
                    "AI editing is turned off. Enable it in the assistant settings to make complex changes."
                        .to_string()
                }
                AiError::MissingCredentials => {
                    "No AI provider API key is configured. Add one in the assistant settings."
                        .to_string()
                }
                AiError::MalformedResponse(_) => {
                    "The AI returned a response I couldn't understand. Please try rephrasing your request."
                        .to_string()
                }
                AiError::Failed(detail) => {
                    format!("Something went wrong while {}: {}", stage.activity(), detail)
                }
            },
            AssistError::Validation(errors) => format!(
                "The proposed changes failed validation: {}",
                errors.join("; ")
            ),
            AssistError::ApplyFailed => {
                "The changes could not be applied because the component is no longer selected."
                    .to_string()
            }
            AssistError::Undo(detail) => format!("Undo failed: {}", detail),
            AssistError::Snapshot(e) => format!("Snapshot error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_error_from_code() {
        assert_eq!(AiError::from_code("feature_disabled", ""), AiError::FeatureDisabled);
        assert_eq!(AiError::from_code("no_api_key", ""), AiError::MissingCredentials);
        assert_eq!(
            AiError::from_code("parse_error", "bad json"),
            AiError::MalformedResponse("bad json".to_string())
        );
        assert_eq!(
            AiError::from_code("http_500", "upstream down"),
            AiError::Failed("upstream down".to_string())
        );
    }

    #[test]
    fn test_stage_specific_messages() {
        let disabled = AssistError::AiStage { stage: AiStage::Analyze, source: AiError::FeatureDisabled };
        assert!(disabled.user_message().contains("turned off"));

        let generic = AssistError::AiStage {
            stage: AiStage::Generate,
            source: AiError::Failed("timeout".to_string()),
        };
        let msg = generic.user_message();
        assert!(msg.contains("generating the changes"));
        assert!(msg.contains("timeout"));

        let validate = AssistError::AiStage {
            stage: AiStage::Validate,
            source: AiError::Failed("timeout".to_string()),
        };
        assert_eq!(validate.to_string(), "AI validate stage failed: AI request failed: timeout");
        assert!(validate.user_message().contains("validating the changes"));
    }

    #[test]
    fn test_validation_message_joins_errors() {
        let err = AssistError::Validation(vec!["bad color".to_string(), "unknown field".to_string()]);
        assert_eq!(
            err.user_message(),
            "The proposed changes failed validation: bad color; unknown field"
        );
    }
}
