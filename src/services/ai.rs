//! Remote AI service boundary
//!
//! Two round trips (analyze, then generate) plus best-effort validation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AiError;

/// Opaque result of the analyze stage, passed back to generate unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedChange {
    pub field: String,
    pub new_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedChanges {
    pub changes: Vec<ProposedChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[async_trait]
pub trait AiService: Send + Sync {
    async fn analyze(
        &self,
        prompt: &str,
        component_type: &str,
        component_data: &Map<String, Value>,
    ) -> Result<AnalysisResult, AiError>;

    async fn generate(
        &self,
        analysis: &AnalysisResult,
        component_type: &str,
        component_data: &Map<String, Value>,
    ) -> Result<GeneratedChanges, AiError>;

    async fn validate_changeset(
        &self,
        component_type: &str,
        changes: &[ProposedChange],
    ) -> Result<ValidationResult, AiError>;
}

/// Used when no AI provider is configured
pub struct DisabledAiService;

#[async_trait]
impl AiService for DisabledAiService {
    async fn analyze(&self, _: &str, _: &str, _: &Map<String, Value>) -> Result<AnalysisResult, AiError> {
        Err(AiError::FeatureDisabled)
    }

    async fn generate(
        &self,
        _: &AnalysisResult,
        _: &str,
        _: &Map<String, Value>,
    ) -> Result<GeneratedChanges, AiError> {
        Err(AiError::FeatureDisabled)
    }

    async fn validate_changeset(&self, _: &str, _: &[ProposedChange]) -> Result<ValidationResult, AiError> {
        Err(AiError::FeatureDisabled)
    }
}
