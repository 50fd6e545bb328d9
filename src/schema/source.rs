use anyhow::{Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

use super::raw::RawSchema;

/// Read-only provider of raw component schemas
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// All schemas, in the order the source defines them
    async fn all_schemas(&self) -> Result<Vec<(String, RawSchema)>>;
}

/// Schemas stored as one ordered JSON object: `{ "<component_type>": RawSchema, ... }`
pub struct JsonSchemaSource {
    path: PathBuf,
}

impl JsonSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse schema JSON text. Entries that do not fit the raw schema shape are skipped.
    pub fn parse(content: &str) -> Result<Vec<(String, RawSchema)>> {
        let root: IndexMap<String, Value> =
            serde_json::from_str(content).context("schema file is not a JSON object")?;

        let mut schemas = Vec::with_capacity(root.len());
        for (component_type, value) in root {
            match serde_json::from_value::<RawSchema>(value) {
                Ok(schema) => schemas.push((component_type, schema)),
                Err(e) => warn!("Skipping malformed schema {}: {}", component_type, e),
            }
        }
        Ok(schemas)
    }
}

#[async_trait]
impl SchemaSource for JsonSchemaSource {
    async fn all_schemas(&self) -> Result<Vec<(String, RawSchema)>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read schemas from {}", self.path.display()))?;
        let schemas = Self::parse(&content)?;
        debug!("Loaded {} schemas from {}", schemas.len(), self.path.display());
        Ok(schemas)
    }
}
