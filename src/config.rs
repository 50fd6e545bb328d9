use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::guidance::GuidanceTimings;

pub const CONFIG_ENV: &str = "PAGE_ASSIST_CONFIG";
pub const SCHEMAS_ENV: &str = "PAGE_ASSIST_SCHEMAS";
const DEFAULT_CONFIG_PATH: &str = "page_assist.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistConfig {
    pub guidance: GuidanceTimings,
    /// Snapshots kept per component
    pub snapshot_history: usize,
    pub schemas_path: Option<PathBuf>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self { guidance: GuidanceTimings::default(), snapshot_history: 20, schemas_path: None }
    }
}

impl AssistConfig {
    /// Schema file: `PAGE_ASSIST_SCHEMAS` wins over the configured path.
    pub fn resolve_schemas_path(&self) -> Option<PathBuf> {
        std::env::var(SCHEMAS_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.schemas_path.clone())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `PAGE_ASSIST_CONFIG`, else `page_assist.json`
    pub fn from_env() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<AssistConfig> {
        if !self.path.exists() {
            let default = AssistConfig::default();
            self.save(&default).await?;
            info!("Wrote default config to {}", self.path.display());
            return Ok(default);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read config {}", self.path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", self.path.display()))?;
        Ok(config)
    }

    pub async fn save(&self, config: &AssistConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("failed to write config {}", self.path.display()))?;
        Ok(())
    }
}
