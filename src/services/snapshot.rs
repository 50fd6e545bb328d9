//! Snapshot persistence boundary
//!
//! Component data is saved before every apply so the change can be rolled back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::SnapshotError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackTarget {
    Snapshot(String),
    /// Latest snapshot of a component
    Component(String),
}

#[async_trait]
pub trait SnapshotService: Send + Sync {
    async fn save_snapshot(
        &self,
        component_id: &str,
        component_type: &str,
        data: &Map<String, Value>,
        label: &str,
    ) -> Result<String, SnapshotError>;

    /// Restore a snapshot and return the data it held
    async fn rollback(&self, target: &RollbackTarget) -> Result<Map<String, Value>, SnapshotError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub component_id: String,
    pub component_type: String,
    pub label: String,
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Bounded per-component snapshot history kept in memory
pub struct MemorySnapshotStore {
    history: RwLock<HashMap<String, VecDeque<Snapshot>>>,
    max_per_component: usize,
}

impl MemorySnapshotStore {
    pub fn new(max_per_component: usize) -> Self {
        Self { history: RwLock::new(HashMap::new()), max_per_component: max_per_component.max(1) }
    }

    pub async fn history(&self, component_id: &str) -> Vec<Snapshot> {
        self.history
            .read()
            .await
            .get(component_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new(20)
    }
}

#[async_trait]
impl SnapshotService for MemorySnapshotStore {
    async fn save_snapshot(
        &self,
        component_id: &str,
        component_type: &str,
        data: &Map<String, Value>,
        label: &str,
    ) -> Result<String, SnapshotError> {
        let snapshot = Snapshot {
            id: Uuid::new_v4().to_string(),
            component_id: component_id.to_string(),
            component_type: component_type.to_string(),
            label: label.to_string(),
            data: data.clone(),
            created_at: Utc::now(),
        };
        let id = snapshot.id.clone();

        let mut history = self.history.write().await;
        let entries = history.entry(component_id.to_string()).or_default();
        entries.push_back(snapshot);
        while entries.len() > self.max_per_component {
            entries.pop_front();
        }
        debug!("Saved snapshot {} for {}", id, component_id);
        Ok(id)
    }

    async fn rollback(&self, target: &RollbackTarget) -> Result<Map<String, Value>, SnapshotError> {
        let mut history = self.history.write().await;
        match target {
            RollbackTarget::Snapshot(id) => {
                for entries in history.values_mut() {
                    if let Some(pos) = entries.iter().position(|s| &s.id == id) {
                        // Later snapshots describe states that no longer exist
                        let restored = entries.drain(pos..).next();
                        return restored
                            .map(|s| s.data)
                            .ok_or_else(|| SnapshotError::NotFound(id.clone()));
                    }
                }
                Err(SnapshotError::NotFound(id.clone()))
            }
            RollbackTarget::Component(component_id) => history
                .get_mut(component_id)
                .and_then(|entries| entries.pop_back())
                .map(|s| s.data)
                .ok_or_else(|| SnapshotError::NotFound(component_id.clone())),
        }
    }
}
