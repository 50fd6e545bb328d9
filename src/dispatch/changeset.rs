//! Changesets and undo
//!
//! A changeset is previewed (old → new per field) before it is applied;
//! once applied, an [`UndoHandle`] can restore the saved snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::AssistError;
use crate::events::{AssistEvent, EventBus};
use crate::services::{FieldChanges, HostCapability, RollbackTarget, SnapshotService};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub label: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesetPreview {
    pub component_id: String,
    pub component_type: String,
    pub changes: Vec<FieldChange>,
    pub summary: Option<String>,
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(not set)".to_string(),
        Some(Value::String(s)) if s.is_empty() => "(empty)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl ChangesetPreview {
    /// Chat-ready diff, one line per field
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.changes.len() + 1);
        if let Some(summary) = &self.summary {
            lines.push(summary.clone());
        }
        for change in &self.changes {
            lines.push(format!(
                "**{}**: {} → {}",
                change.label,
                display(change.old_value.as_ref()),
                display(Some(&change.new_value))
            ));
        }
        lines.join("\n")
    }

    /// Field → new value, as written to the host
    pub fn field_changes(&self) -> FieldChanges {
        self.changes
            .iter()
            .map(|c| (c.field.clone(), c.new_value.clone()))
            .collect()
    }

    pub fn fields(&self) -> Vec<String> {
        self.changes.iter().map(|c| c.field.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoState {
    Ready,
    Running,
    Done,
    Failed,
}

struct UndoInner {
    state: UndoState,
    /// Data already fetched from the snapshot store, kept for a retry
    restored: Option<Map<String, Value>>,
}

/// One-shot undo of an applied changeset. Re-enabled after a failure.
#[derive(Clone)]
pub struct UndoHandle {
    snapshots: Arc<dyn SnapshotService>,
    host: Arc<dyn HostCapability>,
    snapshot_id: String,
    component_id: String,
    fields: Vec<String>,
    inner: Arc<Mutex<UndoInner>>,
    events: Option<EventBus>,
}

impl UndoHandle {
    pub fn new(
        snapshots: Arc<dyn SnapshotService>,
        host: Arc<dyn HostCapability>,
        snapshot_id: impl Into<String>,
        component_id: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            snapshots,
            host,
            snapshot_id: snapshot_id.into(),
            component_id: component_id.into(),
            fields,
            inner: Arc::new(Mutex::new(UndoInner { state: UndoState::Ready, restored: None })),
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn inner(&self) -> MutexGuard<'_, UndoInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn state(&self) -> UndoState {
        self.inner().state
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state(), UndoState::Ready | UndoState::Failed)
    }

    pub fn button_label(&self) -> &'static str {
        match self.state() {
            UndoState::Ready => "Undo",
            UndoState::Running => "Undoing...",
            UndoState::Done => "Undone",
            UndoState::Failed => "Undo failed. Retry",
        }
    }

    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    /// Restore the changed fields from the snapshot.
    pub async fn undo(&self) -> Result<(), AssistError> {
        let cached = {
            let mut inner = self.inner();
            if !matches!(inner.state, UndoState::Ready | UndoState::Failed) {
                return Ok(());
            }
            inner.state = UndoState::Running;
            inner.restored.clone()
        };

        let result = self.restore(cached).await;
        let success = result.is_ok();
        self.inner().state = if success { UndoState::Done } else { UndoState::Failed };

        if let Some(events) = &self.events {
            events.publish(AssistEvent::UndoFinished { component_id: self.component_id.clone(), success });
        }
        match &result {
            Ok(()) => info!("Undo restored {} fields on {}", self.fields.len(), self.component_id),
            Err(e) => warn!("Undo failed on {}: {}", self.component_id, e),
        }
        result
    }

    async fn restore(&self, cached: Option<Map<String, Value>>) -> Result<(), AssistError> {
        let data = match cached {
            Some(data) => data,
            None => {
                let data = self
                    .snapshots
                    .rollback(&RollbackTarget::Snapshot(self.snapshot_id.clone()))
                    .await
                    .map_err(|e| AssistError::Undo(e.to_string()))?;
                self.inner().restored = Some(data.clone());
                data
            }
        };

        let changes: FieldChanges = self
            .fields
            .iter()
            .map(|field| (field.clone(), data.get(field).cloned().unwrap_or(Value::Null)))
            .collect();

        if !self.host.apply_field_changes(&self.component_id, &changes) {
            return Err(AssistError::Undo("the component is no longer selected".to_string()));
        }
        Ok(())
    }
}
