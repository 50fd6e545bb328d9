//! Assistant
//!
//! Entry point for a submitted chat message: read the selection, classify,
//! route, then run the chosen flow. Every failure ends up as a chat message;
//! nothing is returned to the host as an error.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::changeset::{ChangesetPreview, FieldChange, UndoHandle};
use super::policy::{self, LocalChange, Route};
use crate::error::{AiStage, AssistError};
use crate::events::{AssistEvent, EventBus};
use crate::guidance::{build_plan, GuidanceExecutor, GuidancePlan};
use crate::intent::{Intent, IntentClassifier};
use crate::services::{
    AiService, ChatSurface, DisabledAiService, GeneratedChanges, HostCapability, MessageKind,
    SelectedComponent, SnapshotService,
};

#[derive(Debug)]
pub enum DispatchOutcome {
    NoSelection,
    Guided {
        plan: GuidancePlan,
        /// Executor result, when an executor is attached
        executed: Option<bool>,
    },
    AppliedLocally {
        preview: ChangesetPreview,
        undo_offered: bool,
    },
    AppliedByAi {
        preview: ChangesetPreview,
        undo_offered: bool,
    },
    /// The user declined the proposed changeset
    Cancelled,
    /// The AI proposed no changes
    NothingToApply,
    Failed(AssistError),
}

pub struct Assistant {
    classifier: IntentClassifier,
    host: Arc<dyn HostCapability>,
    chat: Arc<dyn ChatSurface>,
    ai: Arc<dyn AiService>,
    snapshots: Option<Arc<dyn SnapshotService>>,
    executor: Option<Arc<GuidanceExecutor>>,
    events: EventBus,
}

impl Assistant {
    pub fn new(classifier: IntentClassifier, host: Arc<dyn HostCapability>, chat: Arc<dyn ChatSurface>) -> Self {
        Self {
            classifier,
            host,
            chat,
            ai: Arc::new(DisabledAiService),
            snapshots: None,
            executor: None,
            events: EventBus::new(),
        }
    }

    pub fn with_ai(mut self, ai: Arc<dyn AiService>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_snapshots(mut self, snapshots: Arc<dyn SnapshotService>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn with_executor(mut self, executor: Arc<GuidanceExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Cancel running guidance whenever the host selection changes.
    pub fn track_selection(&self) {
        let executor = self.executor.clone();
        let events = self.events.clone();
        self.host.on_selection_changed(Box::new(move |selected: Option<&SelectedComponent>| {
            if let Some(executor) = &executor {
                executor.cleanup();
            }
            events.publish(AssistEvent::SelectionChanged { component_id: selected.map(|c| c.id.clone()) });
        }));
    }

    /// Classify against the current selection without acting on it.
    pub fn classify(&self, text: &str) -> Intent {
        let selected = self.host.selected_component();
        self.classifier
            .classify(text, selected.as_ref().map(|c| c.component_type.as_str()))
    }

    #[tracing::instrument(skip(self, text), fields(len = text.len()))]
    pub async fn handle(&self, text: &str) -> DispatchOutcome {
        let selected = self.host.selected_component();
        let intent = self
            .classifier
            .classify(text, selected.as_ref().map(|c| c.component_type.as_str()));

        self.events.publish(AssistEvent::IntentClassified {
            component_type: intent.component_type.clone(),
            action: intent.action,
            confidence: intent.confidence,
            top_field: intent.top_field().map(|f| f.field.field_name.clone()),
        });

        let route = policy::route(&intent, selected.is_some());
        info!("Routing {} request via {}", intent.action.as_str(), route.as_str());
        self.events.publish(AssistEvent::RouteChosen { route: route.as_str().to_string() });

        let Some(component) = selected else {
            return self.fail(AssistError::NoSelection);
        };

        match route {
            Route::NoSelection => self.fail(AssistError::NoSelection),
            Route::Guidance => self.guide(&intent).await,
            Route::LocalChange(change) => self.apply_local(&component, change).await,
            Route::AiEscalation => self.escalate(&component, text).await,
        }
    }

    fn fail(&self, err: AssistError) -> DispatchOutcome {
        self.chat.add_message(&err.user_message(), MessageKind::Error);
        match err {
            AssistError::NoSelection => DispatchOutcome::NoSelection,
            other => DispatchOutcome::Failed(other),
        }
    }

    async fn guide(&self, intent: &Intent) -> DispatchOutcome {
        let plan = build_plan(intent);
        if !plan.success {
            self.chat.add_message(&plan.message, MessageKind::Info);
            let err = match &intent.component_type {
                Some(component_type) => AssistError::NoMatch { component_type: component_type.clone() },
                None => AssistError::NoSelection,
            };
            return DispatchOutcome::Failed(err);
        }

        self.chat.add_message(&plan.message, MessageKind::Assistant);
        let executed = match &self.executor {
            Some(executor) => Some(executor.execute_plan(&plan.steps).await),
            None => None,
        };
        DispatchOutcome::Guided { plan, executed }
    }

    async fn apply_local(&self, component: &SelectedComponent, change: LocalChange) -> DispatchOutcome {
        let field = change.field;
        let preview = ChangesetPreview {
            component_id: component.id.clone(),
            component_type: component.component_type.clone(),
            changes: vec![FieldChange {
                field: field.field_name.clone(),
                label: field.label.clone(),
                old_value: component.data.get(&field.field_name).cloned(),
                new_value: Value::String(change.value),
            }],
            summary: None,
        };

        match self.apply(component, &preview, &format!("Before changing {}", field.label)).await {
            Ok(undo_offered) => {
                self.chat.add_message(
                    &format!("Updated **{}**.\n{}", field.label, preview.render()),
                    MessageKind::Success,
                );
                DispatchOutcome::AppliedLocally { preview, undo_offered }
            }
            Err(err) => self.fail(err),
        }
    }

    async fn escalate(&self, component: &SelectedComponent, text: &str) -> DispatchOutcome {
        self.chat.show_typing();
        let generated = self.ai_round_trip(component, text).await;
        self.chat.remove_typing();

        let generated = match generated {
            Ok(generated) => generated,
            Err(err) => return self.fail(err),
        };
        if generated.changes.is_empty() {
            self.chat.add_message("The AI didn't propose any changes for this request.", MessageKind::Info);
            return DispatchOutcome::NothingToApply;
        }

        let preview = self.preview_generated(component, generated);
        if !self.chat.confirm_changeset(&preview).await {
            self.chat.add_message("Changes discarded.", MessageKind::Info);
            return DispatchOutcome::Cancelled;
        }

        match self.apply(component, &preview, "Before AI edit").await {
            Ok(undo_offered) => {
                self.chat.add_message(
                    &format!("Applied {} change(s).", preview.changes.len()),
                    MessageKind::Success,
                );
                DispatchOutcome::AppliedByAi { preview, undo_offered }
            }
            Err(err) => self.fail(err),
        }
    }

    /// Analyze, generate, then validate. Validation transport errors are ignored.
    async fn ai_round_trip(&self, component: &SelectedComponent, text: &str) -> Result<GeneratedChanges, AssistError> {
        let analysis = self
            .ai
            .analyze(text, &component.component_type, &component.data)
            .await
            .map_err(|source| AssistError::AiStage { stage: AiStage::Analyze, source })?;

        let generated = self
            .ai
            .generate(&analysis, &component.component_type, &component.data)
            .await
            .map_err(|source| AssistError::AiStage { stage: AiStage::Generate, source })?;

        if generated.changes.is_empty() {
            return Ok(generated);
        }

        match self
            .ai
            .validate_changeset(&component.component_type, &generated.changes)
            .await
        {
            Ok(result) if !result.valid => return Err(AssistError::Validation(result.errors)),
            Ok(_) => {}
            Err(source) => warn!(
                "{}; applying unvalidated",
                AssistError::AiStage { stage: AiStage::Validate, source }
            ),
        }
        Ok(generated)
    }

    fn preview_generated(&self, component: &SelectedComponent, generated: GeneratedChanges) -> ChangesetPreview {
        let entry = self.classifier.index().get(&component.component_type);
        let changes = generated
            .changes
            .into_iter()
            .map(|change| {
                let label = change
                    .label
                    .clone()
                    .or_else(|| entry.and_then(|e| e.field(&change.field)).map(|f| f.label.clone()))
                    .unwrap_or_else(|| change.field.clone());
                FieldChange {
                    old_value: component.data.get(&change.field).cloned(),
                    field: change.field,
                    label,
                    new_value: change.new_value,
                }
            })
            .collect();

        ChangesetPreview {
            component_id: component.id.clone(),
            component_type: component.component_type.clone(),
            changes,
            summary: generated.summary,
        }
    }

    /// Snapshot (best effort), write to the host, offer undo. Ok(true) when undo was offered.
    async fn apply(
        &self,
        component: &SelectedComponent,
        preview: &ChangesetPreview,
        label: &str,
    ) -> Result<bool, AssistError> {
        let snapshot_id = self.save_snapshot(component, label).await;

        if !self.host.apply_field_changes(&component.id, &preview.field_changes()) {
            return Err(AssistError::ApplyFailed);
        }
        self.events.publish(AssistEvent::ChangeApplied {
            component_id: component.id.clone(),
            fields: preview.fields(),
        });

        let (Some(snapshots), Some(snapshot_id)) = (&self.snapshots, snapshot_id) else {
            debug!("No snapshot for {}, undo not offered", component.id);
            return Ok(false);
        };
        let undo = UndoHandle::new(
            snapshots.clone(),
            self.host.clone(),
            snapshot_id,
            component.id.clone(),
            preview.fields(),
        )
        .with_events(self.events.clone());
        self.chat.append_undo_button(undo);
        Ok(true)
    }

    async fn save_snapshot(&self, component: &SelectedComponent, label: &str) -> Option<String> {
        let snapshots = self.snapshots.as_ref()?;
        let data: &Map<String, Value> = &component.data;
        match snapshots
            .save_snapshot(&component.id, &component.component_type, data, label)
            .await
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("{}; applying without undo", AssistError::from(e));
                None
            }
        }
    }
}
