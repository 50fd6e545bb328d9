//! Assistant Event Bus
//!
//! Asynchronous pub/sub for the chat surface and telemetry. Each assistant
//! owns its bus; there is no process-wide instance.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::intent::{Action, Confidence};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum AssistEvent {
    /// A request was classified
    IntentClassified {
        component_type: Option<String>,
        action: Action,
        confidence: Confidence,
        top_field: Option<String>,
    },
    /// The dispatch policy picked a handling strategy
    RouteChosen { route: String },
    /// One guidance step finished
    StepFinished { step: String, success: bool },
    /// A guidance run ended (completed or preempted)
    GuidanceFinished { completed: bool },
    /// Field values were written to the host
    ChangeApplied { component_id: String, fields: Vec<String> },
    /// An undo attempt finished
    UndoFinished { component_id: String, success: bool },
    /// The host selection changed
    SelectionChanged { component_id: Option<String> },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AssistEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: AssistEvent) {
        let _ = self.tx.send(event);
    }

    /// Create a new subscriber
    pub fn subscribe(&self) -> broadcast::Receiver<AssistEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
