//! Page Assist
//!
//! Natural-language editing assistance for a visual page builder:
//! - Schema index over every component's editable fields
//! - Deterministic intent classification (no network, no model)
//! - Guided navigation to the right control in the settings panel
//! - Local apply for simple changes, AI escalation for everything else
//! - Snapshot-backed one-step undo

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod guidance;
pub mod intent;
pub mod schema;
pub mod services;

// Re-exports for convenience
pub use config::{AssistConfig, ConfigManager};
pub use dispatch::{Assistant, DispatchOutcome, Route};
pub use error::{AiError, AssistError, SnapshotError};
pub use events::{AssistEvent, EventBus};
pub use guidance::{build_plan, GuidanceExecutor, GuidancePlan, GuidanceStep};
pub use intent::{Action, Breakpoint, Confidence, Intent, IntentClassifier, ScoredField};
pub use schema::{ComponentSchemaEntry, FieldDescriptor, FieldType, SchemaIndex, Tab};
