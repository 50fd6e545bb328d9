//! Collaborator Services
//!
//! Interfaces to everything outside the assistant core: the host builder,
//! the remote AI service, snapshot storage and the chat window.

pub mod ai;
pub mod chat;
pub mod host;
pub mod snapshot;

pub use ai::{AiService, AnalysisResult, DisabledAiService, GeneratedChanges, ProposedChange, ValidationResult};
pub use chat::{ChatSurface, MessageKind};
pub use host::{FieldChanges, HostCapability, InMemoryHost, SelectedComponent, SelectionHandler};
pub use snapshot::{MemorySnapshotStore, RollbackTarget, Snapshot, SnapshotService};
