//! Dispatch
//!
//! Decides how each request is handled and drives the chosen flow.

mod assistant;
mod changeset;
pub mod policy;

pub use assistant::{Assistant, DispatchOutcome};
pub use changeset::{ChangesetPreview, FieldChange, UndoHandle, UndoState};
pub use policy::{LocalChange, Route};
