use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dispatch::{ChangesetPreview, UndoHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    Info,
    Success,
    Error,
}

/// Chat window the assistant talks through
#[async_trait]
pub trait ChatSurface: Send + Sync {
    fn add_message(&self, text: &str, kind: MessageKind);

    fn show_typing(&self);

    fn remove_typing(&self);

    /// Attach an undo control to the latest message
    fn append_undo_button(&self, undo: UndoHandle);

    /// Show the diff preview and wait for apply (true) or cancel (false)
    async fn confirm_changeset(&self, preview: &ChangesetPreview) -> bool;
}
