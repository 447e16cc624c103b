//! Open-document session model.
//!
//! # Responsibility
//! - Bind one open document to its editor, content model and undo history.
//!
//! # Invariants
//! - `id` is generated once and never reused.
//! - The model and tracker are owned exclusively by this session.
//! - A `Closed` session has destroyed its model and tracker.

use crate::model::document::{ActionTracker, DocumentModel};
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Stable identifier of one session.
pub type SessionId = Uuid;

/// Lifecycle of one document session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Resources are being created; not yet visible to the tab host.
    Opening,
    /// Open in a tab but not the active one.
    Open,
    /// The active tab.
    Active,
    /// Model and tracker destroyed.
    Closed,
}

/// Binding between an open document and its owning editor extension.
pub struct Session {
    id: SessionId,
    content_key: String,
    editor_handler: String,
    model: Box<dyn DocumentModel>,
    tracker: Box<dyn ActionTracker>,
    state: SessionState,
}

impl Session {
    pub(crate) fn new(
        content_key: impl Into<String>,
        editor_handler: impl Into<String>,
        model: Box<dyn DocumentModel>,
        tracker: Box<dyn ActionTracker>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_key: content_key.into(),
            editor_handler: editor_handler.into(),
            model,
            tracker,
            state: SessionState::Opening,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Filename or identifier the host opened this document under.
    pub fn content_key(&self) -> &str {
        &self.content_key
    }

    /// Path of the editor extension owning this document.
    pub fn editor_handler(&self) -> &str {
        &self.editor_handler
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn model(&self) -> &dyn DocumentModel {
        self.model.as_ref()
    }

    pub fn tracker(&self) -> &dyn ActionTracker {
        self.tracker.as_ref()
    }

    pub fn tracker_mut(&mut self) -> &mut dyn ActionTracker {
        self.tracker.as_mut()
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Destroys the model, then clears and destroys the undo history.
    pub(crate) fn close(&mut self) {
        self.model.destroy();
        self.tracker.reset();
        self.tracker.destroy();
        self.state = SessionState::Closed;
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("content_key", &self.content_key)
            .field("editor_handler", &self.editor_handler)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
