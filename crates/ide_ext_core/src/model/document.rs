//! Document-side resources owned by editor sessions.
//!
//! # Responsibility
//! - Describe the node an opened document is loaded from.
//! - Define the model/undo-history capabilities a session owns.
//! - Provide default in-memory implementations for hosts without their own.
//!
//! # Invariants
//! - A model or tracker belongs to exactly one session.
//! - `destroy` is the last call a model or tracker receives.

use crate::model::session::SessionId;

/// Source node of an opened document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentNode {
    /// MIME-like content type, optionally with `;`-separated parameters.
    pub content_type: Option<String>,
    pub body: String,
}

impl DocumentNode {
    pub fn new(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            body: body.into(),
        }
    }

    /// Node without a declared content type; routes to the default editor.
    pub fn untyped(body: impl Into<String>) -> Self {
        Self {
            content_type: None,
            body: body.into(),
        }
    }

    pub fn content_type_or_empty(&self) -> &str {
        self.content_type.as_deref().unwrap_or("")
    }
}

/// Content model bound to one session.
pub trait DocumentModel {
    fn load(&mut self, node: &DocumentNode);
    /// Current content, `None` before load or after destroy.
    fn content(&self) -> Option<&str>;
    fn destroy(&mut self);
}

/// Undo/redo history bound to one session.
pub trait ActionTracker {
    fn undo_depth(&self) -> usize;
    /// Clears undo and redo stacks.
    fn reset(&mut self);
    fn destroy(&mut self);
}

/// Default text-backed document model.
#[derive(Debug, Default)]
pub struct TextDocumentModel {
    content: Option<String>,
}

impl TextDocumentModel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentModel for TextDocumentModel {
    fn load(&mut self, node: &DocumentNode) {
        self.content = Some(node.body.clone());
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn destroy(&mut self) {
        self.content = None;
    }
}

/// Default undo history keeping action labels.
#[derive(Debug, Default)]
pub struct UndoHistory {
    undo: Vec<String>,
    redo: Vec<String>,
    destroyed: bool,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one action and drops the redo branch.
    pub fn record(&mut self, action: impl Into<String>) {
        if self.destroyed {
            return;
        }
        self.undo.push(action.into());
        self.redo.clear();
    }

    pub fn undo(&mut self) -> Option<String> {
        let action = self.undo.pop()?;
        self.redo.push(action.clone());
        Some(action)
    }

    pub fn redo(&mut self) -> Option<String> {
        let action = self.redo.pop()?;
        self.undo.push(action.clone());
        Some(action)
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl ActionTracker for UndoHistory {
    fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn destroy(&mut self) {
        self.reset();
        self.destroyed = true;
    }
}

/// Physical editing surface shared by all sessions of one editor.
///
/// Keyed by the editor's extension path; rebinding points the surface at
/// another session's model and undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSurface {
    pub handler_path: String,
    pub bound_session: Option<SessionId>,
}

impl EditorSurface {
    pub fn new(handler_path: impl Into<String>) -> Self {
        Self {
            handler_path: handler_path.into(),
            bound_session: None,
        }
    }
}
