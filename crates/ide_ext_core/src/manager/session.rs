//! Document session events: open, before-switch, after-switch, close.
//!
//! # Responsibility
//! - Keep exactly one editor extension enabled as the user moves between
//!   open documents.
//! - Let sessions of one editor share its surface without sharing content
//!   or undo history.
//!
//! # Invariants
//! - A content key maps to at most one open session.
//! - Switching between documents of the same editor never fires
//!   enable/disable.
//! - Closing a session destroys its model before resetting and destroying
//!   its undo history.

use super::ExtensionManager;
use crate::error::{ExtensionError, ExtensionResult};
use crate::model::document::DocumentNode;
use crate::model::session::{Session, SessionId, SessionState};
use log::{debug, error, info};

/// Result of one `open_document` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new session was created.
    Opened(SessionId),
    /// A session for the key already existed and was re-activated.
    Reactivated(SessionId),
}

impl OpenOutcome {
    pub fn session_id(self) -> SessionId {
        match self {
            Self::Opened(id) | Self::Reactivated(id) => id,
        }
    }
}

impl ExtensionManager {
    /// Opens `node` under `key`, or re-activates the existing session.
    ///
    /// # Errors
    /// - `NoEditorAvailable` when neither a specific nor a default editor
    ///   exists; a dialog is shown and nothing is mutated.
    /// - `InitializationFailure` when the editor's first `init` fails; the
    ///   current editor and open sessions are left untouched.
    /// - `NotRegistered` when re-activating a document whose editor was
    ///   unregistered; nothing is mutated.
    pub fn open_document(&mut self, key: &str, node: &DocumentNode) -> ExtensionResult<OpenOutcome> {
        if let Some(existing) = self.sessions.get(key) {
            let id = existing.id();
            let handler = existing.editor_handler().to_string();
            self.ensure_editor_ready(&handler)?;

            self.mark_active(key);
            self.host.tabs.activate(key);
            self.bind_surface(&handler, key, id);
            self.switch_current_editor(&handler);
            info!(
                "event=session_open module=session status=ok key={key:?} editor={handler} session_id={id} outcome=reactivated"
            );
            return Ok(OpenOutcome::Reactivated(id));
        }

        let content_type = node.content_type_or_empty();
        let Some(handler) = self.router.resolve(content_type).map(str::to_string) else {
            self.host.dialogs.alert(
                "No editor is registered",
                "Could not find any editor to display content",
                "There is something wrong with the configuration of your IDE. No editor plugin is found.",
            );
            let err = ExtensionError::NoEditorAvailable {
                content_type: content_type.to_string(),
            };
            error!(
                "event=session_open module=session status=error key={key:?} content_type={content_type:?} error_code={}",
                err.error_code()
            );
            return Err(err);
        };

        self.ensure_editor_ready(&handler)?;

        let mut model = self.host.resources.create_model();
        model.load(node);
        let tracker = self.host.resources.create_tracker();
        let mut session = Session::new(key, handler.as_str(), model, tracker);
        let id = session.id();

        self.host.tabs.add_page(key, key, &handler);
        session.set_state(SessionState::Open);
        self.sessions.insert(key.to_string(), session);

        self.mark_active(key);
        self.host.tabs.activate(key);
        self.bind_surface(&handler, key, id);
        self.switch_current_editor(&handler);

        info!(
            "event=session_open module=session status=ok key={key:?} editor={handler} session_id={id} outcome=opened"
        );
        Ok(OpenOutcome::Opened(id))
    }

    /// Rebinds the editor surface of `next_key` to its session resources.
    ///
    /// Returns `true` when a rebind happened, `false` when the surface was
    /// already bound or does not exist yet.
    pub fn before_switch(&mut self, next_key: &str) -> ExtensionResult<bool> {
        let session = self
            .sessions
            .get(next_key)
            .ok_or_else(|| ExtensionError::SessionNotFound(next_key.to_string()))?;
        let handler = session.editor_handler().to_string();
        let id = session.id();
        Ok(self.bind_surface(&handler, next_key, id))
    }

    /// Activates `next_key` and hands the editor role to its handler.
    ///
    /// Enable/disable only fire when the next document belongs to a
    /// different editor than the current one.
    ///
    /// # Errors
    /// - `NotRegistered` when the next document's editor was unregistered;
    ///   session states and the current editor are left untouched.
    pub fn after_switch(&mut self, previous_key: Option<&str>, next_key: &str) -> ExtensionResult<()> {
        let to = self
            .sessions
            .get(next_key)
            .map(|session| session.editor_handler().to_string())
            .ok_or_else(|| ExtensionError::SessionNotFound(next_key.to_string()))?;
        let handler_changed = self.current_editor.as_deref() != Some(to.as_str());
        if handler_changed {
            self.ensure_editor_ready(&to)?;
        }

        if let Some(previous) = previous_key.filter(|previous| *previous != next_key) {
            if let Some(session) = self.sessions.get_mut(previous) {
                if session.state() == SessionState::Active {
                    session.set_state(SessionState::Open);
                }
            }
        }
        self.mark_active(next_key);

        if !handler_changed {
            debug!(
                "event=session_switch module=session status=ok from={previous_key:?} to={next_key:?} editor={to} handler_changed=false"
            );
            return Ok(());
        }

        self.switch_current_editor(&to);
        info!(
            "event=session_switch module=session status=ok from={previous_key:?} to={next_key:?} editor={to} handler_changed=true"
        );
        Ok(())
    }

    /// Handles the host's after-close notification for `key`.
    pub fn close_session(&mut self, key: &str) -> ExtensionResult<()> {
        let mut session = self
            .sessions
            .remove(key)
            .ok_or_else(|| ExtensionError::SessionNotFound(key.to_string()))?;
        session.close();

        if self.active_session.as_deref() == Some(key) {
            self.active_session = None;
        }
        if let Some(surface) = self.surfaces.get_mut(session.editor_handler()) {
            if surface.bound_session == Some(session.id()) {
                surface.bound_session = None;
            }
        }

        info!(
            "event=session_close module=session status=ok key={key:?} session_id={}",
            session.id()
        );
        Ok(())
    }

    fn mark_active(&mut self, key: &str) {
        if let Some(previous) = self.active_session.take() {
            if previous != key {
                if let Some(session) = self.sessions.get_mut(&previous) {
                    session.set_state(SessionState::Open);
                }
            }
        }
        if let Some(session) = self.sessions.get_mut(key) {
            session.set_state(SessionState::Active);
            self.active_session = Some(key.to_string());
        }
    }

    fn bind_surface(&mut self, handler: &str, key: &str, id: SessionId) -> bool {
        let Some(surface) = self.surfaces.get_mut(handler) else {
            return false;
        };
        if surface.bound_session == Some(id) {
            return false;
        }
        surface.bound_session = Some(id);
        self.host.tabs.bind_surface(handler, key);
        debug!("event=editor_surface_bind module=session status=ok editor={handler} key={key:?}");
        true
    }
}
