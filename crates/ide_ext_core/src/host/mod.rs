//! Contracts the hosting shell implements for the extension manager.
//!
//! # Responsibility
//! - Isolate UI side effects (markup, dialogs, mode selector, tabs) behind
//!   narrow traits so manager state transitions stay testable headless.
//! - Provide no-op and logging defaults.
//!
//! # Invariants
//! - Collaborator calls are fire-and-forget; their results never drive
//!   manager control flow.

use crate::manifest::{InMemoryManifestStore, ManifestStore};
use crate::model::document::{ActionTracker, DocumentModel, TextDocumentModel, UndoHistory};
use log::warn;

/// Renders opaque UI fragments into the document tree.
pub trait MarkupInserter {
    fn insert_markup(&mut self, markup: &str);
}

/// Presents modal alerts to the user.
pub trait DialogPresenter {
    fn alert(&mut self, title: &str, summary: &str, body_html: &str);
}

/// Layout-mode selector widget.
pub trait ModeSelector {
    fn add_mode(&mut self, path: &str, caption: &str);
    fn remove_mode(&mut self, path: &str);
}

/// Tab strip bookkeeping.
pub trait TabHost {
    /// Creates the hidden shared surface page for one editor.
    fn add_surface(&mut self, handler_path: &str);
    fn remove_surface(&mut self, handler_path: &str);
    /// Creates the visible page for one document.
    fn add_page(&mut self, key: &str, caption: &str, handler_path: &str);
    fn activate(&mut self, key: &str);
    /// Points an editor surface at the model and history of `key`.
    fn bind_surface(&mut self, handler_path: &str, key: &str);
}

/// Creates per-session document resources.
pub trait ResourceFactory {
    fn create_model(&mut self) -> Box<dyn DocumentModel>;
    fn create_tracker(&mut self) -> Box<dyn ActionTracker>;
}

/// Collaborator that ignores every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl MarkupInserter for NoopHost {
    fn insert_markup(&mut self, _markup: &str) {}
}

impl ModeSelector for NoopHost {
    fn add_mode(&mut self, _path: &str, _caption: &str) {}

    fn remove_mode(&mut self, _path: &str) {}
}

impl TabHost for NoopHost {
    fn add_surface(&mut self, _handler_path: &str) {}

    fn remove_surface(&mut self, _handler_path: &str) {}

    fn add_page(&mut self, _key: &str, _caption: &str, _handler_path: &str) {}

    fn activate(&mut self, _key: &str) {}

    fn bind_surface(&mut self, _handler_path: &str, _key: &str) {}
}

/// Dialog presenter that writes alerts to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDialogPresenter;

impl DialogPresenter for LogDialogPresenter {
    fn alert(&mut self, title: &str, summary: &str, _body_html: &str) {
        warn!("event=dialog_alert module=host status=ok title={title:?} summary={summary:?}");
    }
}

/// Factory for [`TextDocumentModel`] and [`UndoHistory`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResourceFactory;

impl ResourceFactory for DefaultResourceFactory {
    fn create_model(&mut self) -> Box<dyn DocumentModel> {
        Box::new(TextDocumentModel::new())
    }

    fn create_tracker(&mut self) -> Box<dyn ActionTracker> {
        Box::new(UndoHistory::new())
    }
}

/// Bundle of collaborators handed to the manager at creation.
pub struct HostServices {
    pub manifest: Box<dyn ManifestStore>,
    pub markup: Box<dyn MarkupInserter>,
    pub dialogs: Box<dyn DialogPresenter>,
    pub modes: Box<dyn ModeSelector>,
    pub tabs: Box<dyn TabHost>,
    pub resources: Box<dyn ResourceFactory>,
}

impl Default for HostServices {
    fn default() -> Self {
        Self {
            manifest: Box::new(InMemoryManifestStore::new()),
            markup: Box::new(NoopHost),
            dialogs: Box::new(LogDialogPresenter),
            modes: Box::new(NoopHost),
            tabs: Box::new(NoopHost),
            resources: Box::new(DefaultResourceFactory),
        }
    }
}

impl HostServices {
    pub fn with_manifest(mut self, manifest: impl ManifestStore + 'static) -> Self {
        self.manifest = Box::new(manifest);
        self
    }

    pub fn with_markup(mut self, markup: impl MarkupInserter + 'static) -> Self {
        self.markup = Box::new(markup);
        self
    }

    pub fn with_dialogs(mut self, dialogs: impl DialogPresenter + 'static) -> Self {
        self.dialogs = Box::new(dialogs);
        self
    }

    pub fn with_modes(mut self, modes: impl ModeSelector + 'static) -> Self {
        self.modes = Box::new(modes);
        self
    }

    pub fn with_tabs(mut self, tabs: impl TabHost + 'static) -> Self {
        self.tabs = Box::new(tabs);
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceFactory + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }
}
