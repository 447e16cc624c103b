#![allow(dead_code)]

use ide_ext_core::{
    ActionTracker, DialogPresenter, DocumentModel, DocumentNode, EditorSurface, Extension,
    ExtensionDeclaration, ExtensionLifecycle, ExtensionManager, HostServices,
    InMemoryManifestStore, MarkupInserter, ModeSelector, ResourceFactory, TabHost,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared, ordered record of every lifecycle and host call.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Entries starting with `prefix`, in call order.
pub fn calls(log: &CallLog, prefix: &str) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|entry| entry.starts_with(prefix))
        .cloned()
        .collect()
}

pub fn clear(log: &CallLog) {
    log.borrow_mut().clear();
}

pub struct RecordingLifecycle {
    path: String,
    log: CallLog,
    fail_init: Rc<Cell<bool>>,
}

impl ExtensionLifecycle for RecordingLifecycle {
    fn init(&mut self, parent: Option<&EditorSurface>) -> Result<(), String> {
        if self.fail_init.get() {
            self.log.borrow_mut().push(format!("init-failed:{}", self.path));
            return Err("boom".to_string());
        }
        let entry = match parent {
            Some(surface) => format!("init:{}@{}", self.path, surface.handler_path),
            None => format!("init:{}", self.path),
        };
        self.log.borrow_mut().push(entry);
        Ok(())
    }

    fn enable(&mut self) {
        self.log.borrow_mut().push(format!("enable:{}", self.path));
    }

    fn disable(&mut self) {
        self.log.borrow_mut().push(format!("disable:{}", self.path));
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(format!("destroy:{}", self.path));
    }
}

pub fn extension(log: &CallLog, path: &str, declaration: ExtensionDeclaration) -> Extension {
    failing_extension(log, path, declaration, Rc::new(Cell::new(false)))
}

/// Extension whose `init` fails while `fail_init` is set.
pub fn failing_extension(
    log: &CallLog,
    path: &str,
    declaration: ExtensionDeclaration,
    fail_init: Rc<Cell<bool>>,
) -> Extension {
    Extension::new(
        declaration,
        Box::new(RecordingLifecycle {
            path: path.to_string(),
            log: log.clone(),
            fail_init,
        }),
    )
}

#[derive(Clone)]
pub struct RecordingHost {
    log: CallLog,
}

impl RecordingHost {
    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl MarkupInserter for RecordingHost {
    fn insert_markup(&mut self, markup: &str) {
        self.push(format!("markup:{markup}"));
    }
}

impl DialogPresenter for RecordingHost {
    fn alert(&mut self, title: &str, _summary: &str, body_html: &str) {
        self.push(format!("alert:{title}|{body_html}"));
    }
}

impl ModeSelector for RecordingHost {
    fn add_mode(&mut self, path: &str, caption: &str) {
        self.push(format!("mode-add:{path}:{caption}"));
    }

    fn remove_mode(&mut self, path: &str) {
        self.push(format!("mode-remove:{path}"));
    }
}

impl TabHost for RecordingHost {
    fn add_surface(&mut self, handler_path: &str) {
        self.push(format!("tab-surface-add:{handler_path}"));
    }

    fn remove_surface(&mut self, handler_path: &str) {
        self.push(format!("tab-surface-remove:{handler_path}"));
    }

    fn add_page(&mut self, key: &str, _caption: &str, handler_path: &str) {
        self.push(format!("tab-page-add:{key}:{handler_path}"));
    }

    fn activate(&mut self, key: &str) {
        self.push(format!("tab-activate:{key}"));
    }

    fn bind_surface(&mut self, handler_path: &str, key: &str) {
        self.push(format!("tab-bind:{handler_path}:{key}"));
    }
}

impl ResourceFactory for RecordingHost {
    fn create_model(&mut self) -> Box<dyn DocumentModel> {
        Box::new(RecordingModel {
            log: self.log.clone(),
            content: None,
        })
    }

    fn create_tracker(&mut self) -> Box<dyn ActionTracker> {
        Box::new(RecordingTracker {
            log: self.log.clone(),
            depth: 0,
        })
    }
}

struct RecordingModel {
    log: CallLog,
    content: Option<String>,
}

impl DocumentModel for RecordingModel {
    fn load(&mut self, node: &DocumentNode) {
        self.log.borrow_mut().push(format!("model-load:{}", node.body));
        self.content = Some(node.body.clone());
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn destroy(&mut self) {
        self.log
            .borrow_mut()
            .push(format!("model-destroy:{}", self.content.as_deref().unwrap_or("")));
        self.content = None;
    }
}

struct RecordingTracker {
    log: CallLog,
    depth: usize,
}

impl ActionTracker for RecordingTracker {
    fn undo_depth(&self) -> usize {
        self.depth
    }

    fn reset(&mut self) {
        self.log.borrow_mut().push("tracker-reset".to_string());
        self.depth = 0;
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push("tracker-destroy".to_string());
    }
}

/// Host services that record every collaborator call into `log`.
pub fn recording_host(log: &CallLog) -> HostServices {
    let host = RecordingHost { log: log.clone() };
    HostServices::default()
        .with_manifest(InMemoryManifestStore::new())
        .with_markup(host.clone())
        .with_dialogs(host.clone())
        .with_modes(host.clone())
        .with_tabs(host.clone())
        .with_resources(host)
}

pub fn recording_manager(log: &CallLog) -> ExtensionManager {
    ExtensionManager::new(recording_host(log))
}
