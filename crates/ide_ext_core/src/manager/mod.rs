//! Extension manager context.
//!
//! # Responsibility
//! - Own the extension table, dependency edges, content-type routes, editor
//!   surfaces and open sessions for one application instance.
//! - Expose register/unregister, layout switching and the four document
//!   events the hosting shell forwards.
//!
//! # Invariants
//! - At most one layout extension is the current layout mode.
//! - At most one editor extension is the current editor.
//! - Every operation runs to completion on the caller's thread; there is
//!   no interior mutability and no background work.
//!
//! # See also
//! - `registry` for register/unregister, `lifecycle` for init/enable/disable,
//!   `session` for document events.

mod dependency;
mod lifecycle;
mod registry;
mod router;
mod session;

pub use dependency::DependencyTracker;
pub use registry::RegisterOutcome;
pub use router::{normalize_content_type, ContentTypeRouter, DEFAULT_CONTENT_TYPE};
pub use session::OpenOutcome;

use crate::config::ManagerConfig;
use crate::db::DbResult;
use crate::host::HostServices;
use crate::manifest::{ManifestRecord, ManifestResult, SqliteManifestStore};
use crate::model::document::EditorSurface;
use crate::model::extension::ExtensionStatus;
use crate::model::session::Session;
use log::{debug, info};
use registry::Registry;
use std::collections::BTreeMap;

/// Process-scoped extension manager.
///
/// Create one per application instance with [`ExtensionManager::new`] and
/// tear it down with [`ExtensionManager::shutdown`].
pub struct ExtensionManager {
    registry: Registry,
    dependencies: DependencyTracker,
    router: ContentTypeRouter,
    host: HostServices,
    surfaces: BTreeMap<String, EditorSurface>,
    sessions: BTreeMap<String, Session>,
    active_session: Option<String>,
    current_editor: Option<String>,
    current_layout_mode: Option<String>,
}

impl ExtensionManager {
    pub fn new(host: HostServices) -> Self {
        info!("event=manager_create module=ext status=ok");
        Self {
            registry: Registry::default(),
            dependencies: DependencyTracker::new(),
            router: ContentTypeRouter::new(),
            host,
            surfaces: BTreeMap::new(),
            sessions: BTreeMap::new(),
            active_session: None,
            current_editor: None,
            current_layout_mode: None,
        }
    }

    /// Creates a manager whose manifest backend follows `config`.
    ///
    /// # Errors
    /// - Returns a DB error when the configured manifest file cannot be
    ///   opened or migrated.
    pub fn from_config(config: &ManagerConfig, host: HostServices) -> DbResult<Self> {
        let host = match &config.manifest_db_path {
            Some(path) => host.with_manifest(SqliteManifestStore::open(path)?),
            None => host,
        };
        Ok(Self::new(host))
    }

    /// Closes every session, disables the current editor and layout mode,
    /// then destroys initialized extensions in reverse registration order.
    ///
    /// Returns the host collaborators so the caller can reclaim them.
    pub fn shutdown(mut self) -> HostServices {
        let keys: Vec<String> = self.sessions.keys().cloned().collect();
        for key in keys {
            if let Err(err) = self.close_session(&key) {
                debug!(
                    "event=session_close module=session status=skip key={key:?} error_code={}",
                    err.error_code()
                );
            }
        }

        if let Some(layout) = self.current_layout_mode.take() {
            self.disable_extension(&layout);
        }
        if let Some(editor) = self.current_editor.take() {
            self.disable_extension(&editor);
        }

        let mut destroyed = 0usize;
        let paths = self.registry.registered_paths().to_vec();
        for path in paths.iter().rev() {
            if let Some(slot) = self.registry.get_mut(path) {
                if slot.inited {
                    slot.lifecycle.destroy();
                    slot.inited = false;
                    destroyed += 1;
                }
            }
        }

        info!("event=manager_shutdown module=ext status=ok destroyed={destroyed}");
        self.host
    }

    /// Snapshot of one declared or registered extension.
    pub fn extension_status(&self, path: &str) -> Option<ExtensionStatus> {
        let slot = self.registry.get(path)?;
        Some(ExtensionStatus {
            path: path.to_string(),
            kind: slot.declaration.kind,
            registered: slot.registered,
            inited: slot.inited,
            enabled: slot.enabled,
            deps: slot.declaration.deps.clone(),
            used_by: self.dependencies.used_by(path),
        })
    }

    pub fn is_registered(&self, path: &str) -> bool {
        self.registry.is_registered(path)
    }

    /// Registered extension paths in registration order.
    pub fn registered_paths(&self) -> Vec<String> {
        self.registry.registered_paths().to_vec()
    }

    /// Every extension that depended on `path`, registered or not.
    pub fn used_by(&self, path: &str) -> Vec<String> {
        self.dependencies.used_by(path)
    }

    pub fn current_editor(&self) -> Option<&str> {
        self.current_editor.as_deref()
    }

    pub fn current_layout_mode(&self) -> Option<&str> {
        self.current_layout_mode.as_deref()
    }

    pub fn default_editor(&self) -> Option<&str> {
        self.router.default_editor()
    }

    /// Makes a registered editor the fallback for unmatched content types.
    pub fn set_default_editor(&mut self, path: &str) -> bool {
        let changed = self.router.set_default(path);
        info!(
            "event=default_editor_set module=ext status={} path={path}",
            if changed { "ok" } else { "skip" }
        );
        changed
    }

    /// Resolves the editor that would open a document of `content_type`.
    pub fn resolve_editor(&self, content_type: &str) -> Option<&str> {
        self.router.resolve(content_type)
    }

    pub fn router(&self) -> &ContentTypeRouter {
        &self.router
    }

    pub fn session(&self, key: &str) -> Option<&Session> {
        self.sessions.get(key)
    }

    pub fn session_mut(&mut self, key: &str) -> Option<&mut Session> {
        self.sessions.get_mut(key)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active_session
            .as_deref()
            .and_then(|key| self.sessions.get(key))
    }

    /// Open session keys, sorted.
    pub fn session_keys(&self) -> Vec<String> {
        self.sessions.keys().cloned().collect()
    }

    /// Shared surface of one editor, once created.
    pub fn surface(&self, handler_path: &str) -> Option<&EditorSurface> {
        self.surfaces.get(handler_path)
    }

    pub fn manifest_records(&self) -> ManifestResult<Vec<ManifestRecord>> {
        self.host.manifest.list()
    }
}

impl Default for ExtensionManager {
    fn default() -> Self {
        Self::new(HostServices::default())
    }
}
