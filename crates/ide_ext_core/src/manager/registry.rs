//! Extension table plus register/unregister flows.
//!
//! # Responsibility
//! - Keep every declared extension keyed by path.
//! - Write manifest records on register and flip `enabled` on unregister.
//! - Type-dispatch attach/detach work (mode selector, content-type routes).
//!
//! # Invariants
//! - Paths are unique; registering a registered path reuses the stored
//!   instance, while declared-only or unregistered paths take the new one.
//! - An extension with registered dependents is never unregistered.
//! - Recursive unregister visits each path at most once per call.

use super::ExtensionManager;
use crate::error::{ExtensionError, ExtensionResult};
use crate::manifest::ManifestRecord;
use crate::model::extension::{
    is_valid_extension_path, Extension, ExtensionDeclaration, ExtensionKind, ExtensionLifecycle,
};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet};

/// Result of one `register` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// General extension recorded as a declaration only.
    Declared,
    /// Registered; `init` deferred until first use (layouts, editors).
    Registered,
    /// Registered and initialized.
    Initialized,
    /// Path was already registered; nothing changed.
    AlreadyRegistered,
}

pub(crate) struct ExtensionSlot {
    pub(crate) declaration: ExtensionDeclaration,
    pub(crate) lifecycle: Box<dyn ExtensionLifecycle>,
    pub(crate) registered: bool,
    pub(crate) inited: bool,
    pub(crate) enabled: bool,
}

/// Extension lookup table.
#[derive(Default)]
pub(crate) struct Registry {
    slots: BTreeMap<String, ExtensionSlot>,
    order: Vec<String>,
}

impl Registry {
    pub(crate) fn contains(&self, path: &str) -> bool {
        self.slots.contains_key(path)
    }

    pub(crate) fn get(&self, path: &str) -> Option<&ExtensionSlot> {
        self.slots.get(path)
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut ExtensionSlot> {
        self.slots.get_mut(path)
    }

    pub(crate) fn is_registered(&self, path: &str) -> bool {
        self.slots.get(path).is_some_and(|slot| slot.registered)
    }

    pub(crate) fn insert_declared(&mut self, path: &str, extension: Extension) {
        let (declaration, lifecycle) = extension.into_parts();
        self.slots.insert(
            path.to_string(),
            ExtensionSlot {
                declaration,
                lifecycle,
                registered: false,
                inited: false,
                enabled: false,
            },
        );
    }

    fn mark_registered(&mut self, path: &str) {
        if let Some(slot) = self.slots.get_mut(path) {
            slot.registered = true;
            self.order.push(path.to_string());
        }
    }

    fn mark_unregistered(&mut self, path: &str) {
        if let Some(slot) = self.slots.get_mut(path) {
            slot.registered = false;
            self.order.retain(|item| item != path);
        }
    }

    /// Registered paths in registration order.
    pub(crate) fn registered_paths(&self) -> &[String] {
        &self.order
    }
}

impl ExtensionManager {
    /// Registers `extension` under `path`.
    ///
    /// A path that is already registered keeps its stored instance and the
    /// passed `extension` is dropped. A declared-only or unregistered path is
    /// replaced by the passed `extension`. General extensions that are neither
    /// `alone` nor `force`d are only declared: their manifest record is
    /// written, but they stay unregistered until a dependent needs them.
    ///
    /// # Errors
    /// - `InvalidPath` for malformed paths (no mutation).
    /// - `MissingDependency` when a declared dependency path is unknown.
    /// - `InitializationFailure` when `init` fails; the extension then stays
    ///   registered but not inited, and a later `register` retries `init`.
    pub fn register(
        &mut self,
        path: &str,
        extension: Extension,
        force: bool,
    ) -> ExtensionResult<RegisterOutcome> {
        let path = path.trim();
        if !is_valid_extension_path(path) {
            let err = ExtensionError::InvalidPath(path.to_string());
            warn!(
                "event=ext_register module=ext status=error path={path:?} error_code={}",
                err.error_code()
            );
            return Err(err);
        }

        let keep_existing = self
            .registry
            .get(path)
            .is_some_and(|slot| slot.registered || slot.inited);
        if keep_existing {
            debug!("event=ext_register module=ext status=start path={path} instance=existing");
        } else {
            self.registry.insert_declared(path, extension);
        }
        self.register_path(path, force)
    }

    /// Registers an extension already present in the table.
    pub(crate) fn register_path(
        &mut self,
        path: &str,
        force: bool,
    ) -> ExtensionResult<RegisterOutcome> {
        let slot = self
            .registry
            .get(path)
            .ok_or_else(|| ExtensionError::NotFound(path.to_string()))?;
        let kind = slot.declaration.kind;
        let registered = slot.registered;

        if registered && (slot.inited || !kind.initializes_on_register()) {
            debug!("event=ext_register module=ext status=skip path={path} reason=already_registered");
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        let record = ManifestRecord::enabled(
            kind,
            slot.declaration.name.clone(),
            path,
            slot.declaration.dev.clone(),
        );
        let declare_only = !force && kind == ExtensionKind::General && !slot.declaration.alone;
        self.write_manifest(record);

        if declare_only && !registered {
            info!("event=ext_register module=ext status=ok path={path} kind={kind:?} outcome=declared");
            return Ok(RegisterOutcome::Declared);
        }

        if !registered {
            self.registry.mark_registered(path);
        }

        if kind.initializes_on_register() {
            self.init_extension(path, None)?;
        }

        if !registered {
            self.attach(path, kind);
        }

        let outcome = if kind.initializes_on_register() {
            RegisterOutcome::Initialized
        } else {
            RegisterOutcome::Registered
        };
        info!(
            "event=ext_register module=ext status=ok path={path} kind={kind:?} outcome={outcome:?} retry={registered}"
        );
        Ok(outcome)
    }

    /// Unregisters `path` and cascades to General dependencies nobody else uses.
    ///
    /// Unless `silent`, a blocked unregister shows a dialog listing the
    /// blocking extensions.
    ///
    /// # Errors
    /// - `NotFound` / `NotRegistered` when `path` is not registered.
    /// - `DependencyInUse` when registered extensions still depend on it;
    ///   nothing is mutated in that case.
    pub fn unregister(&mut self, path: &str, silent: bool) -> ExtensionResult<()> {
        let mut visited = BTreeSet::new();
        self.unregister_visited(path.trim(), silent, &mut visited)
    }

    fn unregister_visited(
        &mut self,
        path: &str,
        silent: bool,
        visited: &mut BTreeSet<String>,
    ) -> ExtensionResult<()> {
        if !visited.insert(path.to_string()) {
            return Ok(());
        }

        let slot = self
            .registry
            .get(path)
            .ok_or_else(|| ExtensionError::NotFound(path.to_string()))?;
        if !slot.registered {
            return Err(ExtensionError::NotRegistered(path.to_string()));
        }
        let kind = slot.declaration.kind;
        let deps = slot.declaration.deps.clone();

        let registry = &self.registry;
        let dependents = self
            .dependencies
            .active_dependents(path, |user| registry.is_registered(user));
        if !dependents.is_empty() {
            if !silent {
                self.host.dialogs.alert(
                    "Could not disable extension",
                    "Extension is still in use",
                    &in_use_body_html(&dependents),
                );
            }
            let err = ExtensionError::DependencyInUse {
                path: path.to_string(),
                dependents,
            };
            warn!(
                "event=ext_unregister module=ext status=error path={path} silent={silent} error_code={}",
                err.error_code()
            );
            return Err(err);
        }

        if self.current_layout_mode.as_deref() == Some(path) {
            self.current_layout_mode = None;
            self.disable_extension(path);
        }
        if self.current_editor.as_deref() == Some(path) {
            self.current_editor = None;
            self.disable_extension(path);
        }

        self.registry.mark_unregistered(path);

        for dep in deps {
            let cascades = self.registry.get(&dep).is_some_and(|dep_slot| {
                dep_slot.registered
                    && dep_slot.declaration.kind == ExtensionKind::General
                    && !dep_slot.declaration.alone
            });
            if !cascades {
                continue;
            }
            if let Err(err) = self.unregister_visited(&dep, true, visited) {
                debug!(
                    "event=ext_unregister module=ext status=skip path={dep} parent={path} error_code={}",
                    err.error_code()
                );
            }
        }

        self.detach(path, kind);

        match self.host.manifest.set_enabled(path, false) {
            Ok(true) => {}
            Ok(false) => warn!("event=manifest_write module=manifest status=skip path={path} reason=missing_record"),
            Err(err) => warn!(
                "event=manifest_write module=manifest status=error path={path} error_code={} error={err}",
                err.error_code()
            ),
        }

        if let Some(slot) = self.registry.get_mut(path) {
            if slot.inited {
                slot.lifecycle.destroy();
                slot.inited = false;
                slot.enabled = false;
            }
        }

        info!("event=ext_unregister module=ext status=ok path={path} kind={kind:?}");
        Ok(())
    }

    fn attach(&mut self, path: &str, kind: ExtensionKind) {
        let Some(slot) = self.registry.get(path) else {
            return;
        };
        match kind {
            ExtensionKind::Layout => {
                let caption = slot.declaration.name.clone();
                self.host.modes.add_mode(path, &caption);
            }
            ExtensionKind::Editor => {
                let content_types = slot.declaration.content_types.clone();
                self.router
                    .add_editor(path, content_types.iter().map(String::as_str));
            }
            ExtensionKind::General | ExtensionKind::EditorPlugin => {}
        }
    }

    fn detach(&mut self, path: &str, kind: ExtensionKind) {
        match kind {
            ExtensionKind::Layout => self.host.modes.remove_mode(path),
            ExtensionKind::Editor => {
                if let Some(new_default) = self.router.remove_editor(path) {
                    info!("event=default_editor_set module=ext status=ok path={new_default} reason=reassigned");
                }
                if self.surfaces.remove(path).is_some() {
                    self.host.tabs.remove_surface(path);
                }
            }
            ExtensionKind::General | ExtensionKind::EditorPlugin => {}
        }
    }

    fn write_manifest(&mut self, record: ManifestRecord) {
        let path = record.path.clone();
        if let Err(err) = self.host.manifest.upsert(record) {
            error!(
                "event=manifest_write module=manifest status=error path={path} error_code={} error={err}",
                err.error_code()
            );
        }
    }
}

fn in_use_body_html(dependents: &[String]) -> String {
    format!(
        "This extension cannot be disabled, because it is still in use by the following extensions:<br /><br /> - {}<br /><br /> Please disable those extensions first.",
        dependents.join("<br /> - ")
    )
}
