//! Extension lifecycle driver: init, enable, disable, layout switching.
//!
//! # Invariants
//! - Dependencies are registered and their used-by edges recorded before
//!   the dependent's own `init` runs.
//! - `enable` is only delivered to inited, disabled extensions and
//!   `disable` only to enabled ones.

use super::ExtensionManager;
use crate::error::{ExtensionError, ExtensionResult};
use crate::model::document::EditorSurface;
use crate::model::extension::ExtensionKind;
use log::{debug, error, info, warn};

impl ExtensionManager {
    /// Runs markup insertion, dependency registration and `init` for `path`.
    ///
    /// A failed `init` leaves already registered dependencies in place.
    pub(crate) fn init_extension(
        &mut self,
        path: &str,
        parent: Option<EditorSurface>,
    ) -> ExtensionResult<()> {
        let slot = self
            .registry
            .get(path)
            .ok_or_else(|| ExtensionError::NotFound(path.to_string()))?;
        let markup = slot.declaration.markup.clone();
        let deps = slot.declaration.deps.clone();

        if let Some(markup) = markup {
            self.host.markup.insert_markup(&markup);
        }

        for dep in &deps {
            if !self.registry.contains(dep) {
                let err = ExtensionError::MissingDependency {
                    extension: path.to_string(),
                    dependency: dep.clone(),
                };
                error!(
                    "event=ext_init module=ext status=error path={path} dependency={dep} error_code={}",
                    err.error_code()
                );
                return Err(err);
            }
            if !self.registry.is_registered(dep) {
                self.register_path(dep, true)?;
            }
            if self.dependencies.record_use(dep, path) {
                debug!("event=ext_dependency module=ext status=ok path={dep} used_by={path}");
            }
        }

        let slot = self
            .registry
            .get_mut(path)
            .ok_or_else(|| ExtensionError::NotFound(path.to_string()))?;
        if let Err(message) = slot.lifecycle.init(parent.as_ref()) {
            let err = ExtensionError::InitializationFailure {
                path: path.to_string(),
                message,
            };
            error!(
                "event=ext_init module=ext status=error path={path} error_code={} error={err}",
                err.error_code()
            );
            return Err(err);
        }
        slot.inited = true;

        info!(
            "event=ext_init module=ext status=ok path={path} deps={} with_parent={}",
            deps.len(),
            parent.is_some()
        );
        Ok(())
    }

    /// Switches the current layout mode to `path`.
    ///
    /// The previous layout mode is always disabled first. Returns `Ok(false)`
    /// and leaves no current mode when `path` is not a registered layout.
    ///
    /// # Errors
    /// - `InitializationFailure` when the layout's first `init` fails.
    pub fn set_layout_mode(&mut self, path: &str) -> ExtensionResult<bool> {
        if let Some(previous) = self.current_layout_mode.take() {
            self.disable_extension(&previous);
        }

        let Some(slot) = self
            .registry
            .get(path)
            .filter(|slot| slot.registered && slot.declaration.kind == ExtensionKind::Layout)
        else {
            info!("event=layout_mode_set module=ext status=skip path={path:?} error_code=unknown_layout_mode");
            return Ok(false);
        };

        if !slot.inited {
            self.init_extension(path, None)?;
        }
        self.enable_extension(path);
        self.current_layout_mode = Some(path.to_string());
        info!("event=layout_mode_set module=ext status=ok path={path}");
        Ok(true)
    }

    /// Lazily initializes an editor with its shared surface as parent.
    ///
    /// Unregistered editors are rejected with `NotRegistered` before any
    /// surface or lifecycle call.
    pub(crate) fn ensure_editor_ready(&mut self, handler: &str) -> ExtensionResult<()> {
        let slot = self
            .registry
            .get(handler)
            .ok_or_else(|| ExtensionError::NotFound(handler.to_string()))?;
        if !slot.registered {
            let err = ExtensionError::NotRegistered(handler.to_string());
            warn!(
                "event=editor_ready module=ext status=error path={handler} error_code={}",
                err.error_code()
            );
            return Err(err);
        }
        if slot.inited {
            return Ok(());
        }

        if !self.surfaces.contains_key(handler) {
            self.host.tabs.add_surface(handler);
            self.surfaces
                .insert(handler.to_string(), EditorSurface::new(handler));
            debug!("event=editor_surface_create module=ext status=ok path={handler}");
        }
        let surface = self.surfaces.get(handler).cloned();
        self.init_extension(handler, surface)
    }

    /// Hands the current-editor role to `to`, disabling the previous
    /// editor first. `to` must already be inited.
    pub(crate) fn switch_current_editor(&mut self, to: &str) {
        if self.current_editor.as_deref() == Some(to) {
            return;
        }
        if let Some(from) = self.current_editor.take() {
            self.disable_extension(&from);
        }
        self.enable_extension(to);
        self.current_editor = Some(to.to_string());
    }

    pub(crate) fn enable_extension(&mut self, path: &str) {
        let Some(slot) = self.registry.get_mut(path) else {
            return;
        };
        if !slot.inited || slot.enabled {
            debug!(
                "event=ext_enable module=ext status=skip path={path} inited={} enabled={}",
                slot.inited, slot.enabled
            );
            return;
        }
        slot.lifecycle.enable();
        slot.enabled = true;
        debug!("event=ext_enable module=ext status=ok path={path}");
    }

    pub(crate) fn disable_extension(&mut self, path: &str) {
        let Some(slot) = self.registry.get_mut(path) else {
            return;
        };
        if !slot.enabled {
            return;
        }
        slot.lifecycle.disable();
        slot.enabled = false;
        debug!("event=ext_disable module=ext status=ok path={path}");
    }
}
