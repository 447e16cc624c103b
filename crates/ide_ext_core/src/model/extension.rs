//! Extension domain model.
//!
//! # Responsibility
//! - Define the closed set of extension kinds and their manifest names.
//! - Describe one extension declaratively (deps, content types, markup).
//! - Define the lifecycle capability every extension implements.
//!
//! # Invariants
//! - `kind` is fixed for the lifetime of an extension.
//! - `content_types` is only consulted for `ExtensionKind::Editor`.
//! - `deps` keeps declaration order; dependencies are initialized in order.

use crate::model::document::EditorSurface;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};

static EXTENSION_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+(/[A-Za-z0-9_.\-]+)*$").expect("valid extension path regex")
});

/// Closed set of extension categories.
///
/// Registration and teardown branch on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExtensionKind {
    /// Shared infrastructure; usually only initialized when depended upon.
    General,
    /// Mutually exclusive UI arrangement.
    Layout,
    /// Owns documents of one or more content types.
    Editor,
    /// Adds behavior to existing editors.
    EditorPlugin,
}

impl ExtensionKind {
    /// Manifest display name for this kind.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Layout => "Layout",
            Self::Editor => "Editor",
            Self::EditorPlugin => "Editor Plugin",
        }
    }

    /// Parses a manifest display name.
    pub fn from_display_name(value: &str) -> Option<Self> {
        match value {
            "General" => Some(Self::General),
            "Layout" => Some(Self::Layout),
            "Editor" => Some(Self::Editor),
            "Editor Plugin" => Some(Self::EditorPlugin),
            _ => None,
        }
    }

    /// Whether `register` runs `init` right away.
    ///
    /// Layouts are initialized on first `set_layout_mode`, editors on the
    /// first document they open.
    pub fn initializes_on_register(self) -> bool {
        matches!(self, Self::General | Self::EditorPlugin)
    }
}

/// Declarative description of one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDeclaration {
    pub kind: ExtensionKind,
    /// Human-readable name shown in the manifest.
    pub name: String,
    /// Developer attribution shown in the manifest.
    pub dev: String,
    /// General extensions marked `alone` are initialized without dependents.
    pub alone: bool,
    /// Paths of extensions this one requires, in init order.
    pub deps: Vec<String>,
    pub content_types: BTreeSet<String>,
    /// Opaque UI fragment handed to the markup inserter before `init`.
    pub markup: Option<String>,
}

impl ExtensionDeclaration {
    pub fn new(kind: ExtensionKind) -> Self {
        Self {
            kind,
            name: String::new(),
            dev: String::new(),
            alone: false,
            deps: Vec::new(),
            content_types: BTreeSet::new(),
            markup: None,
        }
    }

    pub fn general() -> Self {
        Self::new(ExtensionKind::General)
    }

    pub fn layout() -> Self {
        Self::new(ExtensionKind::Layout)
    }

    pub fn editor() -> Self {
        Self::new(ExtensionKind::Editor)
    }

    pub fn editor_plugin() -> Self {
        Self::new(ExtensionKind::EditorPlugin)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_dev(mut self, dev: impl Into<String>) -> Self {
        self.dev = dev.into();
        self
    }

    pub fn alone(mut self) -> Self {
        self.alone = true;
        self
    }

    /// Appends one dependency path; repeated paths are ignored.
    pub fn depends_on(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !self.deps.contains(&path) {
            self.deps.push(path);
        }
        self
    }

    pub fn handles(mut self, content_type: impl Into<String>) -> Self {
        self.content_types.insert(content_type.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }
}

/// Lifecycle capability implemented by every extension.
///
/// The manager guarantees `init` runs at most once per successful
/// registration, `enable`/`disable` only after `init`, and `destroy` last.
pub trait ExtensionLifecycle {
    /// Creates UI surface and state. `parent` is the shared editor surface
    /// for editors, `None` for other kinds.
    fn init(&mut self, parent: Option<&EditorSurface>) -> Result<(), String>;
    fn enable(&mut self);
    fn disable(&mut self);
    fn destroy(&mut self);
}

/// One registrable feature module: declaration plus lifecycle behavior.
pub struct Extension {
    declaration: ExtensionDeclaration,
    lifecycle: Box<dyn ExtensionLifecycle>,
}

impl Extension {
    pub fn new(declaration: ExtensionDeclaration, lifecycle: Box<dyn ExtensionLifecycle>) -> Self {
        Self {
            declaration,
            lifecycle,
        }
    }

    pub fn declaration(&self) -> &ExtensionDeclaration {
        &self.declaration
    }

    pub fn kind(&self) -> ExtensionKind {
        self.declaration.kind
    }

    pub(crate) fn into_parts(self) -> (ExtensionDeclaration, Box<dyn ExtensionLifecycle>) {
        (self.declaration, self.lifecycle)
    }
}

impl Debug for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}

/// Introspection snapshot of one extension tracked by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionStatus {
    pub path: String,
    pub kind: ExtensionKind,
    pub registered: bool,
    pub inited: bool,
    pub enabled: bool,
    pub deps: Vec<String>,
    pub used_by: Vec<String>,
}

/// Returns whether `path` is a well-formed extension path.
///
/// Paths are slash-separated segments of ASCII letters, digits, `_`, `.`
/// and `-`, e.g. `ext/editors/code`.
pub fn is_valid_extension_path(path: &str) -> bool {
    EXTENSION_PATH_RE.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_extension_path, ExtensionDeclaration, ExtensionKind};

    #[test]
    fn display_names_roundtrip() {
        for kind in [
            ExtensionKind::General,
            ExtensionKind::Layout,
            ExtensionKind::Editor,
            ExtensionKind::EditorPlugin,
        ] {
            assert_eq!(
                ExtensionKind::from_display_name(kind.display_name()),
                Some(kind)
            );
        }
        assert_eq!(ExtensionKind::EditorPlugin.display_name(), "Editor Plugin");
        assert_eq!(ExtensionKind::from_display_name("editor"), None);
    }

    #[test]
    fn only_general_and_plugins_init_on_register() {
        assert!(ExtensionKind::General.initializes_on_register());
        assert!(ExtensionKind::EditorPlugin.initializes_on_register());
        assert!(!ExtensionKind::Layout.initializes_on_register());
        assert!(!ExtensionKind::Editor.initializes_on_register());
    }

    #[test]
    fn depends_on_keeps_order_and_skips_repeats() {
        let declaration = ExtensionDeclaration::general()
            .depends_on("ext/b")
            .depends_on("ext/a")
            .depends_on("ext/b");
        assert_eq!(declaration.deps, vec!["ext/b", "ext/a"]);
    }

    #[test]
    fn validates_extension_paths() {
        assert!(is_valid_extension_path("ext/editors/code"));
        assert!(is_valid_extension_path("ext.tree_v2-beta"));
        assert!(!is_valid_extension_path(""));
        assert!(!is_valid_extension_path("ext//code"));
        assert!(!is_valid_extension_path("/ext/code"));
        assert!(!is_valid_extension_path("ext/code editor"));
    }
}
