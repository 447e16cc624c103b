//! Content-type to editor routing.
//!
//! # Responsibility
//! - Map normalized content types to the editor extension that owns them.
//! - Keep exactly one default editor while any editor is routed.
//!
//! # Invariants
//! - `default_editor` is `Some` iff at least one editor is routed.
//! - When the default editor is removed, the earliest remaining editor
//!   becomes the default.
//! - A later editor claiming an already mapped content type takes it over.

use std::collections::BTreeMap;

/// Reserved content-type key naming the fallback editor.
pub const DEFAULT_CONTENT_TYPE: &str = "default";

/// Routes documents to editor extensions by content type.
#[derive(Debug, Default, Clone)]
pub struct ContentTypeRouter {
    mappings: BTreeMap<String, String>,
    editors: Vec<String>,
    default_editor: Option<String>,
}

impl ContentTypeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes every content type of `path` to it.
    ///
    /// Declaring the reserved `default` content type makes `path` the default
    /// editor; otherwise it only becomes default when none exists yet.
    pub fn add_editor<'a>(&mut self, path: &str, content_types: impl IntoIterator<Item = &'a str>) {
        if !self.editors.iter().any(|editor| editor == path) {
            self.editors.push(path.to_string());
        }

        for content_type in content_types {
            let normalized = normalize_content_type(content_type);
            if normalized == DEFAULT_CONTENT_TYPE {
                self.default_editor = Some(path.to_string());
                continue;
            }
            if normalized.is_empty() {
                continue;
            }
            self.mappings.insert(normalized, path.to_string());
        }

        if self.default_editor.is_none() {
            self.default_editor = Some(path.to_string());
        }
    }

    /// Removes every mapping owned by `path`.
    ///
    /// Returns the new default editor when the default was reassigned.
    pub fn remove_editor(&mut self, path: &str) -> Option<String> {
        self.mappings.retain(|_, editor| editor != path);
        self.editors.retain(|editor| editor != path);

        if self.default_editor.as_deref() != Some(path) {
            return None;
        }
        self.default_editor = self.editors.first().cloned();
        self.default_editor.clone()
    }

    /// Resolves the editor for a raw content type, falling back to default.
    pub fn resolve(&self, content_type: &str) -> Option<&str> {
        self.resolve_exact(content_type)
            .or(self.default_editor.as_deref())
    }

    /// Resolves without falling back to the default editor.
    pub fn resolve_exact(&self, content_type: &str) -> Option<&str> {
        self.mappings
            .get(&normalize_content_type(content_type))
            .map(String::as_str)
    }

    /// Makes a routed editor the default. Returns `false` for unknown paths.
    pub fn set_default(&mut self, path: &str) -> bool {
        if !self.editors.iter().any(|editor| editor == path) {
            return false;
        }
        self.default_editor = Some(path.to_string());
        true
    }

    pub fn default_editor(&self) -> Option<&str> {
        self.default_editor.as_deref()
    }

    /// Routed editors in registration order.
    pub fn editors(&self) -> &[String] {
        &self.editors
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

/// Strips `;` parameters and surrounding whitespace, lowercases the rest.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
