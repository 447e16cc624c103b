//! Extension manager error contracts.
//!
//! # Responsibility
//! - Define caller-visible failure kinds for register/unregister/session flows.
//! - Provide stable error codes for key/value log events.
//!
//! # Invariants
//! - An operation that returns `DependencyInUse` or `NoEditorAvailable` has
//!   not mutated manager state.
//! - `InitializationFailure` leaves the extension registered but not inited.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result alias for extension manager operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Errors from extension manager operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionError {
    /// Extension path is empty or contains unsupported characters.
    InvalidPath(String),
    /// No extension (declared or registered) exists at this path.
    NotFound(String),
    /// Extension exists as a declaration only.
    NotRegistered(String),
    /// A declared dependency path is unknown to the manager.
    MissingDependency {
        extension: String,
        dependency: String,
    },
    /// Unregister blocked by registered dependents.
    DependencyInUse {
        path: String,
        dependents: Vec<String>,
    },
    /// No specific or default editor can handle the content type.
    NoEditorAvailable { content_type: String },
    /// The extension's `init` capability failed.
    InitializationFailure { path: String, message: String },
    /// No open session exists for this content key.
    SessionNotFound(String),
}

impl ExtensionError {
    /// Stable error code for structured logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "ext_invalid_path",
            Self::NotFound(_) => "ext_not_found",
            Self::NotRegistered(_) => "ext_not_registered",
            Self::MissingDependency { .. } => "ext_missing_dependency",
            Self::DependencyInUse { .. } => "ext_dependency_in_use",
            Self::NoEditorAvailable { .. } => "ext_no_editor_available",
            Self::InitializationFailure { .. } => "ext_init_failed",
            Self::SessionNotFound(_) => "ext_session_not_found",
        }
    }
}

impl Display for ExtensionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(value) => write!(f, "extension path is invalid: `{value}`"),
            Self::NotFound(path) => write!(f, "extension not found: {path}"),
            Self::NotRegistered(path) => write!(f, "extension is not registered: {path}"),
            Self::MissingDependency {
                extension,
                dependency,
            } => write!(
                f,
                "extension {extension} depends on unknown extension {dependency}"
            ),
            Self::DependencyInUse { path, dependents } => write!(
                f,
                "extension {path} is still in use by: {}",
                dependents.join(", ")
            ),
            Self::NoEditorAvailable { content_type } => write!(
                f,
                "no editor registered for content type `{content_type}` and no default editor"
            ),
            Self::InitializationFailure { path, message } => {
                write!(f, "extension {path} failed to initialize: {message}")
            }
            Self::SessionNotFound(key) => write!(f, "session not found: {key}"),
        }
    }
}

impl Error for ExtensionError {}
