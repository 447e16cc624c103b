//! Core extension manager for the IDE.
//! This crate is the single source of truth for extension lifecycle,
//! dependency and editor-switching invariants.

pub mod config;
pub mod db;
pub mod error;
pub mod host;
pub mod logging;
pub mod manager;
pub mod manifest;
pub mod model;

pub use config::{ConfigError, ConfigResult, ManagerConfig};
pub use error::{ExtensionError, ExtensionResult};
pub use host::{
    DefaultResourceFactory, DialogPresenter, HostServices, LogDialogPresenter, MarkupInserter,
    ModeSelector, NoopHost, ResourceFactory, TabHost,
};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use manager::{
    normalize_content_type, ContentTypeRouter, DependencyTracker, ExtensionManager, OpenOutcome,
    RegisterOutcome, DEFAULT_CONTENT_TYPE,
};
pub use manifest::{
    records_from_json, records_to_json, InMemoryManifestStore, ManifestRecord, ManifestResult,
    ManifestStore, ManifestStoreError, SqliteManifestStore,
};
pub use model::document::{
    ActionTracker, DocumentModel, DocumentNode, EditorSurface, TextDocumentModel, UndoHistory,
};
pub use model::extension::{
    is_valid_extension_path, Extension, ExtensionDeclaration, ExtensionKind, ExtensionLifecycle,
    ExtensionStatus,
};
pub use model::session::{Session, SessionId, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
