//! Extension manifest records and stores.
//!
//! # Responsibility
//! - Define the per-extension manifest record shown to users.
//! - Define the store contract the manager writes records through.
//! - Provide in-memory and SQLite-backed stores.
//!
//! # Invariants
//! - At most one record exists per extension path.
//! - Records keep first-registration order.
//! - The manager never reads records back to make control decisions.

use crate::db::DbError;
use crate::model::extension::ExtensionKind;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::InMemoryManifestStore;
pub use sqlite::SqliteManifestStore;

pub type ManifestResult<T> = Result<T, ManifestStoreError>;

/// Introspection record for one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    /// Serialized as the kind display name, e.g. `Editor Plugin`.
    #[serde(rename = "type", with = "kind_display_name")]
    pub kind: ExtensionKind,
    pub name: String,
    pub path: String,
    pub dev: String,
    pub enabled: bool,
}

impl ManifestRecord {
    pub fn enabled(
        kind: ExtensionKind,
        name: impl Into<String>,
        path: impl Into<String>,
        dev: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            path: path.into(),
            dev: dev.into(),
            enabled: true,
        }
    }
}

/// Store contract for manifest records.
pub trait ManifestStore {
    /// Inserts the record, or updates the existing record for its path in place.
    fn upsert(&mut self, record: ManifestRecord) -> ManifestResult<()>;
    /// Flips `enabled`; returns `false` when no record exists for `path`.
    fn set_enabled(&mut self, path: &str, enabled: bool) -> ManifestResult<bool>;
    fn get(&self, path: &str) -> ManifestResult<Option<ManifestRecord>>;
    /// All records in first-registration order.
    fn list(&self) -> ManifestResult<Vec<ManifestRecord>>;
}

/// Manifest store errors.
#[derive(Debug)]
pub enum ManifestStoreError {
    Db(DbError),
    /// Persisted row cannot be decoded.
    InvalidData(String),
}

impl ManifestStoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Db(err) => err.error_code(),
            Self::InvalidData(_) => "manifest_invalid_data",
        }
    }
}

impl Display for ManifestStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid manifest row: {message}"),
        }
    }
}

impl Error for ManifestStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for ManifestStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ManifestStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Serializes records as a pretty JSON array for hosts that persist the
/// manifest themselves.
pub fn records_to_json(records: &[ManifestRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Parses records previously produced by [`records_to_json`].
pub fn records_from_json(raw: &str) -> Result<Vec<ManifestRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}

mod kind_display_name {
    use crate::model::extension::ExtensionKind;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kind: &ExtensionKind, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(kind.display_name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ExtensionKind, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ExtensionKind::from_display_name(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown extension type `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::{records_from_json, records_to_json, ManifestRecord};
    use crate::model::extension::ExtensionKind;

    #[test]
    fn json_uses_display_type_names() {
        let record = ManifestRecord::enabled(
            ExtensionKind::EditorPlugin,
            "Spell check",
            "ext/spell",
            "core team",
        );
        let json = records_to_json(&[record.clone()]).expect("serialize manifest");
        assert!(json.contains("\"type\": \"Editor Plugin\""));
        assert!(json.contains("\"enabled\": true"));

        let parsed = records_from_json(&json).expect("parse manifest");
        assert_eq!(parsed, vec![record]);
    }

    #[test]
    fn rejects_unknown_type_name() {
        let raw = r#"[{"type":"Theme","name":"","path":"ext/t","dev":"","enabled":true}]"#;
        let err = records_from_json(raw).expect_err("unknown type must fail");
        assert!(err.to_string().contains("unknown extension type"));
    }
}
