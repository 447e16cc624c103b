//! SQLite-backed manifest store.
//!
//! # Invariants
//! - `position` is assigned once on first insert and never rewritten.
//! - Rows are decoded strictly; unknown kinds or flags are rejected.

use super::{ManifestRecord, ManifestResult, ManifestStore, ManifestStoreError};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::extension::ExtensionKind;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const MANIFEST_SELECT_SQL: &str = "SELECT path, kind, name, dev, enabled
FROM extension_manifest";

/// Manifest store persisted in one SQLite database.
pub struct SqliteManifestStore {
    conn: Connection,
}

impl SqliteManifestStore {
    /// Opens (and migrates) a manifest database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl ManifestStore for SqliteManifestStore {
    fn upsert(&mut self, record: ManifestRecord) -> ManifestResult<()> {
        self.conn.execute(
            "INSERT INTO extension_manifest (path, kind, name, dev, enabled, position)
             VALUES (
                ?1, ?2, ?3, ?4, ?5,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM extension_manifest)
             )
             ON CONFLICT(path) DO UPDATE SET
                kind = excluded.kind,
                name = excluded.name,
                dev = excluded.dev,
                enabled = excluded.enabled,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                record.path.as_str(),
                record.kind.display_name(),
                record.name.as_str(),
                record.dev.as_str(),
                bool_to_int(record.enabled),
            ],
        )?;
        Ok(())
    }

    fn set_enabled(&mut self, path: &str, enabled: bool) -> ManifestResult<bool> {
        let changed = self.conn.execute(
            "UPDATE extension_manifest
             SET
                enabled = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE path = ?2;",
            params![bool_to_int(enabled), path],
        )?;
        Ok(changed > 0)
    }

    fn get(&self, path: &str) -> ManifestResult<Option<ManifestRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MANIFEST_SELECT_SQL} WHERE path = ?1;"))?;
        let row = stmt.query_row([path], read_raw_row).optional()?;
        row.map(parse_raw_row).transpose()
    }

    fn list(&self) -> ManifestResult<Vec<ManifestRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MANIFEST_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_raw_row(read_raw_row(row)?)?);
        }
        Ok(records)
    }
}

struct RawManifestRow {
    path: String,
    kind: String,
    name: String,
    dev: String,
    enabled: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawManifestRow> {
    Ok(RawManifestRow {
        path: row.get("path")?,
        kind: row.get("kind")?,
        name: row.get("name")?,
        dev: row.get("dev")?,
        enabled: row.get("enabled")?,
    })
}

fn parse_raw_row(raw: RawManifestRow) -> ManifestResult<ManifestRecord> {
    let kind = ExtensionKind::from_display_name(&raw.kind).ok_or_else(|| {
        ManifestStoreError::InvalidData(format!(
            "invalid kind `{}` in extension_manifest.kind",
            raw.kind
        ))
    })?;
    let enabled = match raw.enabled {
        0 => false,
        1 => true,
        other => {
            return Err(ManifestStoreError::InvalidData(format!(
                "invalid enabled value `{other}` in extension_manifest.enabled"
            )));
        }
    };
    Ok(ManifestRecord {
        kind,
        name: raw.name,
        path: raw.path,
        dev: raw.dev,
        enabled,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
