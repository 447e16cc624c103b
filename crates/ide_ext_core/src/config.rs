//! Manager configuration loaded from JSON.
//!
//! # Invariants
//! - Missing fields fall back to defaults.
//! - A validated config carries a known log level and, when set, an
//!   absolute log directory.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
            Self::Invalid(_) => "config_invalid",
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "malformed config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one [`crate::ExtensionManager`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    pub log_dir: Option<String>,
    /// SQLite manifest file; the in-memory store is used when unset.
    pub manifest_db_path: Option<PathBuf>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            manifest_db_path: None,
        }
    }
}

impl ManagerConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) && level != "warning" {
            return Err(ConfigError::Invalid(format!(
                "log_level `{}` is not one of trace|debug|info|warn|error",
                self.log_level
            )));
        }
        if let Some(log_dir) = &self.log_dir {
            if !Path::new(log_dir.trim()).is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{log_dir}`"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ManagerConfig};
    use std::io::Write;

    #[test]
    fn empty_object_uses_defaults() {
        let config = ManagerConfig::from_json_str("{}").expect("empty config should parse");
        assert_eq!(config, ManagerConfig::default());
        assert!(config.log_dir.is_none());
        assert!(config.manifest_db_path.is_none());
    }

    #[test]
    fn rejects_unknown_level_and_relative_log_dir() {
        let err = ManagerConfig::from_json_str(r#"{"log_level":"loud"}"#)
            .expect_err("unknown level must fail");
        assert_eq!(err.error_code(), "config_invalid");

        let err = ManagerConfig::from_json_str(r#"{"log_dir":"logs"}"#)
            .expect_err("relative log dir must fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ManagerConfig::from_json_str("{").expect_err("truncated JSON must fail");
        assert_eq!(err.error_code(), "config_parse");
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be created");
        write!(
            file,
            r#"{{"log_level":"warn","manifest_db_path":"/tmp/ide-ext/manifest.sqlite3"}}"#
        )
        .expect("config should be written");

        let config = ManagerConfig::load(file.path()).expect("config file should load");
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.manifest_db_path.as_deref(),
            Some(std::path::Path::new("/tmp/ide-ext/manifest.sqlite3"))
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let err = ManagerConfig::load(dir.path().join("absent.json"))
            .expect_err("missing file must fail");
        assert_eq!(err.error_code(), "config_io");
    }
}
