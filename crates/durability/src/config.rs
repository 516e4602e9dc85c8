//! Snapshot store configuration
//!
//! Controls where recorded schema snapshots live on disk and how their
//! files are named.

use std::path::{Path, PathBuf};

/// Default directory for snapshot documents, relative to the working directory
pub const DEFAULT_SNAPSHOT_DIR: &str = "Versions";

/// Default file name prefix; files are named `{prefix}{version}.json`
pub const DEFAULT_FILE_PREFIX: &str = "Version-";

/// File extension of snapshot documents
pub const SNAPSHOT_EXTENSION: &str = "json";

/// File-backed snapshot store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one document per schema version
    pub directory: PathBuf,
    /// File name prefix preceding the version number
    pub file_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            directory: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `directory` with the default prefix
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        StoreConfig {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Set the directory
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the file name prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_prefix.is_empty() {
            return Err(ConfigError::EmptyFilePrefix);
        }
        if self
            .file_prefix
            .chars()
            .any(|c| c == '/' || c == '\\' || c == std::path::MAIN_SEPARATOR)
        {
            return Err(ConfigError::InvalidFilePrefix(self.file_prefix.clone()));
        }
        Ok(())
    }

    /// Path of the document recorded for `version`
    pub fn snapshot_path(&self, version: u16) -> PathBuf {
        self.directory.join(format!(
            "{}{}.{}",
            self.file_prefix, version, SNAPSHOT_EXTENSION
        ))
    }

    /// Version encoded in a snapshot file name, if it follows the naming scheme
    pub fn parse_version(&self, path: &Path) -> Option<u16> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(SNAPSHOT_EXTENSION)?.strip_suffix('.')?;
        let digits = stem.strip_prefix(self.file_prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// File prefix is empty
    #[error("Snapshot file prefix must not be empty")]
    EmptyFilePrefix,

    /// File prefix contains a path separator
    #[error("Snapshot file prefix contains a path separator: {0:?}")]
    InvalidFilePrefix(String),
}
