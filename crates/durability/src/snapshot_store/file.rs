//! File-backed snapshot store
//!
//! One pretty-printed JSON document per version, named
//! `{prefix}{version}.json` inside the configured directory. The directory
//! is created on the first save. A recorded file is never replaced.

use super::{SaveOutcome, SnapshotStore};
use crate::atomic::write_new_atomic;
use crate::config::{ConfigError, StoreConfig};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};
use verscodec_core::{Error, Result, SchemaSnapshot};

/// Snapshot store writing one JSON file per schema version
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    config: StoreConfig,
}

impl FileSnapshotStore {
    /// Create a store after validating `config`
    pub fn new(config: StoreConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(FileSnapshotStore { config })
    }

    /// Store in `directory` with the default file prefix
    pub fn in_directory(directory: impl AsRef<Path>) -> Self {
        FileSnapshotStore {
            config: StoreConfig::new(directory.as_ref()),
        }
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

fn serialization_error(e: serde_json::Error) -> Error {
    Error::Serialization(e.to_string())
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, snapshot: &SchemaSnapshot) -> Result<SaveOutcome> {
        let version = snapshot.schema_version;
        let path = self.config.snapshot_path(version);
        if path.exists() {
            debug!(version, path = %path.display(), "Snapshot already recorded");
            return Ok(SaveOutcome::AlreadyPresent);
        }

        snapshot.validate()?;
        let json = serde_json::to_vec_pretty(snapshot).map_err(serialization_error)?;
        // The name may have been claimed since the check above
        if !write_new_atomic(&path, &json)? {
            debug!(version, path = %path.display(), "Snapshot recorded concurrently");
            return Ok(SaveOutcome::AlreadyPresent);
        }

        info!(
            version,
            classes = snapshot.classes.len(),
            path = %path.display(),
            "Recorded schema snapshot"
        );
        Ok(SaveOutcome::Written)
    }

    fn load(&self, version: u16) -> Result<Option<SchemaSnapshot>> {
        let path = self.config.snapshot_path(version);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: SchemaSnapshot =
            serde_json::from_slice(&bytes).map_err(serialization_error)?;
        if snapshot.schema_version != version {
            return Err(Error::Corruption(format!(
                "{} records schema version {}",
                path.display(),
                snapshot.schema_version
            )));
        }

        debug!(version, classes = snapshot.classes.len(), "Loaded schema snapshot");
        Ok(Some(snapshot))
    }

    fn versions(&self) -> Result<Vec<u16>> {
        let entries = match fs::read_dir(&self.config.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(version) = self.config.parse_version(&entry.path()) {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    fn contains(&self, version: u16) -> Result<bool> {
        Ok(self.config.snapshot_path(version).is_file())
    }
}
