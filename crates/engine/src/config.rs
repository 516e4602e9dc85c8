//! Codec configuration
//!
//! Names the schema version new payloads are written under and where the
//! recorded snapshots of every version live.

use std::path::{Path, PathBuf};
use verscodec_core::DEFAULT_MAX_DEPTH;
use verscodec_durability::{StoreConfig, DEFAULT_SNAPSHOT_DIR};

/// Codec configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Version written into every new payload header
    pub current_version: u16,
    /// Directory of recorded snapshots
    pub snapshot_dir: PathBuf,
    /// Reject payloads with bytes left over after decoding
    pub verify_trailing_bytes: bool,
    /// Maximum nesting depth of objects (default: 128)
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            current_version: 1,
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            verify_trailing_bytes: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    /// Config writing payloads under `current_version`
    pub fn new(current_version: u16) -> Self {
        CodecConfig {
            current_version,
            ..Default::default()
        }
    }

    /// Create config for testing
    ///
    /// Snapshots live under `dir`, typically a temp directory.
    pub fn for_testing(dir: impl AsRef<Path>) -> Self {
        CodecConfig {
            snapshot_dir: dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the current version
    pub fn with_current_version(mut self, version: u16) -> Self {
        self.current_version = version;
        self
    }

    /// Set the snapshot directory
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    /// Enable or disable the trailing-bytes check
    pub fn with_verify_trailing_bytes(mut self, verify: bool) -> Self {
        self.verify_trailing_bytes = verify;
        self
    }

    /// Set the maximum object nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Store configuration for the snapshot directory
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.snapshot_dir)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_version == 0 {
            return Err(ConfigError::ZeroVersion);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        self.store_config().validate()?;
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Version 0 is reserved
    #[error("Current schema version must be non-zero")]
    ZeroVersion,

    /// Nested objects could never be encoded
    #[error("Maximum nesting depth must be non-zero")]
    ZeroMaxDepth,

    /// Invalid snapshot store configuration
    #[error("Invalid store config: {0}")]
    InvalidStoreConfig(#[from] verscodec_durability::ConfigError),

    /// Registered classes are inconsistent
    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),
}
