//! Recorded schema snapshots, one per schema version
//!
//! A snapshot, once saved, is never rewritten: the schema a payload was
//! encoded under must stay available verbatim for later migration.

mod file;
mod memory;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use std::sync::Arc;
use verscodec_core::{Result, SchemaSnapshot};

/// Outcome of saving a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot was persisted
    Written,
    /// A snapshot for this version already existed and was left untouched
    AlreadyPresent,
}

impl SaveOutcome {
    /// True if this call persisted the snapshot
    pub fn is_written(&self) -> bool {
        matches!(self, SaveOutcome::Written)
    }
}

/// Persistent map from schema version to snapshot
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot` unless its version is already recorded
    fn save(&self, snapshot: &SchemaSnapshot) -> Result<SaveOutcome>;

    /// Load the snapshot recorded for `version`
    fn load(&self, version: u16) -> Result<Option<SchemaSnapshot>>;

    /// Every recorded version, ascending
    fn versions(&self) -> Result<Vec<u16>>;

    /// True if `version` is recorded
    fn contains(&self, version: u16) -> Result<bool> {
        Ok(self.load(version)?.is_some())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn save(&self, snapshot: &SchemaSnapshot) -> Result<SaveOutcome> {
        (**self).save(snapshot)
    }

    fn load(&self, version: u16) -> Result<Option<SchemaSnapshot>> {
        (**self).load(version)
    }

    fn versions(&self) -> Result<Vec<u16>> {
        (**self).versions()
    }

    fn contains(&self, version: u16) -> Result<bool> {
        (**self).contains(version)
    }
}
