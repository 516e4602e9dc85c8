//! In-memory snapshot store

use super::{SaveOutcome, SnapshotStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use verscodec_core::{Result, SchemaSnapshot};

/// Snapshot store backed by a map; nothing survives the process
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<BTreeMap<u16, SchemaSnapshot>>,
}

impl MemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded versions
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// True if nothing is recorded
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&self, snapshot: &SchemaSnapshot) -> Result<SaveOutcome> {
        snapshot.validate()?;
        let mut snapshots = self.snapshots.write();
        if snapshots.contains_key(&snapshot.schema_version) {
            return Ok(SaveOutcome::AlreadyPresent);
        }
        snapshots.insert(snapshot.schema_version, snapshot.clone());
        Ok(SaveOutcome::Written)
    }

    fn load(&self, version: u16) -> Result<Option<SchemaSnapshot>> {
        Ok(self.snapshots.read().get(&version).cloned())
    }

    fn versions(&self) -> Result<Vec<u16>> {
        Ok(self.snapshots.read().keys().copied().collect())
    }

    fn contains(&self, version: u16) -> Result<bool> {
        Ok(self.snapshots.read().contains_key(&version))
    }
}
