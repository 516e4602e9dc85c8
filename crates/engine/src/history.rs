//! Lazily loaded historical snapshots
//!
//! Snapshots are immutable once recorded, so the first load of a version is
//! cached for the life of the history and shared as `Arc`s. Lookups take a
//! read lock; only a cache miss takes the write lock.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use verscodec_core::{Error, Result, SchemaSnapshot};
use verscodec_durability::{SaveOutcome, SnapshotStore};

/// Cache of recorded snapshots in front of a store
pub struct SnapshotHistory<S: SnapshotStore> {
    store: S,
    cache: RwLock<HashMap<u16, Arc<SchemaSnapshot>>>,
}

impl<S: SnapshotStore> SnapshotHistory<S> {
    /// Create an empty history over `store`
    pub fn new(store: S) -> Self {
        SnapshotHistory {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot recorded for `version`, loading it on first use
    ///
    /// Fails with `UnknownVersion` if the store has no such version.
    pub fn get(&self, version: u16) -> Result<Arc<SchemaSnapshot>> {
        if let Some(snapshot) = self.cache.read().get(&version) {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = self
            .store
            .load(version)?
            .ok_or(Error::UnknownVersion(version))?;

        let mut cache = self.cache.write();
        let entry = cache.entry(version).or_insert_with(|| {
            debug!(version, classes = snapshot.classes.len(), "Cached historical snapshot");
            Arc::new(snapshot)
        });
        Ok(Arc::clone(entry))
    }

    /// Persist `snapshot` unless its version is already recorded
    pub fn record(&self, snapshot: &SchemaSnapshot) -> Result<SaveOutcome> {
        self.store.save(snapshot)
    }

    /// True if `version` is recorded
    pub fn contains(&self, version: u16) -> Result<bool> {
        if self.cache.read().contains_key(&version) {
            return Ok(true);
        }
        self.store.contains(version)
    }

    /// Load every recorded version into the cache; returns how many
    pub fn preload(&self) -> Result<usize> {
        let versions = self.store.versions()?;
        for &version in &versions {
            self.get(version)?;
        }
        Ok(versions.len())
    }

    /// Versions currently cached, ascending
    pub fn cached_versions(&self) -> Vec<u16> {
        let mut versions: Vec<u16> = self.cache.read().keys().copied().collect();
        versions.sort_unstable();
        versions
    }
}

impl<S: SnapshotStore + std::fmt::Debug> std::fmt::Debug for SnapshotHistory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHistory")
            .field("store", &self.store)
            .field("cached_versions", &self.cached_versions())
            .finish()
    }
}
