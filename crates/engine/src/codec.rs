//! Codec facade
//!
//! Ties the registry, configuration and snapshot history together:
//!
//! ```text
//! ReadHeader -> SameVersionDecode                 -> Done
//!            -> LookupSnapshot -> MigrationDecode -> Done
//! ```
//!
//! A payload whose version has no recorded snapshot fails as a whole with
//! `UnknownVersion`; no partially decoded record is returned.

use crate::config::{CodecConfig, ConfigError};
use crate::decoder::decode_into_bounded;
use crate::encoder::encode_record_bounded;
use crate::history::SnapshotHistory;
use crate::migration::{migrate_into_bounded, MigrationReport};
use crate::registry::{extract_snapshot, SchemaRegistry};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use verscodec_core::{
    ByteCursor, ClassDescriptor, Error, Record, Result, SchemaProvider, SchemaSnapshot, Versioned,
    DEFAULT_MAX_DEPTH,
};
use verscodec_durability::{frame, unframe, FileSnapshotStore, PayloadFile, SaveOutcome, SnapshotStore};

/// Versioned object codec
pub struct Codec<S: SnapshotStore> {
    registry: Arc<SchemaRegistry>,
    config: CodecConfig,
    history: SnapshotHistory<S>,
}

impl Codec<FileSnapshotStore> {
    /// Codec backed by snapshot files in `config.snapshot_dir`
    pub fn open(
        registry: impl Into<Arc<SchemaRegistry>>,
        config: CodecConfig,
    ) -> std::result::Result<Self, ConfigError> {
        let store = FileSnapshotStore::new(config.store_config())?;
        Self::new(registry, config, store)
    }
}

impl<S: SnapshotStore> Codec<S> {
    /// Create a codec after validating `config` and `registry`
    pub fn new(
        registry: impl Into<Arc<SchemaRegistry>>,
        config: CodecConfig,
        store: S,
    ) -> std::result::Result<Self, ConfigError> {
        let registry = registry.into();
        config.validate()?;
        registry
            .validate()
            .map_err(|e| ConfigError::InvalidRegistry(e.to_string()))?;
        debug!(
            current_version = config.current_version,
            classes = registry.len(),
            "Codec created"
        );
        Ok(Codec {
            registry,
            config,
            history: SnapshotHistory::new(store),
        })
    }

    /// Registry of current classes
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Version new payloads are written under
    pub fn current_version(&self) -> u16 {
        self.config.current_version
    }

    /// Historical snapshot cache
    pub fn history(&self) -> &SnapshotHistory<S> {
        &self.history
    }

    /// Snapshot of the current registry
    pub fn current_snapshot(&self) -> Result<SchemaSnapshot> {
        extract_snapshot(self.registry.as_ref(), self.config.current_version)
    }

    /// Record the current schema unless its version is already recorded
    ///
    /// Extraction is skipped entirely when the version exists.
    pub fn record_current_schema(&self) -> Result<SaveOutcome> {
        let version = self.config.current_version;
        if self.history.contains(version)? {
            debug!(version, "Current schema already recorded");
            return Ok(SaveOutcome::AlreadyPresent);
        }
        let snapshot = self.current_snapshot()?;
        let outcome = self.history.record(&snapshot)?;
        if outcome.is_written() {
            info!(version, classes = snapshot.classes.len(), "Recorded current schema");
        }
        Ok(outcome)
    }

    /// Load every recorded version into the cache; returns how many
    pub fn preload_history(&self) -> Result<usize> {
        self.history.preload()
    }

    /// Encode `record` with its header
    pub fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let payload = self.encode_payload(record)?;
        frame(self.config.current_version, &payload)
    }

    fn encode_payload(&self, record: &Record) -> Result<Vec<u8>> {
        let class = self.registry.require_class(record.class_name())?;
        encode_record_bounded(record, class, self.registry.as_ref(), self.config.max_depth)
    }

    /// Decode a framed payload into `into`, migrating if necessary
    pub fn decode(&self, bytes: &[u8], class_name: &str, into: Record) -> Result<Record> {
        self.decode_with_report(bytes, class_name, into)
            .map(|(record, _)| record)
    }

    /// Decode like [`Codec::decode`], also returning what migration dropped
    pub fn decode_with_report(
        &self,
        bytes: &[u8],
        class_name: &str,
        into: Record,
    ) -> Result<(Record, MigrationReport)> {
        let class = self.registry.require_class(class_name)?;
        decode_framed(
            bytes,
            class,
            self.registry.as_ref(),
            self.config.current_version,
            &self.history,
            into,
            DecodeOptions {
                verify_trailing_bytes: self.config.verify_trailing_bytes,
                max_depth: self.config.max_depth,
            },
        )
    }

    /// Encode a typed value
    pub fn encode_value<T: Versioned>(&self, value: &T) -> Result<Vec<u8>> {
        self.encode(&value.to_record())
    }

    /// Decode a typed value
    ///
    /// Fields absent from an old payload keep their default values.
    pub fn decode_value<T: Versioned>(&self, bytes: &[u8]) -> Result<T> {
        let name = T::class_descriptor().qualified_name;
        let class = self.registry.require_class(&name)?;
        let record = self.decode(bytes, &name, Record::fresh(class))?;
        T::from_record(&record)
    }

    /// Encode `record` into the file at `path`, replacing it atomically
    pub fn save_to_file(&self, path: impl AsRef<Path>, record: &Record) -> Result<()> {
        let payload = self.encode_payload(record)?;
        PayloadFile::new(path.as_ref()).write(self.config.current_version, &payload)
    }

    /// Decode the object stored at `path`
    ///
    /// A missing file is an I/O error.
    pub fn load_from_file(
        &self,
        path: impl AsRef<Path>,
        class_name: &str,
        into: Record,
    ) -> Result<Record> {
        let bytes = PayloadFile::new(path.as_ref()).read()?;
        self.decode(&bytes, class_name, into)
    }
}

impl<S: SnapshotStore + std::fmt::Debug> std::fmt::Debug for Codec<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("config", &self.config)
            .field("classes", &self.registry.len())
            .field("history", &self.history)
            .finish()
    }
}

/// Encode `record` against `class` and frame it under `current_version`
pub fn encode<P: SchemaProvider + ?Sized>(
    record: &Record,
    class: &ClassDescriptor,
    provider: &P,
    current_version: u16,
) -> Result<Vec<u8>> {
    let payload = encode_record_bounded(record, class, provider, DEFAULT_MAX_DEPTH)?;
    frame(current_version, &payload)
}

/// Decode a framed payload for `class` into `into`
///
/// Payloads written under `current_version` are decoded directly; others
/// are migrated through the snapshot `history` records for their version.
/// Leftover payload bytes are `TrailingBytes`.
pub fn decode<P, S>(
    bytes: &[u8],
    class: &ClassDescriptor,
    provider: &P,
    current_version: u16,
    history: &SnapshotHistory<S>,
    into: Record,
) -> Result<Record>
where
    P: SchemaProvider + ?Sized,
    S: SnapshotStore,
{
    let options = DecodeOptions {
        verify_trailing_bytes: true,
        max_depth: DEFAULT_MAX_DEPTH,
    };
    decode_framed(bytes, class, provider, current_version, history, into, options)
        .map(|(record, _)| record)
}

#[derive(Debug, Clone, Copy)]
struct DecodeOptions {
    verify_trailing_bytes: bool,
    max_depth: usize,
}

fn decode_framed<P, S>(
    bytes: &[u8],
    class: &ClassDescriptor,
    provider: &P,
    current_version: u16,
    history: &SnapshotHistory<S>,
    mut into: Record,
    options: DecodeOptions,
) -> Result<(Record, MigrationReport)>
where
    P: SchemaProvider + ?Sized,
    S: SnapshotStore,
{
    let (header, payload) = unframe(bytes)?;
    let source_version = header.schema_version;
    let mut report = MigrationReport::new(source_version, current_version);
    let mut cursor = ByteCursor::new(payload);

    if source_version == current_version {
        decode_into_bounded(&mut cursor, class, provider, &mut into, options.max_depth)?;
    } else {
        let snapshot = history.get(source_version)?;
        migrate_into_bounded(
            &mut cursor,
            &snapshot,
            class,
            provider,
            &mut into,
            &mut report,
            options.max_depth,
        )?;
        info!(
            class = %class.qualified_name,
            from = source_version,
            to = current_version,
            skipped = report.skipped.len(),
            coerced = report.coerced.len(),
            "Migrated payload"
        );
    }

    if options.verify_trailing_bytes && !cursor.is_exhausted() {
        return Err(Error::TrailingBytes {
            remaining: cursor.remaining(),
        });
    }
    Ok((into, report))
}
