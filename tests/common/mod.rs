//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's
//! main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
pub use verscodec::{
    ClassDescriptor, Codec, CodecConfig, Error, FieldDescriptor, FileSnapshotStore,
    MemorySnapshotStore, MigrationReport, Record, SchemaRegistry, Shape, SkipReason, Value,
    WireTag,
};

// ============================================================================
// Registries
// ============================================================================

/// Registry with `root` as a root class plus every class in `nested`
pub fn registry_of(root: ClassDescriptor, nested: Vec<ClassDescriptor>) -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register_root(root).expect("root class should register");
    for class in nested {
        registry.register(class).expect("nested class should register");
    }
    registry
}

/// Scalar primitive field whose declared type is the tag's name
pub fn scalar(name: &str, tag: WireTag) -> FieldDescriptor {
    FieldDescriptor::scalar(name, tag.to_string(), tag)
}

// ============================================================================
// Codecs
// ============================================================================

/// File-backed codec for `version`, snapshots under `dir`
pub fn file_codec(dir: &Path, version: u16, registry: SchemaRegistry) -> Codec<FileSnapshotStore> {
    Codec::open(registry, CodecConfig::for_testing(dir).with_current_version(version))
        .expect("codec should open")
}

/// Codec over a shared in-memory store
pub fn memory_codec(
    store: &Arc<MemorySnapshotStore>,
    version: u16,
    registry: SchemaRegistry,
) -> Codec<Arc<MemorySnapshotStore>> {
    Codec::new(registry, CodecConfig::new(version), Arc::clone(store)).expect("codec should build")
}

/// Record `record` under `writer`'s schema and decode it with `reader`
pub fn write_then_read(
    writer: &Codec<Arc<MemorySnapshotStore>>,
    reader: &Codec<Arc<MemorySnapshotStore>>,
    record: &Record,
) -> (Record, MigrationReport) {
    writer.record_current_schema().expect("schema should record");
    let bytes = writer.encode(record).expect("encode should succeed");
    let class = reader
        .registry()
        .get(record.class_name())
        .expect("reader should know the class");
    reader
        .decode_with_report(&bytes, record.class_name(), Record::fresh(class))
        .expect("decode should succeed")
}

/// Fresh temp directory
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("temp dir")
}
