//! verscodec - schema-versioned binary object codec
//!
//! Objects are encoded as compact, tag-free binary payloads laid out in
//! their class's declared field order. Every payload carries the schema
//! version it was written under; the shape of each version's classes is
//! recorded once as a snapshot, so payloads written by older releases can
//! still be read after fields are added, removed or retyped.
//!
//! # Quick Start
//!
//! ```ignore
//! use verscodec::{Codec, CodecConfig, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new().with_type::<Player>()?;
//! let codec = Codec::open(registry, CodecConfig::new(3))?;
//! codec.record_current_schema()?;
//!
//! let bytes = codec.encode_value(&player)?;
//! let back: Player = codec.decode_value(&bytes)?;
//! ```
//!
//! # Architecture
//!
//! - `verscodec-core`: wire tags, descriptors, values, primitive codec
//! - `verscodec-durability`: snapshot stores and payload framing
//! - `verscodec-engine`: registry, encoder, decoders, the [`Codec`] facade

pub use verscodec_core::{
    codec::{can_coerce, coerce, coercion_pairs},
    ByteCursor, ClassDescriptor, Decimal128, Depth, Error, FieldDescriptor, FromValue, Record, Result,
    SchemaProvider, SchemaSnapshot, Shape, Ticks, Value, Versioned, WireTag, DEFAULT_MAX_DEPTH,
};
pub use verscodec_durability::{
    FileSnapshotStore, MemorySnapshotStore, PayloadFile, PayloadHeader, SaveOutcome,
    SnapshotStore, StoreConfig, PAYLOAD_HEADER_SIZE,
};
pub use verscodec_engine::{
    decode, encode, extract_snapshot, CodecConfig, CoercedField, Codec, ConfigError,
    MigrationReport, SchemaRegistry, SkipReason, SkippedField, SnapshotHistory,
};
