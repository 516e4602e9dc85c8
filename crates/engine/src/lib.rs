//! Codec engine for verscodec
//!
//! This crate orchestrates the lower layers:
//! - Registry: explicitly registered classes and snapshot extraction
//! - Encoder / decoder: declared-order object layout
//! - Migration: decoding payloads written under older snapshots
//! - History: lazily loaded, cached historical snapshots
//! - Codec: the facade tying registry, config and history together
//!
//! The engine is the only component that knows about:
//! - Which version is current
//! - When a payload needs migration rather than a direct decode

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod history;
pub mod migration;
pub mod registry;

pub use codec::{decode, encode, Codec};
pub use config::{CodecConfig, ConfigError};
pub use decoder::{decode_into, decode_into_bounded};
pub use encoder::{encode_into, encode_record, encode_record_bounded};
pub use history::SnapshotHistory;
pub use migration::{
    migrate_into, migrate_into_bounded, CoercedField, MigrationReport, SkipReason, SkippedField,
};
pub use registry::{extract_snapshot, SchemaRegistry};
