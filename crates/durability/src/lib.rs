//! Durability layer for verscodec
//!
//! This crate handles everything that touches disk:
//!
//! - Snapshot stores: one recorded schema snapshot per version
//!   (file-backed JSON documents or in-memory)
//! - Payload framing: the six-byte version/length header
//! - Payload files: one framed object per file, written atomically
//! - Store configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod atomic; // Crash-safe temp-file-and-rename writes
pub mod config; // StoreConfig and validation
pub mod format; // Binary framing of encoded objects
pub mod payload_file; // One framed object per file
pub mod snapshot_store; // SnapshotStore trait and implementations

pub use config::{ConfigError, StoreConfig, DEFAULT_FILE_PREFIX, DEFAULT_SNAPSHOT_DIR};
pub use format::{frame, unframe, PayloadHeader, PAYLOAD_HEADER_SIZE};
pub use payload_file::PayloadFile;
pub use snapshot_store::{FileSnapshotStore, MemorySnapshotStore, SaveOutcome, SnapshotStore};
