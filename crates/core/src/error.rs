//! Error types for verscodec
//!
//! This module defines all error types used by the codec and its stores.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! - `Truncated`: the buffer is shorter than a tag demands (always fatal)
//! - `UnknownVersion`: a payload was written under a version with no recorded snapshot
//! - `TypeMismatch` / `UnsupportedTag` / `ValueOutOfRange`: encoding programmer errors
//! - Everything else describes corrupt input, invalid schemas, or I/O failures
//!
//! Fields that could not be recovered during migration are *not* errors;
//! they are reported through the engine's migration report.

use crate::types::WireTag;
use std::io;
use thiserror::Error;

/// Result type alias for verscodec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the codec
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer ended before a value could be read
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Cursor position where the read started
        offset: usize,
        /// Bytes required by the read
        needed: usize,
        /// Bytes actually remaining
        available: usize,
    },

    /// Payload version has no recorded schema snapshot
    #[error("Unknown schema version: {0}")]
    UnknownVersion(u16),

    /// A descriptor references a class the schema provider does not know
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// A value does not match the wire tag or class it is encoded against
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// What the descriptor demands
        expected: String,
        /// What was supplied
        actual: String,
    },

    /// Tag cannot be handled by the primitive codec
    #[error("Unsupported wire tag for this operation: {0:?}")]
    UnsupportedTag(WireTag),

    /// Value cannot be represented in its wire form
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// String bytes are not valid UTF-8
    #[error("Invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the first string byte
        offset: usize,
    },

    /// Decimal flags word violates the 128-bit decimal layout
    #[error("Invalid decimal flags: {0:#010x}")]
    InvalidDecimal(u32),

    /// Data corruption detected
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Payload was not fully consumed by the decoder
    #[error("{remaining} trailing bytes after decoding payload")]
    TrailingBytes {
        /// Unconsumed byte count
        remaining: usize,
    },

    /// Schema descriptors violate an invariant
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error for snapshot documents
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for errors caused by malformed or short input bytes
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Truncated { .. }
                | Error::InvalidUtf8 { .. }
                | Error::InvalidDecimal(_)
                | Error::Corruption(_)
                | Error::TrailingBytes { .. }
        )
    }
}
