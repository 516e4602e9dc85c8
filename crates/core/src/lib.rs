//! Core types and traits for verscodec
//!
//! This crate defines the foundational types used throughout the system:
//! - WireTag / Shape: physical encoding discriminators
//! - FieldDescriptor / ClassDescriptor / SchemaSnapshot: recorded schema shapes
//! - Value / Record: the dynamic object model
//! - Decimal128 / Ticks: wire-exact decimal and timestamp types
//! - codec: primitive wire codec, byte cursor, coercion table
//! - limits: nesting depth guard for recursive encode/decode
//! - Error: error type hierarchy
//! - Traits: SchemaProvider, Versioned, FromValue

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod decimal;
pub mod error;
pub mod limits;
pub mod record;
pub mod schema;
pub mod ticks;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types and traits
pub use codec::ByteCursor;
pub use decimal::Decimal128;
pub use error::{Error, Result};
pub use limits::{Depth, DEFAULT_MAX_DEPTH};
pub use record::Record;
pub use schema::{ClassDescriptor, FieldDescriptor, SchemaSnapshot};
pub use ticks::Ticks;
pub use traits::{FromValue, SchemaProvider, Versioned};
pub use types::{Shape, WireTag};
pub use value::Value;
