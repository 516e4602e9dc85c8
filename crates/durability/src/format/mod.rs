//! On-disk byte formats.
//!
//! # Module Structure
//!
//! - `payload`: header framing one encoded object

pub mod payload;

pub use payload::{frame, unframe, PayloadHeader, PAYLOAD_HEADER_SIZE};
