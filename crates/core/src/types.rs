//! Wire-level type discriminators
//!
//! This module defines:
//! - WireTag: how a single value is physically encoded
//! - Shape: whether a field holds one value or a homogeneous sequence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical encoding of a value
///
/// ## WireTag Values
///
/// The discriminants are stable and MUST NOT change; snapshot documents
/// store the variant name, but tooling may store the byte.
///
/// ## Widths
///
/// - Byte, SByte, Bool, Char: 1
/// - Int16, UInt16: 2
/// - Int32, UInt32, Float32: 4
/// - Int64, UInt64, Float64, DateTime: 8
/// - Decimal128: 16
/// - String: 4-byte length prefix + UTF-8 bytes
/// - Object: 1-byte presence flag + nested field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[repr(u8)]
pub enum WireTag {
    /// Unsigned 8-bit integer
    Byte = 0,
    /// Signed 8-bit integer
    SByte = 1,
    /// Boolean, one byte
    Bool = 2,
    /// Single-byte character
    Char = 3,
    /// Signed 16-bit integer
    Int16 = 4,
    /// Unsigned 16-bit integer
    UInt16 = 5,
    /// Unsigned 32-bit integer
    UInt32 = 6,
    /// Signed 32-bit integer
    Int32 = 7,
    /// Signed 64-bit integer
    Int64 = 8,
    /// Unsigned 64-bit integer
    UInt64 = 9,
    /// 128-bit decimal (four 32-bit words)
    Decimal128 = 10,
    /// IEEE-754 single precision
    Float32 = 11,
    /// IEEE-754 double precision
    Float64 = 12,
    /// Length-prefixed UTF-8 string
    String = 13,
    /// 100-ns ticks since 0001-01-01
    DateTime = 14,
    /// Nested object with presence flag
    Object = 15,
}

impl WireTag {
    /// Every tag, in discriminant order
    pub const ALL: [WireTag; 16] = [
        WireTag::Byte,
        WireTag::SByte,
        WireTag::Bool,
        WireTag::Char,
        WireTag::Int16,
        WireTag::UInt16,
        WireTag::UInt32,
        WireTag::Int32,
        WireTag::Int64,
        WireTag::UInt64,
        WireTag::Decimal128,
        WireTag::Float32,
        WireTag::Float64,
        WireTag::String,
        WireTag::DateTime,
        WireTag::Object,
    ];

    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// Fixed encoded width, or `None` for String and Object
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            WireTag::Byte | WireTag::SByte | WireTag::Bool | WireTag::Char => Some(1),
            WireTag::Int16 | WireTag::UInt16 => Some(2),
            WireTag::Int32 | WireTag::UInt32 | WireTag::Float32 => Some(4),
            WireTag::Int64 | WireTag::UInt64 | WireTag::Float64 | WireTag::DateTime => Some(8),
            WireTag::Decimal128 => Some(16),
            WireTag::String | WireTag::Object => None,
        }
    }

    /// Everything except Object is handled by the primitive codec
    pub fn is_primitive(&self) -> bool {
        !matches!(self, WireTag::Object)
    }

    /// Integer, floating-point and decimal tags
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, WireTag::Float32 | WireTag::Float64 | WireTag::Decimal128)
    }

    /// Fixed-width integer tags
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            WireTag::Byte
                | WireTag::SByte
                | WireTag::Int16
                | WireTag::UInt16
                | WireTag::Int32
                | WireTag::UInt32
                | WireTag::Int64
                | WireTag::UInt64
        )
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Collection shape of a field
///
/// `List` and `Array` share one wire layout (`int32 count` followed by the
/// elements); they are kept apart only so schema matching can tell a
/// container change from an unchanged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Shape {
    /// A single value
    #[default]
    Scalar,
    /// Growable sequence
    List,
    /// Fixed-size sequence
    Array,
}

impl Shape {
    /// True for List and Array
    pub fn is_sequence(&self) -> bool {
        !matches!(self, Shape::Scalar)
    }
}
