//! Value types for verscodec
//!
//! This module defines:
//! - Value: closed tagged union over every wire tag
//!
//! ## Type Rules
//!
//! - One variant per primitive wire tag, plus `Object` and `Sequence`
//! - No implicit coercions: `Int32(1) != Int64(1)`; conversions go through
//!   the explicit table in `codec::convert`
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use crate::decimal::Decimal128;
use crate::record::Record;
use crate::ticks::Ticks;
use crate::types::WireTag;
use serde::{Deserialize, Serialize};

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Unsigned 8-bit integer
    Byte(u8),
    /// Signed 8-bit integer
    SByte(i8),
    /// Boolean
    Bool(bool),
    /// Single-byte character (U+0000..=U+00FF on the wire)
    Char(char),
    /// Signed 16-bit integer
    Int16(i16),
    /// Unsigned 16-bit integer
    UInt16(u16),
    /// Signed 32-bit integer
    Int32(i32),
    /// Unsigned 32-bit integer
    UInt32(u32),
    /// Signed 64-bit integer
    Int64(i64),
    /// Unsigned 64-bit integer
    UInt64(u64),
    /// 128-bit decimal
    Decimal(Decimal128),
    /// Single precision float
    Float32(f32),
    /// Double precision float
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// Tick timestamp
    DateTime(Ticks),
    /// Nested object; `None` is an absent object
    Object(Option<Record>),
    /// Homogeneous sequence (List or Array shape)
    Sequence(Vec<Value>),
}

impl Value {
    /// Zero value for a tag: numeric zero, `false`, NUL, empty string,
    /// tick 0, or an absent object
    pub fn default_for(tag: WireTag) -> Value {
        match tag {
            WireTag::Byte => Value::Byte(0),
            WireTag::SByte => Value::SByte(0),
            WireTag::Bool => Value::Bool(false),
            WireTag::Char => Value::Char('\0'),
            WireTag::Int16 => Value::Int16(0),
            WireTag::UInt16 => Value::UInt16(0),
            WireTag::Int32 => Value::Int32(0),
            WireTag::UInt32 => Value::UInt32(0),
            WireTag::Int64 => Value::Int64(0),
            WireTag::UInt64 => Value::UInt64(0),
            WireTag::Decimal128 => Value::Decimal(Decimal128::ZERO),
            WireTag::Float32 => Value::Float32(0.0),
            WireTag::Float64 => Value::Float64(0.0),
            WireTag::String => Value::String(String::new()),
            WireTag::DateTime => Value::DateTime(Ticks::EPOCH),
            WireTag::Object => Value::Object(None),
        }
    }

    /// Wire tag this value encodes as; `None` for sequences
    pub fn tag(&self) -> Option<WireTag> {
        Some(match self {
            Value::Byte(_) => WireTag::Byte,
            Value::SByte(_) => WireTag::SByte,
            Value::Bool(_) => WireTag::Bool,
            Value::Char(_) => WireTag::Char,
            Value::Int16(_) => WireTag::Int16,
            Value::UInt16(_) => WireTag::UInt16,
            Value::Int32(_) => WireTag::Int32,
            Value::UInt32(_) => WireTag::UInt32,
            Value::Int64(_) => WireTag::Int64,
            Value::UInt64(_) => WireTag::UInt64,
            Value::Decimal(_) => WireTag::Decimal128,
            Value::Float32(_) => WireTag::Float32,
            Value::Float64(_) => WireTag::Float64,
            Value::String(_) => WireTag::String,
            Value::DateTime(_) => WireTag::DateTime,
            Value::Object(_) => WireTag::Object,
            Value::Sequence(_) => return None,
        })
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Sequence(_) => "Sequence",
            Value::Byte(_) => "Byte",
            Value::SByte(_) => "SByte",
            Value::Bool(_) => "Bool",
            Value::Char(_) => "Char",
            Value::Int16(_) => "Int16",
            Value::UInt16(_) => "UInt16",
            Value::Int32(_) => "Int32",
            Value::UInt32(_) => "UInt32",
            Value::Int64(_) => "Int64",
            Value::UInt64(_) => "UInt64",
            Value::Decimal(_) => "Decimal128",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::String(_) => "String",
            Value::DateTime(_) => "DateTime",
            Value::Object(_) => "Object",
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i32 if this is an Int32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int64 value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as f32 if this is a Float32 value
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float64 value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the nested record if this is a present Object
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Object(Some(r)) => Some(r),
            _ => None,
        }
    }

    /// Get the elements if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    u8 => Byte,
    i8 => SByte,
    bool => Bool,
    char => Char,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    Decimal128 => Decimal,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Ticks => DateTime,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Object(Some(r))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}
