//! Primitive wire codec
//!
//! Converts between each primitive `Value` and its fixed little-endian
//! byte form. Object and sequence framing is handled by the engine; this
//! module only knows single primitive values.
//!
//! # Binary Format
//!
//! - Integers and floats: little-endian, natural width
//! - Bool: one byte, written as 0/1, any non-zero byte reads as true
//! - Char: one byte (Latin-1 code point)
//! - Decimal128: words `lo, mid, hi, flags`, each u32 LE
//! - String: `int32` byte length + UTF-8 bytes, no terminator
//! - DateTime: `int64` ticks

use super::cursor::ByteCursor;
use crate::decimal::Decimal128;
use crate::error::{Error, Result};
use crate::ticks::Ticks;
use crate::types::WireTag;
use crate::value::Value;
use byteorder::{LittleEndian, WriteBytesExt};

/// Append an `int32` length or count prefix
pub fn encode_length(len: usize, out: &mut Vec<u8>) -> Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| Error::ValueOutOfRange(format!("length {} exceeds int32", len)))?;
    out.write_i32::<LittleEndian>(len)?;
    Ok(())
}

/// Append a length-prefixed UTF-8 string
pub fn encode_string(s: &str, out: &mut Vec<u8>) -> Result<()> {
    encode_length(s.len(), out)?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Append one primitive value encoded as `tag`
///
/// The value's variant must be the one `tag` describes; anything else is a
/// programmer error and fails before a byte is written.
pub fn encode_primitive(value: &Value, tag: WireTag, out: &mut Vec<u8>) -> Result<()> {
    match (tag, value) {
        (WireTag::Byte, Value::Byte(v)) => out.write_u8(*v)?,
        (WireTag::SByte, Value::SByte(v)) => out.write_i8(*v)?,
        (WireTag::Bool, Value::Bool(v)) => out.write_u8(u8::from(*v))?,
        (WireTag::Char, Value::Char(c)) => {
            let byte = u8::try_from(u32::from(*c)).map_err(|_| {
                Error::ValueOutOfRange(format!("char {:?} does not fit in one byte", c))
            })?;
            out.write_u8(byte)?
        }
        (WireTag::Int16, Value::Int16(v)) => out.write_i16::<LittleEndian>(*v)?,
        (WireTag::UInt16, Value::UInt16(v)) => out.write_u16::<LittleEndian>(*v)?,
        (WireTag::Int32, Value::Int32(v)) => out.write_i32::<LittleEndian>(*v)?,
        (WireTag::UInt32, Value::UInt32(v)) => out.write_u32::<LittleEndian>(*v)?,
        (WireTag::Int64, Value::Int64(v)) => out.write_i64::<LittleEndian>(*v)?,
        (WireTag::UInt64, Value::UInt64(v)) => out.write_u64::<LittleEndian>(*v)?,
        (WireTag::Decimal128, Value::Decimal(d)) => {
            for word in d.words() {
                out.write_u32::<LittleEndian>(word)?;
            }
        }
        (WireTag::Float32, Value::Float32(v)) => out.write_f32::<LittleEndian>(*v)?,
        (WireTag::Float64, Value::Float64(v)) => out.write_f64::<LittleEndian>(*v)?,
        (WireTag::String, Value::String(s)) => encode_string(s, out)?,
        (WireTag::DateTime, Value::DateTime(t)) => out.write_i64::<LittleEndian>(t.as_raw())?,
        (WireTag::Object, _) => return Err(Error::UnsupportedTag(WireTag::Object)),
        (tag, value) => return Err(Error::type_mismatch(tag.to_string(), value.type_name())),
    }
    Ok(())
}

/// Read one primitive value encoded as `tag`
pub fn decode_primitive(cursor: &mut ByteCursor<'_>, tag: WireTag) -> Result<Value> {
    Ok(match tag {
        WireTag::Byte => Value::Byte(cursor.read_u8()?),
        WireTag::SByte => Value::SByte(cursor.read_u8()? as i8),
        WireTag::Bool => Value::Bool(cursor.read_u8()? != 0),
        WireTag::Char => Value::Char(char::from(cursor.read_u8()?)),
        WireTag::Int16 => Value::Int16(cursor.read_i16()?),
        WireTag::UInt16 => Value::UInt16(cursor.read_u16()?),
        WireTag::Int32 => Value::Int32(cursor.read_i32()?),
        WireTag::UInt32 => Value::UInt32(cursor.read_u32()?),
        WireTag::Int64 => Value::Int64(cursor.read_i64()?),
        WireTag::UInt64 => Value::UInt64(cursor.read_u64()?),
        WireTag::Decimal128 => {
            let bytes = cursor.take(16)?;
            let mut words = [0u32; 4];
            for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
                *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            Value::Decimal(Decimal128::from_words(words)?)
        }
        WireTag::Float32 => Value::Float32(cursor.read_f32()?),
        WireTag::Float64 => Value::Float64(cursor.read_f64()?),
        WireTag::String => Value::String(decode_string(cursor)?),
        WireTag::DateTime => Value::DateTime(Ticks::from_raw(cursor.read_i64()?)),
        WireTag::Object => return Err(Error::UnsupportedTag(WireTag::Object)),
    })
}

/// Read a length-prefixed UTF-8 string
pub fn decode_string(cursor: &mut ByteCursor<'_>) -> Result<String> {
    let len = cursor.read_length()?;
    let offset = cursor.position();
    let bytes = cursor.take(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidUtf8 { offset })
}

/// Consume one primitive value without materializing it
pub fn skip_primitive(cursor: &mut ByteCursor<'_>, tag: WireTag) -> Result<()> {
    match tag {
        WireTag::String => {
            let len = cursor.read_length()?;
            cursor.skip(len)
        }
        WireTag::Object => Err(Error::UnsupportedTag(WireTag::Object)),
        fixed => match fixed.fixed_width() {
            Some(width) => cursor.skip(width),
            None => Err(Error::UnsupportedTag(fixed)),
        },
    }
}
