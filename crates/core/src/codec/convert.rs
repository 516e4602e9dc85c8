//! Primitive coercion table
//!
//! When a field keeps its name across schema versions but changes its
//! primitive type, the old value is decoded with its recorded tag and then
//! converted here. Supported pairs are enumerable through `can_coerce`:
//!
//! | from                      | to                        |
//! |---------------------------|---------------------------|
//! | any primitive             | itself                    |
//! | integer, float, decimal   | integer, float, decimal   |
//! | Bool                      | numeric, and back         |
//! | Char                      | integer, and back         |
//! | numeric, Bool, Char       | String                    |
//!
//! Numeric conversion follows Rust `as` casts: integer narrowing wraps,
//! float to integer saturates (NaN becomes 0), integer to float rounds to
//! nearest. Decimal to integer truncates toward zero and saturates at the
//! target bounds. A value that has no representation in the target (NaN or
//! an oversized magnitude into Decimal128) yields `None`.

use crate::decimal::Decimal128;
use crate::types::WireTag;
use crate::value::Value;

/// True if `from` values can be converted into `to` values
pub fn can_coerce(from: WireTag, to: WireTag) -> bool {
    if !from.is_primitive() || !to.is_primitive() {
        return false;
    }
    if from == to {
        return true;
    }
    let scalar_like = |t: WireTag| t.is_numeric() || matches!(t, WireTag::Bool | WireTag::Char);
    match (from, to) {
        (f, WireTag::String) => scalar_like(f),
        (f, t) if f.is_numeric() && t.is_numeric() => true,
        (WireTag::Bool, t) | (t, WireTag::Bool) => t.is_numeric(),
        (WireTag::Char, t) | (t, WireTag::Char) => t.is_integer(),
        _ => false,
    }
}

/// Every supported (from, to) pair with `from != to`
pub fn coercion_pairs() -> Vec<(WireTag, WireTag)> {
    let mut pairs = Vec::new();
    for from in WireTag::ALL {
        for to in WireTag::ALL {
            if from != to && can_coerce(from, to) {
                pairs.push((from, to));
            }
        }
    }
    pairs
}

/// Convert `value` into the variant for `to`
///
/// Returns `None` when the pair is not in the table or the value cannot be
/// represented in the target type.
pub fn coerce(value: Value, to: WireTag) -> Option<Value> {
    let from = value.tag()?;
    if !can_coerce(from, to) {
        return None;
    }
    if from == to {
        return Some(value);
    }
    if to == WireTag::String {
        return display(&value).map(Value::String);
    }
    let n = Numeric::of(&value)?;
    n.into_value(to)
}

fn display(value: &Value) -> Option<String> {
    Some(match value {
        Value::Byte(v) => v.to_string(),
        Value::SByte(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Char(c) => c.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::UInt16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::UInt32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::UInt64(v) => v.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        _ => return None,
    })
}

/// Intermediate form wide enough for every numeric source
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
    Decimal(Decimal128),
}

macro_rules! to_int {
    ($n:expr, $ty:ty) => {
        match $n {
            Numeric::Int(i) => i as $ty,
            Numeric::Float(f) => f as $ty,
            Numeric::Decimal(d) => {
                let i = d.trunc_to_i128();
                if i < <$ty>::MIN as i128 {
                    <$ty>::MIN
                } else if i > <$ty>::MAX as i128 {
                    <$ty>::MAX
                } else {
                    i as $ty
                }
            }
        }
    };
}

impl Numeric {
    fn of(value: &Value) -> Option<Numeric> {
        Some(match value {
            Value::Byte(v) => Numeric::Int(i128::from(*v)),
            Value::SByte(v) => Numeric::Int(i128::from(*v)),
            Value::Bool(v) => Numeric::Int(i128::from(*v)),
            Value::Char(c) => Numeric::Int(i128::from(u32::from(*c))),
            Value::Int16(v) => Numeric::Int(i128::from(*v)),
            Value::UInt16(v) => Numeric::Int(i128::from(*v)),
            Value::Int32(v) => Numeric::Int(i128::from(*v)),
            Value::UInt32(v) => Numeric::Int(i128::from(*v)),
            Value::Int64(v) => Numeric::Int(i128::from(*v)),
            Value::UInt64(v) => Numeric::Int(i128::from(*v)),
            Value::Float32(v) => Numeric::Float(f64::from(*v)),
            Value::Float64(v) => Numeric::Float(*v),
            Value::Decimal(d) => Numeric::Decimal(*d),
            _ => return None,
        })
    }

    fn is_zero(&self) -> bool {
        match self {
            Numeric::Int(i) => *i == 0,
            Numeric::Float(f) => *f == 0.0,
            Numeric::Decimal(d) => d.is_zero(),
        }
    }

    fn into_value(self, to: WireTag) -> Option<Value> {
        Some(match to {
            WireTag::Byte => Value::Byte(to_int!(self, u8)),
            WireTag::SByte => Value::SByte(to_int!(self, i8)),
            WireTag::Int16 => Value::Int16(to_int!(self, i16)),
            WireTag::UInt16 => Value::UInt16(to_int!(self, u16)),
            WireTag::Int32 => Value::Int32(to_int!(self, i32)),
            WireTag::UInt32 => Value::UInt32(to_int!(self, u32)),
            WireTag::Int64 => Value::Int64(to_int!(self, i64)),
            WireTag::UInt64 => Value::UInt64(to_int!(self, u64)),
            WireTag::Float32 => Value::Float32(match self {
                Numeric::Int(i) => i as f32,
                Numeric::Float(f) => f as f32,
                Numeric::Decimal(d) => d.to_f64() as f32,
            }),
            WireTag::Float64 => Value::Float64(match self {
                Numeric::Int(i) => i as f64,
                Numeric::Float(f) => f,
                Numeric::Decimal(d) => d.to_f64(),
            }),
            WireTag::Decimal128 => Value::Decimal(match self {
                Numeric::Int(i) => Decimal128::from_parts(i < 0, i.unsigned_abs(), 0).ok()?,
                Numeric::Float(f) => Decimal128::from_f64(f)?,
                Numeric::Decimal(d) => d,
            }),
            WireTag::Bool => Value::Bool(!self.is_zero()),
            WireTag::Char => match self {
                Numeric::Int(i) => Value::Char(char::from(i as u8)),
                _ => return None,
            },
            WireTag::String | WireTag::DateTime | WireTag::Object => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticks::Ticks;

    #[test]
    fn test_int32_widens_to_int64() {
        assert_eq!(coerce(Value::Int32(-7), WireTag::Int64), Some(Value::Int64(-7)));
    }

    #[test]
    fn test_float64_truncates_to_int32() {
        assert_eq!(coerce(Value::Float64(12.9), WireTag::Int32), Some(Value::Int32(12)));
        assert_eq!(coerce(Value::Float64(-12.9), WireTag::Int32), Some(Value::Int32(-12)));
    }

    #[test]
    fn test_float_to_int_saturates() {
        assert_eq!(coerce(Value::Float64(1e20), WireTag::Int32), Some(Value::Int32(i32::MAX)));
        assert_eq!(coerce(Value::Float64(f64::NAN), WireTag::Int16), Some(Value::Int16(0)));
        assert_eq!(coerce(Value::Float32(-5.0), WireTag::Byte), Some(Value::Byte(0)));
    }

    #[test]
    fn test_int_narrowing_wraps() {
        assert_eq!(coerce(Value::Int32(300), WireTag::Byte), Some(Value::Byte(44)));
        assert_eq!(coerce(Value::Int64(-1), WireTag::UInt32), Some(Value::UInt32(u32::MAX)));
        assert_eq!(coerce(Value::UInt64(u64::MAX), WireTag::Int64), Some(Value::Int64(-1)));
    }

    #[test]
    fn test_decimal_conversions() {
        let d = Decimal128::from_parts(false, 12345, 2).unwrap(); // 123.45
        assert_eq!(coerce(Value::Decimal(d), WireTag::Int32), Some(Value::Int32(123)));
        assert_eq!(coerce(Value::Decimal(d), WireTag::Byte), Some(Value::Byte(123)));
        assert_eq!(coerce(Value::Decimal(d), WireTag::Float64), Some(Value::Float64(123.45)));
        assert_eq!(
            coerce(Value::Int32(5), WireTag::Decimal128),
            Some(Value::Decimal(Decimal128::from_i64(5)))
        );
        assert_eq!(coerce(Value::Float64(f64::NAN), WireTag::Decimal128), None);
    }

    #[test]
    fn test_decimal_to_int_saturates() {
        let big = Decimal128::from_parts(false, 30050, 2).unwrap(); // 300.50
        assert_eq!(coerce(Value::Decimal(big), WireTag::Byte), Some(Value::Byte(255)));
        assert_eq!(coerce(Value::Decimal(big), WireTag::SByte), Some(Value::SByte(i8::MAX)));

        let negative = Decimal128::from_parts(true, 30050, 2).unwrap(); // -300.50
        assert_eq!(coerce(Value::Decimal(negative), WireTag::Byte), Some(Value::Byte(0)));
        assert_eq!(coerce(Value::Decimal(negative), WireTag::Int16), Some(Value::Int16(-300)));

        let huge = Decimal128::from_parts(false, 1u128 << 70, 0).unwrap();
        assert_eq!(coerce(Value::Decimal(huge), WireTag::Int64), Some(Value::Int64(i64::MAX)));
    }

    #[test]
    fn test_bool_and_char() {
        assert_eq!(coerce(Value::Int32(2), WireTag::Bool), Some(Value::Bool(true)));
        assert_eq!(coerce(Value::Float64(0.0), WireTag::Bool), Some(Value::Bool(false)));
        assert_eq!(coerce(Value::Bool(true), WireTag::Int64), Some(Value::Int64(1)));
        assert_eq!(coerce(Value::Char('A'), WireTag::Int32), Some(Value::Int32(65)));
        assert_eq!(coerce(Value::Int32(66), WireTag::Char), Some(Value::Char('B')));
        assert!(!can_coerce(WireTag::Char, WireTag::Float64));
        assert!(!can_coerce(WireTag::Bool, WireTag::Char));
    }

    #[test]
    fn test_to_string() {
        assert_eq!(coerce(Value::Int32(12), WireTag::String), Some(Value::String("12".into())));
        assert_eq!(coerce(Value::Float32(12.0), WireTag::String), Some(Value::String("12".into())));
        assert_eq!(coerce(Value::Bool(true), WireTag::String), Some(Value::String("true".into())));
    }

    #[test]
    fn test_unsupported_pairs() {
        assert_eq!(coerce(Value::String("12".into()), WireTag::Int32), None);
        assert_eq!(coerce(Value::DateTime(Ticks::EPOCH), WireTag::Int64), None);
        assert_eq!(coerce(Value::Int64(0), WireTag::DateTime), None);
        assert_eq!(coerce(Value::Object(None), WireTag::Object), None);
        assert_eq!(coerce(Value::Sequence(vec![]), WireTag::Int32), None);
    }

    #[test]
    fn test_identity_for_every_primitive() {
        for tag in WireTag::ALL.iter().copied().filter(WireTag::is_primitive) {
            assert!(can_coerce(tag, tag));
            let v = Value::default_for(tag);
            assert_eq!(coerce(v.clone(), tag), Some(v));
        }
    }

    #[test]
    fn test_pairs_table_is_closed() {
        let pairs = coercion_pairs();
        assert!(pairs.contains(&(WireTag::Int32, WireTag::Int64)));
        assert!(pairs.contains(&(WireTag::Float64, WireTag::Int32)));
        assert!(!pairs.iter().any(|(f, t)| *f == WireTag::DateTime || *t == WireTag::DateTime));
        for (from, to) in pairs {
            assert!(coerce(Value::default_for(from), to).is_some(), "{:?} -> {:?}", from, to);
        }
    }
}
