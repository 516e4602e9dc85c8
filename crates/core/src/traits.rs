//! Core traits for schema access and typed objects
//!
//! - `SchemaProvider`: where class descriptors come from. The codec never
//!   introspects types; it asks a provider.
//! - `Versioned`: a Rust type that describes its own class and converts to
//!   and from a `Record`.
//! - `FromValue`: typed extraction of a single field value.

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{ClassDescriptor, SchemaSnapshot};
use crate::decimal::Decimal128;
use crate::ticks::Ticks;
use crate::value::Value;

/// Source of class descriptors
///
/// Implementations must be immutable while the codec uses them; the codec
/// holds a shared reference for the duration of a call.
pub trait SchemaProvider {
    /// Look up a class by qualified name
    fn class(&self, qualified_name: &str) -> Option<&ClassDescriptor>;

    /// Entry-point classes, in a stable order
    fn root_classes(&self) -> Vec<&ClassDescriptor>;

    /// Look up a class, failing with `UnknownClass`
    fn require_class(&self, qualified_name: &str) -> Result<&ClassDescriptor> {
        self.class(qualified_name)
            .ok_or_else(|| Error::UnknownClass(qualified_name.to_string()))
    }
}

impl SchemaProvider for SchemaSnapshot {
    fn class(&self, qualified_name: &str) -> Option<&ClassDescriptor> {
        SchemaSnapshot::class(self, qualified_name)
    }

    fn root_classes(&self) -> Vec<&ClassDescriptor> {
        self.classes.iter().collect()
    }
}

/// A Rust type participating in versioned encoding
///
/// # Example
///
/// ```
/// use verscodec_core::{ClassDescriptor, FieldDescriptor, Record, Result, Versioned, WireTag};
///
/// struct Point { x: i32, y: i32 }
///
/// impl Versioned for Point {
///     fn class_descriptor() -> ClassDescriptor {
///         ClassDescriptor::new("geo::Point")
///             .with_field(FieldDescriptor::scalar("x", "i32", WireTag::Int32))
///             .with_field(FieldDescriptor::scalar("y", "i32", WireTag::Int32))
///     }
///
///     fn to_record(&self) -> Record {
///         Record::new("geo::Point").with("x", self.x).with("y", self.y)
///     }
///
///     fn from_record(record: &Record) -> Result<Self> {
///         Ok(Point { x: record.require("x")?, y: record.require("y")? })
///     }
/// }
///
/// let p = Point::from_record(&Point { x: 1, y: 2 }.to_record()).unwrap();
/// assert_eq!((p.x, p.y), (1, 2));
/// ```
pub trait Versioned: Sized {
    /// Descriptor of this type's class
    fn class_descriptor() -> ClassDescriptor;

    /// Descriptors of classes reachable from this one
    fn nested_descriptors() -> Vec<ClassDescriptor> {
        Vec::new()
    }

    /// Convert to a record
    fn to_record(&self) -> Record;

    /// Rebuild from a record
    fn from_record(record: &Record) -> Result<Self>;
}

/// Typed extraction of one field value
pub trait FromValue: Sized {
    /// Convert, failing with `TypeMismatch` on the wrong variant
    fn from_value(value: &Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(Error::type_mismatch(stringify!($variant), other.type_name())),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
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

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Sequence(items) => items.iter().map(T::from_value).collect(),
            other => Err(Error::type_mismatch("Sequence", other.type_name())),
        }
    }
}

impl<T: Versioned> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(None) => Ok(None),
            Value::Object(Some(record)) => T::from_record(record).map(Some),
            other => Err(Error::type_mismatch("Object", other.type_name())),
        }
    }
}

impl Record {
    /// Extract a typed field value; a missing field is a type mismatch
    pub fn require<T: FromValue>(&self, name: &str) -> Result<T> {
        match self.get(name) {
            Some(value) => T::from_value(value),
            None => Err(Error::type_mismatch(
                format!("field '{}' of {}", name, self.class_name()),
                "missing",
            )),
        }
    }
}
