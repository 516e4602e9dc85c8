//! Object encoder
//!
//! Writes a record's fields in the class's declared order. No field names,
//! tags, or per-field lengths go on the wire: the layout is fully implied
//! by the class descriptor, which is why old payloads need the historical
//! descriptor to be read back.
//!
//! - Scalar primitive: primitive codec
//! - Scalar object: presence byte, then the nested class's fields
//! - Sequence: `i32` count, then each element as a scalar of the element tag
//!
//! Fields missing from the record are written as their default value.

use verscodec_core::codec::{encode_length, encode_primitive};
use verscodec_core::{
    ClassDescriptor, Depth, Error, FieldDescriptor, Record, Result, SchemaProvider, Value, WireTag,
};

/// Encode `record` against `class`
pub fn encode_record<P: SchemaProvider + ?Sized>(
    record: &Record,
    class: &ClassDescriptor,
    provider: &P,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(record, class, provider, &mut out)?;
    Ok(out)
}

/// Encode `record` allowing at most `max_depth` levels of nested objects
pub fn encode_record_bounded<P: SchemaProvider + ?Sized>(
    record: &Record,
    class: &ClassDescriptor,
    provider: &P,
    max_depth: usize,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_at(record, class, provider, Depth::root(max_depth), &mut out)?;
    Ok(out)
}

/// Append the encoding of `record` to `out`
pub fn encode_into<P: SchemaProvider + ?Sized>(
    record: &Record,
    class: &ClassDescriptor,
    provider: &P,
    out: &mut Vec<u8>,
) -> Result<()> {
    encode_at(record, class, provider, Depth::default(), out)
}

fn encode_at<P: SchemaProvider + ?Sized>(
    record: &Record,
    class: &ClassDescriptor,
    provider: &P,
    depth: Depth,
    out: &mut Vec<u8>,
) -> Result<()> {
    if record.class_name() != class.qualified_name {
        return Err(Error::type_mismatch(
            class.qualified_name.as_str(),
            record.class_name(),
        ));
    }
    for field in &class.fields {
        encode_field(record.get(&field.name), field, provider, depth, out)?;
    }
    Ok(())
}

fn encode_field<P: SchemaProvider + ?Sized>(
    value: Option<&Value>,
    field: &FieldDescriptor,
    provider: &P,
    depth: Depth,
    out: &mut Vec<u8>,
) -> Result<()> {
    if field.shape.is_sequence() {
        let items: &[Value] = match value {
            None => &[],
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                return Err(Error::type_mismatch(
                    format!("Sequence for field '{}'", field.name),
                    other.type_name(),
                ))
            }
        };
        encode_length(items.len(), out)?;
        for item in items {
            encode_element(item, field, provider, depth, out)?;
        }
        return Ok(());
    }

    match value {
        Some(value) => encode_element(value, field, provider, depth, out),
        None if field.tag == WireTag::Object => {
            out.push(0);
            Ok(())
        }
        None => encode_primitive(&Value::default_for(field.tag), field.tag, out),
    }
}

/// One scalar value, or one element of a sequence
fn encode_element<P: SchemaProvider + ?Sized>(
    value: &Value,
    field: &FieldDescriptor,
    provider: &P,
    depth: Depth,
    out: &mut Vec<u8>,
) -> Result<()> {
    if field.tag != WireTag::Object {
        return encode_primitive(value, field.tag, out);
    }
    match value {
        Value::Object(None) => {
            out.push(0);
            Ok(())
        }
        Value::Object(Some(nested)) => {
            let depth = depth.descend_encoding()?;
            let class = provider.require_class(field.nested_class()?)?;
            out.push(1);
            encode_at(nested, class, provider, depth, out)
        }
        other => Err(Error::type_mismatch(
            format!("Object for field '{}'", field.name),
            other.type_name(),
        )),
    }
}
