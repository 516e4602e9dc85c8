//! Same-version decoder
//!
//! Inverse of the encoder: reads fields strictly in declared order from one
//! cursor. Used when a payload's version equals the current version.

use verscodec_core::codec::decode_primitive;
use verscodec_core::{
    ByteCursor, ClassDescriptor, Depth, Error, FieldDescriptor, Record, Result, SchemaProvider,
    Value, WireTag,
};

/// Decode `class`'s fields from `cursor` into `record`
///
/// Sequences are replaced outright. A present nested object is decoded
/// into the record's existing nested record when it has the right class,
/// otherwise into a fresh one.
pub fn decode_into<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    class: &ClassDescriptor,
    provider: &P,
    record: &mut Record,
) -> Result<()> {
    decode_at(cursor, class, provider, record, Depth::default())
}

/// Like [`decode_into`], allowing at most `max_depth` levels of nested
/// objects; deeper payloads are corruption
pub fn decode_into_bounded<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    class: &ClassDescriptor,
    provider: &P,
    record: &mut Record,
    max_depth: usize,
) -> Result<()> {
    decode_at(cursor, class, provider, record, Depth::root(max_depth))
}

fn decode_at<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    class: &ClassDescriptor,
    provider: &P,
    record: &mut Record,
    depth: Depth,
) -> Result<()> {
    if record.class_name() != class.qualified_name {
        return Err(Error::type_mismatch(
            class.qualified_name.as_str(),
            record.class_name(),
        ));
    }
    for field in &class.fields {
        let value = if field.shape.is_sequence() {
            decode_sequence(cursor, field, provider, depth)?
        } else if field.tag == WireTag::Object {
            let existing = match record.remove(&field.name) {
                Some(Value::Object(Some(nested))) => Some(nested),
                _ => None,
            };
            decode_object(cursor, field, provider, existing, depth)?
        } else {
            decode_primitive(cursor, field.tag)?
        };
        record.set(field.name.as_str(), value);
    }
    Ok(())
}

fn decode_sequence<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    field: &FieldDescriptor,
    provider: &P,
    depth: Depth,
) -> Result<Value> {
    let count = cursor.read_length()?;
    // Every element takes at least one byte
    let mut items = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        let item = if field.tag == WireTag::Object {
            decode_object(cursor, field, provider, None, depth)?
        } else {
            decode_primitive(cursor, field.tag)?
        };
        items.push(item);
    }
    Ok(Value::Sequence(items))
}

fn decode_object<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    field: &FieldDescriptor,
    provider: &P,
    existing: Option<Record>,
    depth: Depth,
) -> Result<Value> {
    if cursor.read_u8()? == 0 {
        return Ok(Value::Object(None));
    }
    let depth = depth.descend_decoding()?;
    let class = provider.require_class(field.nested_class()?)?;
    let mut nested = existing
        .filter(|r| r.class_name() == class.qualified_name)
        .unwrap_or_else(|| Record::fresh(class));
    decode_at(cursor, class, provider, &mut nested, depth)?;
    Ok(Value::Object(Some(nested)))
}
