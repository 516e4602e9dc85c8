//! Cross-version migration decoder
//!
//! Reads a payload written under a historical snapshot into a record of the
//! current schema. The historical descriptor drives the cursor: every
//! historical field is either decoded into the matching current field,
//! decoded and converted through the coercion table, or skipped by its
//! historical width. Whatever path is taken, exactly the bytes the old
//! encoder wrote are consumed.
//!
//! Fields that cannot be carried over are not errors. They are collected
//! in a [`MigrationReport`] and logged at debug level.

use serde::Serialize;
use tracing::{debug, warn};
use verscodec_core::codec::{can_coerce, coerce, decode_primitive, skip_primitive};
use verscodec_core::{
    ByteCursor, ClassDescriptor, Depth, Error, FieldDescriptor, Record, Result, SchemaProvider,
    SchemaSnapshot, Value, WireTag,
};

/// Why a historical field was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The current class has no field of that name
    Removed,
    /// The field changed between scalar, sequence and object forms, or its
    /// declared type changed in a way no conversion covers
    ShapeChanged,
    /// Both sides are primitives but the value could not be converted
    NotConvertible {
        /// Historical tag
        from: WireTag,
        /// Current tag
        to: WireTag,
    },
}

/// A historical field whose value was consumed and dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    /// Current class the field belonged to
    pub class: String,
    /// Field name
    pub field: String,
    /// Why the value was dropped
    pub reason: SkipReason,
}

/// A field whose value was converted to a different primitive type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercedField {
    /// Current class the field belongs to
    pub class: String,
    /// Field name
    pub field: String,
    /// Historical tag
    pub from: WireTag,
    /// Current tag
    pub to: WireTag,
}

/// Everything a decode had to drop or convert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Version the payload was written under
    pub source_version: u16,
    /// Version it was decoded into
    pub target_version: u16,
    /// Dropped fields, in wire order
    pub skipped: Vec<SkippedField>,
    /// Converted fields, in wire order
    pub coerced: Vec<CoercedField>,
    /// Current classes the historical snapshot does not record
    pub missing_classes: Vec<String>,
}

impl MigrationReport {
    /// Empty report for a decode from `source_version` into `target_version`
    pub fn new(source_version: u16, target_version: u16) -> Self {
        MigrationReport {
            source_version,
            target_version,
            ..Default::default()
        }
    }

    /// True if the payload needed migration at all
    pub fn is_migration(&self) -> bool {
        self.source_version != self.target_version
    }

    /// True if no value was dropped
    pub fn is_lossless(&self) -> bool {
        self.skipped.is_empty() && self.missing_classes.is_empty()
    }

    /// Skipped entry for `class.field`, if any
    pub fn skipped_field(&self, class: &str, field: &str) -> Option<&SkippedField> {
        self.skipped
            .iter()
            .find(|s| s.class == class && s.field == field)
    }
}

/// Decode a historical payload for `current_class` into `record`
///
/// If the historical snapshot does not record `current_class` at all, the
/// payload cannot be interpreted: it is consumed without effect and the
/// class is listed in the report's `missing_classes`.
pub fn migrate_into<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    history: &SchemaSnapshot,
    current_class: &ClassDescriptor,
    current: &P,
    record: &mut Record,
    report: &mut MigrationReport,
) -> Result<()> {
    migrate_at(cursor, history, current_class, current, record, report, Depth::default())
}

/// Like [`migrate_into`], allowing at most `max_depth` levels of nested
/// objects in the historical payload; deeper payloads are corruption
pub fn migrate_into_bounded<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    history: &SchemaSnapshot,
    current_class: &ClassDescriptor,
    current: &P,
    record: &mut Record,
    report: &mut MigrationReport,
    max_depth: usize,
) -> Result<()> {
    let depth = Depth::root(max_depth);
    migrate_at(cursor, history, current_class, current, record, report, depth)
}

fn migrate_at<P: SchemaProvider + ?Sized>(
    cursor: &mut ByteCursor<'_>,
    history: &SchemaSnapshot,
    current_class: &ClassDescriptor,
    current: &P,
    record: &mut Record,
    report: &mut MigrationReport,
    depth: Depth,
) -> Result<()> {
    if record.class_name() != current_class.qualified_name {
        return Err(Error::type_mismatch(
            current_class.qualified_name.as_str(),
            record.class_name(),
        ));
    }
    let Some(historical) = history.class(&current_class.qualified_name) else {
        warn!(
            class = %current_class.qualified_name,
            version = history.schema_version,
            "Class not recorded in historical snapshot, payload ignored"
        );
        report
            .missing_classes
            .push(current_class.qualified_name.clone());
        cursor.skip(cursor.remaining())?;
        return Ok(());
    };

    let mut migrator = Migrator {
        history,
        current,
        report,
    };
    migrator.migrate_class(cursor, historical, current_class, record, depth)
}

struct Migrator<'a, P: ?Sized> {
    history: &'a SchemaSnapshot,
    current: &'a P,
    report: &'a mut MigrationReport,
}

impl<'a, P: SchemaProvider + ?Sized> Migrator<'a, P> {
    fn migrate_class(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        historical: &ClassDescriptor,
        current: &ClassDescriptor,
        record: &mut Record,
        depth: Depth,
    ) -> Result<()> {
        for old in &historical.fields {
            match current.field(&old.name) {
                Some(new) if old.matches_exactly(new) => {
                    self.read_matching(cursor, old, new, current, record, depth)?
                }
                Some(new)
                    if old.is_scalar_primitive()
                        && new.is_scalar_primitive()
                        && can_coerce(old.tag, new.tag) =>
                {
                    self.read_coerced(cursor, old, new, current, record)?
                }
                Some(new) => {
                    self.skip_field(cursor, old, depth)?;
                    let reason = if old.is_scalar_primitive() && new.is_scalar_primitive() {
                        SkipReason::NotConvertible {
                            from: old.tag,
                            to: new.tag,
                        }
                    } else {
                        SkipReason::ShapeChanged
                    };
                    self.skipped(current, old, reason);
                }
                None => {
                    self.skip_field(cursor, old, depth)?;
                    self.skipped(current, old, SkipReason::Removed);
                }
            }
        }
        Ok(())
    }

    /// Same name, declared type and shape
    fn read_matching(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        old: &FieldDescriptor,
        new: &FieldDescriptor,
        class: &ClassDescriptor,
        record: &mut Record,
        depth: Depth,
    ) -> Result<()> {
        let old_is_object = old.tag == WireTag::Object;
        if old_is_object != (new.tag == WireTag::Object) {
            self.skip_field(cursor, old, depth)?;
            self.skipped(class, old, SkipReason::ShapeChanged);
            return Ok(());
        }

        if old_is_object {
            let value = if old.shape.is_sequence() {
                let count = cursor.read_length()?;
                let mut items = Vec::with_capacity(count.min(cursor.remaining()));
                for _ in 0..count {
                    items.push(self.read_object(cursor, old, new, None, depth)?);
                }
                Value::Sequence(items)
            } else {
                let existing = match record.remove(&new.name) {
                    Some(Value::Object(Some(nested))) => Some(nested),
                    _ => None,
                };
                self.read_object(cursor, old, new, existing, depth)?
            };
            record.set(new.name.as_str(), value);
            return Ok(());
        }

        // Equal declared types normally imply equal tags; hand-built
        // descriptors can disagree, in which case values are converted.
        let convert = |v: Value| {
            if old.tag == new.tag {
                Some(v)
            } else {
                coerce(v, new.tag)
            }
        };
        let value = if old.shape.is_sequence() {
            let count = cursor.read_length()?;
            let mut items = Vec::with_capacity(count.min(cursor.remaining()));
            for _ in 0..count {
                items.push(decode_primitive(cursor, old.tag)?);
            }
            items
                .into_iter()
                .map(convert)
                .collect::<Option<Vec<_>>>()
                .map(Value::Sequence)
        } else {
            convert(decode_primitive(cursor, old.tag)?)
        };
        self.store_converted(value, old, new, class, record);
        Ok(())
    }

    /// Scalar primitives of different tags covered by the coercion table
    fn read_coerced(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        old: &FieldDescriptor,
        new: &FieldDescriptor,
        class: &ClassDescriptor,
        record: &mut Record,
    ) -> Result<()> {
        let value = coerce(decode_primitive(cursor, old.tag)?, new.tag);
        self.store_converted(value, old, new, class, record);
        Ok(())
    }

    fn store_converted(
        &mut self,
        value: Option<Value>,
        old: &FieldDescriptor,
        new: &FieldDescriptor,
        class: &ClassDescriptor,
        record: &mut Record,
    ) {
        match value {
            Some(value) => {
                record.set(new.name.as_str(), value);
                if old.tag != new.tag {
                    self.report.coerced.push(CoercedField {
                        class: class.qualified_name.clone(),
                        field: new.name.clone(),
                        from: old.tag,
                        to: new.tag,
                    });
                }
            }
            None => self.skipped(
                class,
                old,
                SkipReason::NotConvertible {
                    from: old.tag,
                    to: new.tag,
                },
            ),
        }
    }

    /// One nested object written under `old`'s class, read into `new`'s
    fn read_object(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        old: &FieldDescriptor,
        new: &FieldDescriptor,
        existing: Option<Record>,
        depth: Depth,
    ) -> Result<Value> {
        if cursor.read_u8()? == 0 {
            return Ok(Value::Object(None));
        }
        let depth = depth.descend_decoding()?;
        let historical = self.historical_class(old)?;
        let provider: &'a P = self.current;
        let current = provider.require_class(new.nested_class()?)?;
        let mut nested = existing
            .filter(|r| r.class_name() == current.qualified_name)
            .unwrap_or_else(|| Record::fresh(current));
        self.migrate_class(cursor, historical, current, &mut nested, depth)?;
        Ok(Value::Object(Some(nested)))
    }

    fn historical_class(&self, field: &FieldDescriptor) -> Result<&'a ClassDescriptor> {
        let history: &'a SchemaSnapshot = self.history;
        let name = field.nested_class()?;
        history.class(name).ok_or_else(|| {
            Error::Corruption(format!(
                "snapshot v{} has no class '{}' for field '{}'",
                history.schema_version, name, field.name
            ))
        })
    }

    /// Consume exactly the bytes the historical encoder wrote for `field`
    fn skip_field(
        &self,
        cursor: &mut ByteCursor<'_>,
        field: &FieldDescriptor,
        depth: Depth,
    ) -> Result<()> {
        if field.shape.is_sequence() {
            let count = cursor.read_length()?;
            for _ in 0..count {
                self.skip_element(cursor, field, depth)?;
            }
            Ok(())
        } else {
            self.skip_element(cursor, field, depth)
        }
    }

    fn skip_element(
        &self,
        cursor: &mut ByteCursor<'_>,
        field: &FieldDescriptor,
        depth: Depth,
    ) -> Result<()> {
        if field.tag != WireTag::Object {
            return skip_primitive(cursor, field.tag);
        }
        if cursor.read_u8()? == 0 {
            return Ok(());
        }
        let depth = depth.descend_decoding()?;
        let nested = self.historical_class(field)?;
        for f in &nested.fields {
            self.skip_field(cursor, f, depth)?;
        }
        Ok(())
    }

    fn skipped(&mut self, class: &ClassDescriptor, field: &FieldDescriptor, reason: SkipReason) {
        debug!(
            class = %class.qualified_name,
            field = %field.name,
            reason = ?reason,
            "Skipped historical field"
        );
        self.report.skipped.push(SkippedField {
            class: class.qualified_name.clone(),
            field: field.name.clone(),
            reason,
        });
    }
}
