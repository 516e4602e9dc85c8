//! Schema descriptors and snapshots
//!
//! A `SchemaSnapshot` records, for one schema version, the shape of every
//! versioned class: its fields in wire order, each with a declared type
//! name, wire tag, and collection shape. Snapshots are written once per
//! released version and never rewritten; migration correctness depends on
//! recorded history staying exactly as it was.

use crate::error::{Error, Result};
use crate::types::{Shape, WireTag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One field of a versioned class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name, unique within its class
    pub name: String,
    /// Declared type name (e.g. `i32`, `Vec<String>`, `app::Address`)
    pub declared_type_name: String,
    /// Wire tag of the value (of each element, for sequences)
    #[serde(rename = "wireTag")]
    pub tag: WireTag,
    /// Scalar, List or Array
    #[serde(default)]
    pub shape: Shape,
    /// Nested class when `tag` is `Object`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_class_name: Option<String>,
}

impl FieldDescriptor {
    /// Scalar primitive field
    pub fn scalar(name: impl Into<String>, declared_type_name: impl Into<String>, tag: WireTag) -> Self {
        FieldDescriptor {
            name: name.into(),
            declared_type_name: declared_type_name.into(),
            tag,
            shape: Shape::Scalar,
            element_class_name: None,
        }
    }

    /// Scalar nested-object field; the declared type is the class name
    pub fn object(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        FieldDescriptor {
            name: name.into(),
            declared_type_name: class_name.clone(),
            tag: WireTag::Object,
            shape: Shape::Scalar,
            element_class_name: Some(class_name),
        }
    }

    /// Sequence of primitives
    pub fn sequence(
        name: impl Into<String>,
        declared_type_name: impl Into<String>,
        shape: Shape,
        tag: WireTag,
    ) -> Self {
        FieldDescriptor {
            name: name.into(),
            declared_type_name: declared_type_name.into(),
            tag,
            shape,
            element_class_name: None,
        }
    }

    /// Sequence of nested objects
    pub fn object_sequence(
        name: impl Into<String>,
        declared_type_name: impl Into<String>,
        shape: Shape,
        class_name: impl Into<String>,
    ) -> Self {
        FieldDescriptor {
            name: name.into(),
            declared_type_name: declared_type_name.into(),
            tag: WireTag::Object,
            shape,
            element_class_name: Some(class_name.into()),
        }
    }

    /// Scalar field with a primitive tag
    pub fn is_scalar_primitive(&self) -> bool {
        self.shape == Shape::Scalar && self.tag.is_primitive()
    }

    /// Nested class name, required for Object-tagged fields
    pub fn nested_class(&self) -> Result<&str> {
        self.element_class_name.as_deref().ok_or_else(|| {
            Error::InvalidSchema(format!(
                "object field '{}' has no element class name",
                self.name
            ))
        })
    }

    /// Same name, same declared type, same shape
    pub fn matches_exactly(&self, other: &FieldDescriptor) -> bool {
        self.name == other.name
            && self.declared_type_name == other.declared_type_name
            && self.shape == other.shape
    }
}

/// Field layout of one versioned class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDescriptor {
    /// Fully qualified name, unique within a snapshot
    pub qualified_name: String,
    /// Short name for display
    pub simple_name: String,
    /// Fields in wire order
    pub fields: Vec<FieldDescriptor>,
}

impl ClassDescriptor {
    /// Create a class with no fields; the simple name is the last `::` segment
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&qualified_name)
            .to_string();
        ClassDescriptor {
            qualified_name,
            simple_name,
            fields: Vec::new(),
        }
    }

    /// Append a field (builder pattern)
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the classes this class's Object fields point at, in field order
    pub fn nested_class_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.tag == WireTag::Object)
            .filter_map(|f| f.element_class_name.as_deref())
    }

    /// Check field-name uniqueness and Object fields' class names
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate field '{}' in class '{}'",
                    field.name, self.qualified_name
                )));
            }
            if field.tag == WireTag::Object {
                field.nested_class()?;
            }
        }
        Ok(())
    }
}

/// Every versioned class as of one schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    /// Version this snapshot records
    pub schema_version: u16,
    /// Classes, unique by qualified name
    pub classes: Vec<ClassDescriptor>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot
    pub fn new(schema_version: u16) -> Self {
        SchemaSnapshot {
            schema_version,
            classes: Vec::new(),
        }
    }

    /// Look up a class by qualified name
    pub fn class(&self, qualified_name: &str) -> Option<&ClassDescriptor> {
        self.classes
            .iter()
            .find(|c| c.qualified_name == qualified_name)
    }

    /// True if a class with this qualified name is recorded
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.class(qualified_name).is_some()
    }

    /// Add a class unless one with the same name is present; returns
    /// whether it was added
    pub fn insert_class(&mut self, class: ClassDescriptor) -> bool {
        if self.contains(&class.qualified_name) {
            return false;
        }
        self.classes.push(class);
        true
    }

    /// Check every class, class-name uniqueness, and that every nested
    /// class reference resolves inside the snapshot
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.qualified_name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate class '{}' in snapshot v{}",
                    class.qualified_name, self.schema_version
                )));
            }
            class.validate()?;
        }
        for class in &self.classes {
            for nested in class.nested_class_names() {
                if !seen.contains(nested) {
                    return Err(Error::InvalidSchema(format!(
                        "class '{}' references unrecorded class '{}'",
                        class.qualified_name, nested
                    )));
                }
            }
        }
        Ok(())
    }
}
