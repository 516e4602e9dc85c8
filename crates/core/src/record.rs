//! Dynamic object instances
//!
//! A `Record` is the in-memory form of one versioned object: the class it
//! belongs to and a value per field. Encoding walks a `ClassDescriptor` and
//! pulls values out of the record by name, so field order inside the record
//! does not matter.

use crate::schema::ClassDescriptor;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One object instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    class_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record of a class
    pub fn new(class_name: impl Into<String>) -> Self {
        Record {
            class_name: class_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a record holding the default value of every field in `class`
    ///
    /// Scalars get their tag's zero value, sequences are empty, and nested
    /// objects are absent.
    pub fn fresh(class: &ClassDescriptor) -> Self {
        let fields = class
            .fields
            .iter()
            .map(|f| {
                let value = if f.shape.is_sequence() {
                    Value::Sequence(Vec::new())
                } else {
                    Value::default_for(f.tag)
                };
                (f.name.clone(), value)
            })
            .collect();
        Record {
            class_name: class.qualified_name.clone(),
            fields,
        }
    }

    /// Qualified name of the record's class
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a mutable field value
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Set a field value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Set a field value (builder pattern)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Remove a field value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Iterate fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no field is populated
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
