//! Schema registry and snapshot extraction
//!
//! Versioned classes are registered explicitly; nothing is discovered at
//! runtime. Classes registered as roots are the entry points a snapshot is
//! extracted from.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut registry = SchemaRegistry::new();
//! registry.register_type::<Player>()?;   // root + its nested classes
//! registry.register(inventory_class)?;   // plain class, not a root
//!
//! let snapshot = extract_snapshot(&registry, 3)?;
//! ```

use std::collections::HashMap;
use verscodec_core::{
    ClassDescriptor, Error, Result, SchemaProvider, SchemaSnapshot, Versioned,
};

/// Registry of the current version's class descriptors
///
/// Built once at startup and shared by reference afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Classes in registration order
    classes: Vec<ClassDescriptor>,
    /// Qualified name -> index into `classes`
    index: HashMap<String, usize>,
    /// Root class names in registration order
    roots: Vec<String>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class
    ///
    /// Registering an identical descriptor twice is a no-op; registering a
    /// different descriptor under a known name is `InvalidSchema`.
    pub fn register(&mut self, class: ClassDescriptor) -> Result<()> {
        class.validate()?;
        if let Some(&i) = self.index.get(&class.qualified_name) {
            if self.classes[i] == class {
                return Ok(());
            }
            return Err(Error::InvalidSchema(format!(
                "class '{}' registered twice with different fields",
                class.qualified_name
            )));
        }
        self.index
            .insert(class.qualified_name.clone(), self.classes.len());
        self.classes.push(class);
        Ok(())
    }

    /// Register a class and mark it as a root
    pub fn register_root(&mut self, class: ClassDescriptor) -> Result<()> {
        let name = class.qualified_name.clone();
        self.register(class)?;
        self.mark_root(&name)
    }

    /// Mark an already registered class as a root
    pub fn mark_root(&mut self, qualified_name: &str) -> Result<()> {
        if !self.index.contains_key(qualified_name) {
            return Err(Error::UnknownClass(qualified_name.to_string()));
        }
        if !self.roots.iter().any(|r| r == qualified_name) {
            self.roots.push(qualified_name.to_string());
        }
        Ok(())
    }

    /// Register a `Versioned` type as a root along with its nested classes
    pub fn register_type<T: Versioned>(&mut self) -> Result<()> {
        self.register_root(T::class_descriptor())?;
        for nested in T::nested_descriptors() {
            self.register(nested)?;
        }
        Ok(())
    }

    /// Builder form of `register_type`
    pub fn with_type<T: Versioned>(mut self) -> Result<Self> {
        self.register_type::<T>()?;
        Ok(self)
    }

    /// Get a class by qualified name
    pub fn get(&self, qualified_name: &str) -> Option<&ClassDescriptor> {
        self.index.get(qualified_name).map(|&i| &self.classes[i])
    }

    /// Check if a class is registered
    pub fn is_registered(&self, qualified_name: &str) -> bool {
        self.index.contains_key(qualified_name)
    }

    /// All classes in registration order
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    /// Root class names in registration order
    pub fn root_names(&self) -> &[String] {
        &self.roots
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check that every nested class reference resolves
    pub fn validate(&self) -> Result<()> {
        for class in &self.classes {
            for nested in class.nested_class_names() {
                if !self.is_registered(nested) {
                    return Err(Error::InvalidSchema(format!(
                        "class '{}' references unregistered class '{}'",
                        class.qualified_name, nested
                    )));
                }
            }
        }
        Ok(())
    }
}

impl SchemaProvider for SchemaRegistry {
    fn class(&self, qualified_name: &str) -> Option<&ClassDescriptor> {
        self.get(qualified_name)
    }

    fn root_classes(&self) -> Vec<&ClassDescriptor> {
        self.roots.iter().filter_map(|r| self.get(r)).collect()
    }
}

/// Build the snapshot of every class reachable from the provider's roots
///
/// Roots are visited in order, each followed by its nested classes depth
/// first. The first descriptor seen for a name wins.
pub fn extract_snapshot<P: SchemaProvider + ?Sized>(
    provider: &P,
    version: u16,
) -> Result<SchemaSnapshot> {
    let mut snapshot = SchemaSnapshot::new(version);
    for root in provider.root_classes() {
        collect_class(provider, root, &mut snapshot)?;
    }
    Ok(snapshot)
}

fn collect_class<P: SchemaProvider + ?Sized>(
    provider: &P,
    class: &ClassDescriptor,
    snapshot: &mut SchemaSnapshot,
) -> Result<()> {
    if !snapshot.insert_class(class.clone()) {
        return Ok(());
    }
    for nested in class.nested_class_names() {
        let nested = provider.require_class(nested)?;
        collect_class(provider, nested, snapshot)?;
    }
    Ok(())
}
