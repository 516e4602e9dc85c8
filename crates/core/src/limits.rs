//! Nesting limits for encoding and decoding
//!
//! Object fields nest by recursion, and a class may reference itself, so
//! the depth of a payload is bounded only by its bytes. Every recursive
//! walk carries a [`Depth`] and stops at its maximum instead of running
//! out of stack.

use crate::error::{Error, Result};

/// Maximum object nesting depth (default: 128)
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Nesting level of the object currently being walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    level: usize,
    max: usize,
}

impl Depth {
    /// Top-level object, allowing `max` nested levels below it
    pub fn root(max: usize) -> Self {
        Depth { level: 0, max }
    }

    /// Current level; the root object is level 0
    pub fn level(&self) -> usize {
        self.level
    }

    /// Deepest level allowed
    pub fn max(&self) -> usize {
        self.max
    }

    /// One level further in, or `None` past the maximum
    pub fn descend(self) -> Option<Depth> {
        (self.level < self.max).then(|| Depth {
            level: self.level + 1,
            max: self.max,
        })
    }

    /// Descend while reading bytes; too deep is corruption
    pub fn descend_decoding(self) -> Result<Depth> {
        self.descend().ok_or_else(|| {
            Error::Corruption(format!(
                "object nesting exceeds maximum depth {}",
                self.max
            ))
        })
    }

    /// Descend while writing a record; too deep is out of range
    pub fn descend_encoding(self) -> Result<Depth> {
        self.descend().ok_or_else(|| {
            Error::ValueOutOfRange(format!(
                "object nesting exceeds maximum depth {}",
                self.max
            ))
        })
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::root(DEFAULT_MAX_DEPTH)
    }
}
