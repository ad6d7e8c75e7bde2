//! Half-open ranges of curve indices.

use std::fmt;

use crate::error::{Error, Result};

/// Half-open range `[min, max)` of cell ids owned by one cell group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Inclusive lower bound.
    pub min: u64,
    /// Exclusive upper bound.
    pub max: u64,
}

impl Range {
    /// Create a range, failing if `min > max`.
    pub fn new(min: u64, max: u64) -> Result<Self> {
        if min > max {
            return Err(Error::Range { min, max });
        }
        Ok(Self { min, max })
    }

    /// Number of indices in the range.
    pub fn len(&self) -> u64 {
        self.max - self.min
    }

    /// True when the range holds no indices.
    pub fn is_empty(&self) -> bool {
        self.min == self.max
    }

    /// `min <= index < max`
    pub fn fits(&self, index: u64) -> bool {
        index >= self.min && index < self.max
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}
