//! Capabilities the balancer consumes from its callers.

use std::fmt::Debug;

use crate::error::Result;

/// A storage or processing node in the cluster.
///
/// The balancer only reads these values; it never mutates or persists a
/// node.
pub trait Node: Debug + Send + Sync {
    /// Unique node identifier.
    fn id(&self) -> &str;

    /// Relative weight used to size the node's share of the curve.
    fn power(&self) -> f64;

    /// Maximum cumulative load the node should hold.
    fn capacity(&self) -> Result<f64>;

    /// Stable tie-break key used to order nodes deterministically.
    fn hash(&self) -> u64;
}

/// An opaque coordinate payload entry, interpreted only by transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Floating point value, e.g. a latitude.
    Float(f64),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// String value, e.g. a key.
    Str(String),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// A piece of data that must be placed on some node.
pub trait DataItem {
    /// Unique item identifier.
    fn id(&self) -> &str;

    /// Load units the item contributes to the cell it lands in.
    fn size(&self) -> u64;

    /// Payload handed to the transform to derive curve coordinates.
    fn values(&self) -> &[Value];
}
