use std::result;

use thiserror::Error;

/// Errors produced when constructing or evaluating a curve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The curve could not be constructed with the requested parameters.
    #[error("invalid curve configuration: {0}")]
    Config(String),
    /// Fewer coordinates were supplied than the curve has dimensions.
    #[error("number of coordinates {got} is less than dimensions {dimensions}")]
    Dimensions {
        /// Coordinates supplied.
        got: usize,
        /// Dimensions of the curve.
        dimensions: u32,
    },
    /// A coordinate is larger than the curve's dimension size.
    #[error("coordinate {value} exceeds limit {limit}")]
    Coordinate {
        /// Offending coordinate.
        value: u64,
        /// Largest permitted coordinate.
        limit: u64,
    },
    /// An index lies beyond the end of the curve.
    #[error("code {code} exceeds limit (2^(dimensions * bits) - 1) {limit}")]
    Code {
        /// Offending index.
        code: u64,
        /// Largest valid index.
        limit: u64,
    },
    /// A decode buffer cannot hold one coordinate per dimension.
    #[error("buffer length {got} is less than dimensions {dimensions}")]
    Buffer {
        /// Length of the supplied buffer.
        got: usize,
        /// Dimensions of the curve.
        dimensions: u32,
    },
    /// No curve is registered under the requested name.
    #[error("unknown curve: {0}")]
    UnknownCurve(String),
}

/// Result type used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
