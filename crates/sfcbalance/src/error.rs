use std::result;

use sfcurve::error::Error as CurveError;
use thiserror::Error;

/// Errors returned by the balancing layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid balancer configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// The curve could not be constructed.
    #[error("curve configuration error: {0}")]
    Curve(#[source] CurveError),
    /// A range was requested with `min > max`.
    #[error("range min {min} is greater than max {max}")]
    Range {
        /// Requested lower bound.
        min: u64,
        /// Requested upper bound.
        max: u64,
    },
    /// An item's coordinates could not be encoded onto the curve.
    #[error("item encoding error: {0}")]
    Encoding(#[source] CurveError),
    /// The transform rejected an item's values.
    #[error("transform error: {0}")]
    Transform(String),
    /// The space has no transform function configured.
    #[error("transform function is not set")]
    NoTransform,
    /// No cell group's range covers the computed cell index.
    #[error("cell {0} is not covered by any cell group")]
    UnboundCell(u64),
    /// The operation needs at least one node.
    #[error("no nodes in the cluster")]
    NoNodes,
    /// A node or item could not be found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A node's capacity could not be read.
    #[error("capacity of node {node} is unavailable: {reason}")]
    Capacity {
        /// Node whose capacity failed.
        node: String,
        /// Description of the failure.
        reason: String,
    },
    /// Node membership changed between snapshot and install.
    #[error("stale snapshot: taken at generation {snapshot}, space is at {current}")]
    StaleSnapshot {
        /// Generation recorded by the snapshot.
        snapshot: u64,
        /// Generation of the space at install time.
        current: u64,
    },
    /// An optimizer failed; wraps the underlying error with its name.
    #[error("{optimizer} error: {source}")]
    Optimize {
        /// Name of the failing optimizer.
        optimizer: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap `self` with the name of the optimizer that produced it.
    pub fn in_optimizer(self, optimizer: &'static str) -> Self {
        Self::Optimize {
            optimizer,
            source: Box::new(self),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
