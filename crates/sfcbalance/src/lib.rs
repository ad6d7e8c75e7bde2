//! Locality-preserving data placement over a space-filling curve.
//!
//! Every node of a cluster owns one contiguous range of curve indices
//! ("cells"). A data item is mapped to coordinates by a [`Transform`],
//! encoded to a cell on the curve, and lands on whichever node owns that
//! cell. Range lengths follow node power, and nearby coordinates land on
//! nearby cells, so related items tend to share a node.
//!
//! ```
//! use std::sync::Arc;
//!
//! use sfcbalance::{
//!     Balancer, BalancerConfig, DataItem, Node, RangeOptimizer, Value, error::Result,
//!     transform,
//! };
//! use sfcurve::CurveType;
//!
//! #[derive(Debug)]
//! struct Machine(&'static str, u64);
//!
//! impl Node for Machine {
//!     fn id(&self) -> &str { self.0 }
//!     fn power(&self) -> f64 { 1.0 }
//!     fn capacity(&self) -> Result<f64> { Ok(1e6) }
//!     fn hash(&self) -> u64 { self.1 }
//! }
//!
//! struct Key(String, [Value; 1]);
//!
//! impl DataItem for Key {
//!     fn id(&self) -> &str { &self.0 }
//!     fn size(&self) -> u64 { 1 }
//!     fn values(&self) -> &[Value] { &self.1 }
//! }
//!
//! let nodes: Vec<Arc<dyn Node>> = vec![Arc::new(Machine("a", 1)), Arc::new(Machine("b", 2))];
//! let balancer = Balancer::new(
//!     BalancerConfig::new(CurveType::Hilbert, 2, 256),
//!     Box::new(transform::key),
//!     Box::new(RangeOptimizer),
//!     nodes,
//! )?;
//! balancer.optimize()?;
//!
//! let item = Key("user:42".into(), [Value::from("user:42")]);
//! let (node, cell) = balancer.add_data(&item)?;
//! assert_eq!(balancer.locate_data(&item)?.1, cell);
//! assert_eq!(balancer.space().total_load(), 1);
//! assert!(["a", "b"].contains(&node.id()));
//! # Ok::<(), sfcbalance::error::Error>(())
//! ```

/// The balancer facade.
pub mod balancer;
/// Single curve cells.
pub mod cell;
/// Per-node ownership records.
pub mod cell_group;
/// Balancer configuration.
pub mod config;
/// Error types used across the crate.
pub mod error;
/// Capabilities consumed from callers.
pub mod node;
/// Partitioning strategies.
pub mod optimizer;
/// Half-open index ranges.
pub mod range;
/// The index space and data path.
pub mod space;
/// Item-to-coordinate transforms.
pub mod transform;

pub use crate::{
    balancer::Balancer,
    cell::Cell,
    cell_group::CellGroup,
    config::BalancerConfig,
    node::{DataItem, Node, Value},
    optimizer::{Optimizer, PowerRangeOptimizer, RangeOptimizer},
    range::Range,
    space::{CellLoad, NodeData, Space, SpaceSnapshot},
    transform::Transform,
};
