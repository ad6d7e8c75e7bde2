//! Strategies that partition the curve between nodes.
//!
//! An optimizer reads an immutable [`SpaceSnapshot`] and returns a fresh set
//! of cell groups: one per node, with new ranges and the ids of the cells
//! each now owns. The space installs the result atomically, so optimizers
//! never observe or race with the live data path.

mod power;
mod range;

pub use power::PowerRangeOptimizer;
pub use range::RangeOptimizer;

use crate::{cell_group::CellGroup, error::Result, space::SpaceSnapshot};

/// Recomputes the range partition of a space.
pub trait Optimizer: Send + Sync {
    /// Short name, used as error context.
    fn name(&self) -> &'static str {
        "optimizer"
    }

    /// Compute a new partition for `snapshot`.
    fn optimize(&self, snapshot: &SpaceSnapshot) -> Result<Vec<CellGroup>>;
}

impl<F> Optimizer for F
where
    F: Fn(&SpaceSnapshot) -> Result<Vec<CellGroup>> + Send + Sync,
{
    fn optimize(&self, snapshot: &SpaceSnapshot) -> Result<Vec<CellGroup>> {
        self(snapshot)
    }
}

/// Length of a group's power-proportional share of `capacity`.
///
/// A zero total power yields a zero-length share.
fn share(capacity: u64, power: f64, total_power: f64) -> u64 {
    (capacity as f64 * power / total_power).round() as u64
}

/// Shared scaffolding: clone the snapshot's groups with empty ranges and no
/// cells.
fn fresh_groups(snapshot: &SpaceSnapshot) -> Vec<CellGroup> {
    snapshot
        .groups()
        .iter()
        .map(|g| CellGroup::new(g.node().clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares() {
        assert_eq!(share(4096, 1.0, 4.0), 1024);
        assert_eq!(share(4096, 1.0, 10.0), 410);
        assert_eq!(share(4096, 2.0, 10.0), 819);
        assert_eq!(share(4096, 1.0, 7.0), 585);
        // NaN saturates to zero.
        assert_eq!(share(4096, 0.0, 0.0), 0);
    }
}
