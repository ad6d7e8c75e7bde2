//! The balancer facade.

use std::{fmt, sync::Arc};

use sfcurve::SpaceCurve;

use crate::{
    config::BalancerConfig,
    error::Result,
    node::{DataItem, Node},
    optimizer::Optimizer,
    space::{NodeData, Space},
    transform::Transform,
};

/// Distributes load between the nodes of a cluster.
///
/// Wires a [`Space`] to the optimizer that partitions it. Node membership
/// changes can optionally trigger a re-partition; the data path delegates
/// to the space.
pub struct Balancer {
    /// Cells, groups and load.
    space: Space,
    /// Partitioning strategy.
    optimizer: Box<dyn Optimizer>,
}

impl fmt::Debug for Balancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Balancer")
            .field("space", &self.space)
            .field("optimizer", &self.optimizer.name())
            .finish()
    }
}

impl Balancer {
    /// Build a balancer over the curve described by `config`.
    ///
    /// The initial nodes own nothing until [`Balancer::optimize`] runs.
    pub fn new(
        config: BalancerConfig,
        transform: Box<dyn Transform>,
        optimizer: Box<dyn Optimizer>,
        nodes: impl IntoIterator<Item = Arc<dyn Node>>,
    ) -> Result<Self> {
        let curve = config.build_curve()?;
        tracing::debug!(
            "balancer: {} curve, {} dimensions of {} bits, {}",
            curve.name(),
            curve.dimensions(),
            curve.bits(),
            optimizer.name()
        );
        Ok(Self {
            space: Space::new(curve, Some(transform), nodes),
            optimizer,
        })
    }

    /// The underlying space.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// The curve items are encoded on.
    pub fn curve(&self) -> &dyn SpaceCurve {
        self.space.curve()
    }

    /// Add `node`, re-partitioning if `optimize` is set.
    pub fn add_node(&self, node: Arc<dyn Node>, optimize: bool) -> Result<()> {
        self.space.add_node(node);
        if optimize {
            self.optimize()?;
        }
        Ok(())
    }

    /// Remove node `id`, re-partitioning if `optimize` is set.
    pub fn remove_node(&self, id: &str, optimize: bool) -> Result<()> {
        self.space.remove_node(id)?;
        if optimize {
            self.optimize()?;
        }
        Ok(())
    }

    /// Node with id `id`.
    pub fn get_node(&self, id: &str) -> Option<Arc<dyn Node>> {
        self.space.get_node(id)
    }

    /// All nodes.
    pub fn nodes(&self) -> Vec<Arc<dyn Node>> {
        self.space.nodes()
    }

    /// Find the node and cell `item` resolves to, without placing it.
    pub fn locate_data(&self, item: &dyn DataItem) -> Result<(Arc<dyn Node>, u64)> {
        self.space.locate_data(item, false)
    }

    /// Place `item`, returning its node and cell.
    pub fn add_data(&self, item: &dyn DataItem) -> Result<(Arc<dyn Node>, u64)> {
        self.space.add_data(item)
    }

    /// Remove `item`.
    pub fn remove_data(&self, item: &dyn DataItem) -> Result<()> {
        self.space.remove_data(item)
    }

    /// Pin `item` to cell `cell`, returning the node that now holds it.
    pub fn relocate_data(&self, item: &dyn DataItem, cell: u64) -> Result<Arc<dyn Node>> {
        self.space.relocate_data(item, cell)
    }

    /// Re-partition the curve with the configured optimizer.
    pub fn optimize(&self) -> Result<()> {
        self.space.optimize(&*self.optimizer)
    }

    /// Which items and how much load each node holds.
    pub fn distribution(&self) -> Vec<NodeData> {
        self.space.distribution()
    }
}
