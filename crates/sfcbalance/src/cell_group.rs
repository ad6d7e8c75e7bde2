//! A node's ownership record over the curve.

use std::{collections::BTreeSet, sync::Arc};

use crate::{
    cell::{Cell, CellArena},
    error::Result,
    node::Node,
    range::Range,
};

/// The contiguous range of cell ids owned by one node, plus the ids of the
/// materialized cells inside it.
///
/// Groups refer to cells by id only; the cells themselves live in the
/// space's arena and point back at their group by id.
#[derive(Debug, Clone)]
pub struct CellGroup {
    /// Id of the owning node.
    id: String,
    /// The owning node.
    node: Arc<dyn Node>,
    /// Half-open range of owned cell ids.
    range: Range,
    /// Ids of owned, materialized cells.
    cells: BTreeSet<u64>,
    /// Cached sum of the owned cells' loads. Advisory: refreshed by
    /// [`CellGroup::total_load`].
    load: u64,
}

impl CellGroup {
    /// Create an empty group with an empty range for `node`.
    pub fn new(node: Arc<dyn Node>) -> Self {
        Self {
            id: node.id().to_string(),
            node,
            range: Range::default(),
            cells: BTreeSet::new(),
            load: 0,
        }
    }

    /// Id of the group, equal to its node's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning node.
    pub fn node(&self) -> &Arc<dyn Node> {
        &self.node
    }

    /// Re-attach the group to a new node handle with the same id.
    pub fn set_node(&mut self, node: Arc<dyn Node>) {
        debug_assert_eq!(node.id(), self.id);
        self.node = node;
    }

    /// The owned range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Replace the owned range. Fails if `min > max`.
    pub fn set_range(&mut self, min: u64, max: u64) -> Result<()> {
        self.range = Range::new(min, max)?;
        Ok(())
    }

    /// True if `index` falls inside the owned range.
    pub fn fits_range(&self, index: u64) -> bool {
        self.range.fits(index)
    }

    /// Adopt `cell`, pointing its back-reference at this group.
    ///
    /// If the cell belonged to another group the caller must also call
    /// [`CellGroup::remove_cell`] on that group.
    pub fn add_cell(&mut self, cell: &Cell) {
        if self.cells.insert(cell.id()) {
            self.load += cell.load();
        }
        cell.set_group(Some(self.id.clone()));
    }

    /// Record ownership of cell `id` carrying `load` without touching the
    /// cell itself. Used to build assignments over snapshots; the
    /// back-reference is set when the assignment is installed.
    pub fn adopt(&mut self, id: u64, load: u64) {
        if self.cells.insert(id) {
            self.load += load;
        }
    }

    /// Detach cell `id`. Removing a non-member is a no-op.
    pub fn remove_cell(&mut self, id: u64) -> bool {
        self.cells.remove(&id)
    }

    /// True if cell `id` is owned by this group.
    pub fn contains(&self, id: u64) -> bool {
        self.cells.contains(&id)
    }

    /// Ids of the owned cells, ascending.
    pub fn cells(&self) -> impl Iterator<Item = u64> + '_ {
        self.cells.iter().copied()
    }

    /// Number of owned cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cached load; may lag behind the cells.
    pub fn cached_load(&self) -> u64 {
        self.load
    }

    /// Recompute the group's load from the owned cells and refresh the
    /// cache.
    pub fn total_load(&mut self, arena: &CellArena) -> u64 {
        self.load = self
            .cells
            .iter()
            .filter_map(|id| arena.get(id))
            .map(|c| c.load())
            .sum();
        self.load
    }

    /// Truncate every owned cell, detach them and zero the group's load.
    ///
    /// Returns the load actually dropped from the cells, which may differ
    /// from the cached load when placements race with the truncation.
    pub fn truncate(&mut self, arena: &CellArena) -> u64 {
        let mut dropped = 0;
        for cell in self.cells.iter().filter_map(|id| arena.get(id)) {
            dropped += cell.truncate();
            cell.set_group(None);
        }
        self.cells.clear();
        self.load = 0;
        dropped
    }
}
