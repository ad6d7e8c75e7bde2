//! The curve's index space: cells, the groups that own them, and the data
//! path that places items.

use std::{
    collections::HashSet,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use serde::Serialize;
use sfcurve::SpaceCurve;

use crate::{
    cell::{Cell, CellArena},
    cell_group::CellGroup,
    error::{Error, Result},
    node::{DataItem, Node},
    optimizer::Optimizer,
    transform::Transform,
};

/// Structural state, guarded by the space lock.
#[derive(Debug, Default)]
struct SpaceState {
    /// Every materialized cell.
    cells: CellArena,
    /// One group per node.
    groups: Vec<CellGroup>,
    /// Bumped whenever node membership changes.
    generation: u64,
}

/// A cell's id and load at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLoad {
    /// Cell id.
    pub id: u64,
    /// Load of the cell.
    pub load: u64,
}

/// Immutable view of a space handed to optimizers.
#[derive(Debug, Clone)]
pub struct SpaceSnapshot {
    /// Membership generation the snapshot was taken at.
    generation: u64,
    /// Curve capacity.
    capacity: u64,
    /// Current groups, with refreshed loads.
    groups: Vec<CellGroup>,
    /// Every materialized cell, ascending by id.
    cells: Vec<CellLoad>,
    /// Sum of node powers.
    total_power: f64,
}

impl SpaceSnapshot {
    /// Membership generation the snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of indices on the curve.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Groups as they were at snapshot time.
    pub fn groups(&self) -> &[CellGroup] {
        &self.groups
    }

    /// Materialized cells, ascending by id.
    pub fn cells(&self) -> &[CellLoad] {
        &self.cells
    }

    /// Sum of node powers.
    pub fn total_power(&self) -> f64 {
        self.total_power
    }

    /// Sum of cell loads.
    pub fn total_load(&self) -> u64 {
        self.cells.iter().map(|c| c.load).sum()
    }
}

/// The items and load one node holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    /// Node id.
    pub id: String,
    /// Ids of the items resident in the node's cells, sorted.
    pub items: Vec<String>,
    /// Sum of the node's cell loads.
    pub load: u64,
}

/// Assigns data items to nodes through a space-filling curve.
///
/// Items are encoded to a cell, and cells are owned by the cell group of
/// exactly one node. Cells are materialized lazily on first use.
///
/// Lookups and structural changes are serialized by one lock. Load updates
/// happen after it is released, under the resolved cell's own lock, so
/// placements into different cells proceed in parallel.
pub struct Space {
    /// The curve items are encoded on.
    curve: Box<dyn SpaceCurve>,
    /// Maps item values to coordinates.
    transform: Option<Box<dyn Transform>>,
    /// Cells, groups and generation.
    state: Mutex<SpaceState>,
    /// Sum of all cell loads.
    load: AtomicU64,
}

impl fmt::Debug for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("curve", &self.curve)
            .field("transform", &self.transform.is_some())
            .field("state", &self.state)
            .field("load", &self.load)
            .finish()
    }
}

impl SpaceState {
    /// Index of the group whose range covers `index`.
    fn find_group(&self, index: u64) -> Option<usize> {
        self.groups.iter().position(|g| g.fits_range(index))
    }

    /// Index of the group with id `id`.
    fn group_by_id(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id() == id)
    }

    /// True if cell `id` is owned, or could be bound to a covering group.
    fn bindable(&self, id: u64) -> bool {
        self.cells.get(&id).is_some_and(|c| c.group().is_some())
            || self.find_group(id).is_some()
    }

    /// Fetch cell `id`, materializing it and binding it to the covering
    /// group as needed. Nothing is created when no group covers it.
    fn bind(&mut self, id: u64) -> Result<Arc<Cell>> {
        if let Some(cell) = self.cells.get(&id)
            && cell.group().is_some()
        {
            return Ok(cell.clone());
        }
        let owner = self.find_group(id).ok_or(Error::UnboundCell(id))?;
        let cell = self
            .cells
            .entry(id)
            .or_insert_with(|| Arc::new(Cell::new(id)))
            .clone();
        self.groups[owner].add_cell(&cell);
        Ok(cell)
    }

    /// Node owning `cell`.
    fn owner(&self, cell: &Cell) -> Result<Arc<dyn Node>> {
        cell.group()
            .and_then(|g| self.group_by_id(&g))
            .map(|i| self.groups[i].node().clone())
            .ok_or(Error::UnboundCell(cell.id()))
    }

    /// The cell currently holding `item`, whose natural cell is `natural`,
    /// following at most one forwarding hop. Never materializes cells.
    fn current_id(&self, natural: u64, item: &str) -> u64 {
        self.cells
            .get(&natural)
            .and_then(|c| c.relocated(item))
            .unwrap_or(natural)
    }
}

impl Space {
    /// Create a space over `curve` with one empty group per node.
    ///
    /// Nodes own no range until the space is optimized.
    pub fn new(
        curve: Box<dyn SpaceCurve>,
        transform: Option<Box<dyn Transform>>,
        nodes: impl IntoIterator<Item = Arc<dyn Node>>,
    ) -> Self {
        let space = Self {
            curve,
            transform,
            state: Mutex::new(SpaceState::default()),
            load: AtomicU64::new(0),
        };
        for node in nodes {
            space.add_node(node);
        }
        space
    }

    /// The curve items are encoded on.
    pub fn curve(&self) -> &dyn SpaceCurve {
        &*self.curve
    }

    /// Number of indices on the curve.
    pub fn capacity(&self) -> u64 {
        self.curve.capacity()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.state.lock().groups.len()
    }

    /// True if the space has no nodes.
    pub fn is_empty(&self) -> bool {
        self.state.lock().groups.is_empty()
    }

    /// Sum of all cell loads.
    pub fn total_load(&self) -> u64 {
        self.load.load(Ordering::Acquire)
    }

    /// Sum of all node powers.
    pub fn total_power(&self) -> f64 {
        self.state
            .lock()
            .groups
            .iter()
            .map(|g| g.node().power())
            .sum()
    }

    /// Copies of the current groups.
    pub fn cell_groups(&self) -> Vec<CellGroup> {
        self.state.lock().groups.clone()
    }

    /// Materialized cell `id`, if any.
    pub fn cell(&self, id: u64) -> Option<Arc<Cell>> {
        self.state.lock().cells.get(&id).cloned()
    }

    /// Id of the group whose range covers `index`.
    pub fn find_cell_group(&self, index: u64) -> Option<String> {
        let state = self.state.lock();
        state
            .find_group(index)
            .map(|i| state.groups[i].id().to_string())
    }

    /// Node with id `id`.
    pub fn get_node(&self, id: &str) -> Option<Arc<dyn Node>> {
        let state = self.state.lock();
        state
            .group_by_id(id)
            .map(|i| state.groups[i].node().clone())
    }

    /// All nodes, in group order.
    pub fn nodes(&self) -> Vec<Arc<dyn Node>> {
        self.state
            .lock()
            .groups
            .iter()
            .map(|g| g.node().clone())
            .collect()
    }

    /// Add a node with an empty range.
    ///
    /// If a node with the same id is already present its handle is replaced
    /// and its range and cells are left alone. No rebalancing happens.
    pub fn add_node(&self, node: Arc<dyn Node>) {
        let mut state = self.state.lock();
        if let Some(i) = state.group_by_id(node.id()) {
            state.groups[i].set_node(node);
            return;
        }
        tracing::debug!("space: adding node {}", node.id());
        state.groups.push(CellGroup::new(node));
        state.generation += 1;
    }

    /// Remove node `id`, truncating every cell it owned.
    ///
    /// The removed cells stay materialized but unowned until the next
    /// optimization, or until a lookup binds them to a covering group.
    pub fn remove_node(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock();
        let i = state
            .group_by_id(id)
            .ok_or_else(|| Error::NotFound(format!("node {id}")))?;
        let mut group = state.groups.remove(i);
        let load = group.truncate(&state.cells);
        self.load.fetch_sub(load, Ordering::AcqRel);
        state.generation += 1;
        tracing::debug!("space: removed node {id} ({load} load units dropped)");
        Ok(())
    }

    /// Compute the natural cell of `item`: the curve index of its
    /// transformed values.
    pub fn cell_id(&self, item: &dyn DataItem) -> Result<u64> {
        let transform = self.transform.as_ref().ok_or(Error::NoTransform)?;
        let mut coords = transform.transform(item.values(), &*self.curve)?;
        self.curve
            .encode_in_place(&mut coords)
            .map_err(Error::Encoding)
    }

    /// Find the node holding `item` and the id of the cell it resolves to,
    /// following a relocation if one is recorded.
    ///
    /// With `place`, the item's size is also added to that cell. Re-placing
    /// an item replaces its previous size rather than adding to it.
    pub fn locate_data(&self, item: &dyn DataItem, place: bool) -> Result<(Arc<dyn Node>, u64)> {
        let (node, cell) = {
            let mut state = self.state.lock();
            if state.groups.is_empty() {
                return Err(Error::NoNodes);
            }
            let natural = self.cell_id(item)?;
            let current = state.current_id(natural, item.id());
            let cell = state.bind(current)?;
            (state.owner(&cell)?, cell)
        };
        if place {
            let size = item.size();
            let previous = cell.add_item(item.id(), size);
            self.adjust_load(previous.unwrap_or(0), size);
        }
        Ok((node, cell.id()))
    }

    /// Place `item`, returning its node and cell.
    pub fn add_data(&self, item: &dyn DataItem) -> Result<(Arc<dyn Node>, u64)> {
        self.locate_data(item, true)
    }

    /// Remove `item` from the cell it resolves to.
    ///
    /// A forwarding entry on the item's natural cell is left in place; it is
    /// cleared only by relocating the item back or by truncation.
    pub fn remove_data(&self, item: &dyn DataItem) -> Result<()> {
        let cell = {
            let state = self.state.lock();
            let natural = self.cell_id(item)?;
            let current = state.current_id(natural, item.id());
            state.cells.get(&current).cloned()
        };
        let size = cell
            .and_then(|c| c.remove_item(item.id()))
            .ok_or_else(|| Error::NotFound(format!("item {}", item.id())))?;
        self.load.fetch_sub(size, Ordering::AcqRel);
        Ok(())
    }

    /// Pin `item` to cell `target`, moving its load there if it is placed.
    ///
    /// Later lookups of the item resolve to `target`. Relocating to the
    /// item's natural cell removes the forwarding entry. Returns the node
    /// owning `target`.
    pub fn relocate_data(&self, item: &dyn DataItem, target: u64) -> Result<Arc<dyn Node>> {
        let id = item.id();
        let (natural, current, target, node) = {
            let mut state = self.state.lock();
            if state.groups.is_empty() {
                return Err(Error::NoNodes);
            }
            let natural = self.cell_id(item)?;
            let current = state.current_id(natural, id);
            if let Some(&unbound) = [natural, current, target]
                .iter()
                .find(|&&c| !state.bindable(c))
            {
                return Err(Error::UnboundCell(unbound));
            }
            let natural = state.bind(natural)?;
            let current = state.bind(current)?;
            let target = state.bind(target)?;
            let node = state.owner(&target)?;
            (natural, current, target, node)
        };

        let at_natural = Arc::ptr_eq(&current, &natural);
        let moved = if Arc::ptr_eq(&target, &natural) {
            natural.clear_relocation(id);
            if at_natural { None } else { current.remove_item(id) }
        } else if at_natural {
            natural.relocate(id, target.id())
        } else {
            natural.relocate(id, target.id());
            current.remove_item(id)
        };
        if let Some(size) = moved
            && let Some(previous) = target.add_item(id, size)
        {
            self.load.fetch_sub(previous, Ordering::AcqRel);
        }
        tracing::debug!("space: relocated {id} to cell {}", target.id());
        Ok(node)
    }

    /// Which items and how much load each node holds, in group order.
    pub fn distribution(&self) -> Vec<NodeData> {
        let state = self.state.lock();
        state
            .groups
            .iter()
            .map(|g| {
                let cells: Vec<&Arc<Cell>> =
                    g.cells().filter_map(|id| state.cells.get(&id)).collect();
                let mut items: Vec<String> = cells.iter().flat_map(|c| c.item_ids()).collect();
                items.sort_unstable();
                NodeData {
                    id: g.id().to_string(),
                    items,
                    load: cells.iter().map(|c| c.load()).sum(),
                }
            })
            .collect()
    }

    /// Take an immutable view of the space for an optimizer.
    pub fn snapshot(&self) -> SpaceSnapshot {
        let mut state = self.state.lock();
        let SpaceState {
            cells,
            groups,
            generation,
        } = &mut *state;
        for g in groups.iter_mut() {
            g.total_load(cells);
        }
        let mut loads: Vec<CellLoad> = cells
            .values()
            .map(|c| CellLoad {
                id: c.id(),
                load: c.load(),
            })
            .collect();
        loads.sort_unstable_by_key(|c| c.id);
        SpaceSnapshot {
            generation: *generation,
            capacity: self.curve.capacity(),
            total_power: groups.iter().map(|g| g.node().power()).sum(),
            groups: groups.clone(),
            cells: loads,
        }
    }

    /// Replace the groups with an optimizer's result.
    ///
    /// `groups` must hold exactly one group per current node. Fails with
    /// [`Error::StaleSnapshot`] if membership changed since the snapshot at
    /// `generation` was taken. Cells materialized after the snapshot are
    /// bound by range.
    pub fn install(&self, generation: u64, mut groups: Vec<CellGroup>) -> Result<()> {
        let mut state = self.state.lock();
        if generation != state.generation {
            return Err(Error::StaleSnapshot {
                snapshot: generation,
                current: state.generation,
            });
        }
        if groups.len() != state.groups.len() {
            return Err(Error::Config(format!(
                "{} groups returned for {} nodes",
                groups.len(),
                state.groups.len()
            )));
        }
        for g in &mut groups {
            let i = state
                .group_by_id(g.id())
                .ok_or_else(|| Error::NotFound(format!("node {}", g.id())))?;
            g.set_node(state.groups[i].node().clone());
        }

        let mut owned = HashSet::new();
        for g in &groups {
            for id in g.cells() {
                if let Some(cell) = state.cells.get(&id) {
                    cell.set_group(Some(g.id().to_string()));
                    owned.insert(id);
                }
            }
        }
        let mut unbound = 0usize;
        for (id, cell) in &state.cells {
            if owned.contains(id) {
                continue;
            }
            match groups.iter_mut().find(|g| g.fits_range(*id)) {
                Some(g) => g.add_cell(cell),
                None => {
                    cell.set_group(None);
                    unbound += 1;
                }
            }
        }
        if unbound > 0 {
            tracing::warn!("space: {unbound} cells are outside every group's range");
        }
        for g in &mut groups {
            g.total_load(&state.cells);
        }
        state.groups = groups;
        tracing::debug!(
            "space: installed {} groups at generation {generation}",
            state.groups.len()
        );
        Ok(())
    }

    /// Re-partition the space with `optimizer` and install the result.
    pub fn optimize(&self, optimizer: &dyn Optimizer) -> Result<()> {
        let snapshot = self.snapshot();
        tracing::debug!(
            "space: running {} over {} cells",
            optimizer.name(),
            snapshot.cells().len()
        );
        let groups = optimizer.optimize(&snapshot)?;
        self.install(snapshot.generation(), groups)
    }

    /// Apply a placement's net change to the total load.
    fn adjust_load(&self, removed: u64, added: u64) {
        if added >= removed {
            self.load.fetch_add(added - removed, Ordering::AcqRel);
        } else {
            self.load.fetch_sub(removed - added, Ordering::AcqRel);
        }
    }
}
