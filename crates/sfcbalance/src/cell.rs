//! A single addressable index on the curve.

use std::{collections::HashMap, mem, sync::Arc};

use parking_lot::Mutex;

/// Sparse arena of materialized cells, keyed by curve index.
pub type CellArena = HashMap<u64, Arc<Cell>>;

/// Mutable part of a cell, guarded by the cell's own lock.
#[derive(Debug, Default)]
struct CellState {
    /// Sum of the sizes of items resident here.
    load: u64,
    /// Size of every item currently resident, keyed by item id.
    resident: HashMap<String, u64>,
    /// Forwarding table: item id to the cell that now holds it.
    relocations: HashMap<String, u64>,
    /// Id of the owning cell group, if any.
    group: Option<String>,
}

/// Smallest unit of curve index space.
///
/// Cells are created lazily the first time their index is touched and live
/// in the space's arena for the rest of its life; removal only truncates
/// them.
#[derive(Debug)]
pub struct Cell {
    /// Curve index of the cell.
    id: u64,
    /// Load, residents, forwarding table and owner.
    state: Mutex<CellState>,
}

impl Cell {
    /// Create an empty, unowned cell.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: Mutex::new(CellState::default()),
        }
    }

    /// Curve index of the cell.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current load.
    pub fn load(&self) -> u64 {
        self.state.lock().load
    }

    /// Add `n` load units.
    pub fn add_load(&self, n: u64) {
        self.state.lock().load += n;
    }

    /// Remove `n` load units. Removing more than the cell holds is a caller
    /// bug; release builds clamp at zero.
    pub fn remove_load(&self, n: u64) {
        let mut state = self.state.lock();
        debug_assert!(n <= state.load, "cell {} load underflow", self.id);
        state.load = state.load.saturating_sub(n);
    }

    /// Record `item` as resident with `size` load units, returning the size
    /// it previously had here. Re-placing an item replaces its size.
    pub fn add_item(&self, item: &str, size: u64) -> Option<u64> {
        let mut state = self.state.lock();
        let previous = state.resident.insert(item.to_string(), size);
        state.load = state.load.saturating_sub(previous.unwrap_or(0)) + size;
        previous
    }

    /// Drop `item` from the residents, returning the load it carried.
    pub fn remove_item(&self, item: &str) -> Option<u64> {
        let mut state = self.state.lock();
        let size = state.resident.remove(item)?;
        state.load = state.load.saturating_sub(size);
        Some(size)
    }

    /// True if `item` is resident in this cell.
    pub fn holds(&self, item: &str) -> bool {
        self.state.lock().resident.contains_key(item)
    }

    /// Ids of the items resident in this cell, sorted.
    pub fn item_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.lock().resident.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Forward lookups for `item` to cell `target`.
    ///
    /// If the item was resident here its load leaves this cell; the size
    /// that left is returned so the caller can place it at the target.
    pub fn relocate(&self, item: &str, target: u64) -> Option<u64> {
        let mut state = self.state.lock();
        state.relocations.insert(item.to_string(), target);
        let size = state.resident.remove(item)?;
        state.load = state.load.saturating_sub(size);
        Some(size)
    }

    /// Where lookups for `item` are forwarded, if anywhere.
    pub fn relocated(&self, item: &str) -> Option<u64> {
        self.state.lock().relocations.get(item).copied()
    }

    /// Remove the forwarding entry for `item`.
    pub fn clear_relocation(&self, item: &str) -> Option<u64> {
        self.state.lock().relocations.remove(item)
    }

    /// Number of forwarding entries.
    pub fn relocation_count(&self) -> usize {
        self.state.lock().relocations.len()
    }

    /// Zero the load and clear residents and forwarding entries, returning
    /// the load that was dropped.
    pub fn truncate(&self) -> u64 {
        let mut state = self.state.lock();
        state.resident.clear();
        state.relocations.clear();
        mem::take(&mut state.load)
    }

    /// Id of the owning cell group.
    pub fn group(&self) -> Option<String> {
        self.state.lock().group.clone()
    }

    /// True when `group` owns this cell.
    pub fn is_owned_by(&self, group: &str) -> bool {
        self.state.lock().group.as_deref() == Some(group)
    }

    /// Replace the owner back-reference.
    pub fn set_group(&self, group: Option<String>) {
        self.state.lock().group = group;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A cell holding `di-0` (10) and `di-1` (20).
    fn loaded_cell() -> Cell {
        let c = Cell::new(42);
        c.add_item("di-0", 10);
        c.add_item("di-1", 20);
        c
    }

    #[test]
    fn new_cell() {
        let c = Cell::new(7);
        assert_eq!(c.id(), 7);
        assert_eq!(c.load(), 0);
        assert_eq!(c.group(), None);
        assert!(c.item_ids().is_empty());
    }

    #[test]
    fn load_counter() {
        let c = Cell::new(1);
        c.add_load(5);
        c.add_load(7);
        assert_eq!(c.load(), 12);
        c.remove_load(12);
        assert_eq!(c.load(), 0);
    }

    #[test]
    fn items() {
        let c = loaded_cell();
        assert_eq!(c.load(), 30);
        assert_eq!(c.item_ids(), vec!["di-0", "di-1"]);

        // Re-placing replaces the size instead of double counting.
        assert_eq!(c.add_item("di-0", 15), Some(10));
        assert_eq!(c.load(), 35);

        assert_eq!(c.remove_item("di-0"), Some(15));
        assert_eq!(c.remove_item("di-0"), None);
        assert_eq!(c.load(), 20);
        assert!(c.holds("di-1"));
        assert!(!c.holds("di-0"));
    }

    #[test]
    fn relocate_resident_item() {
        let c = loaded_cell();
        assert_eq!(c.relocate("di-0", 4242), Some(10));
        assert_eq!(c.load(), 20);
        assert_eq!(c.relocated("di-0"), Some(4242));
        assert_eq!(c.item_ids(), vec!["di-1"]);
    }

    #[test]
    fn relocate_absent_item() {
        let c = loaded_cell();
        assert_eq!(c.relocate("di-9", 4242), None);
        assert_eq!(c.load(), 30);
        assert_eq!(c.relocated("di-9"), Some(4242));
        assert_eq!(c.relocated("di-3"), None);
        assert_eq!(c.relocation_count(), 1);

        assert_eq!(c.clear_relocation("di-9"), Some(4242));
        assert_eq!(c.relocated("di-9"), None);
    }

    #[test]
    fn truncate() {
        let c = loaded_cell();
        c.relocate("di-0", 1);
        c.set_group(Some("node-0".into()));
        assert_eq!(c.truncate(), 30);
        assert_eq!(c.load(), 0);
        assert_eq!(c.truncate(), 0);
        assert_eq!(c.relocated("di-0"), None);
        assert!(c.item_ids().is_empty());
        // Ownership is the group's business, not the cell's.
        assert!(c.is_owned_by("node-0"));
    }
}
