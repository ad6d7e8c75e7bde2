use super::{Optimizer, fresh_groups, share};
use crate::{
    cell_group::CellGroup,
    error::Result,
    space::{CellLoad, SpaceSnapshot},
};

/// Splits the curve into contiguous ranges proportional to node power.
///
/// Groups are ordered by node hash, so the layout does not depend on the
/// order nodes joined in. The last group absorbs any rounding remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeOptimizer;

impl Optimizer for RangeOptimizer {
    fn name(&self) -> &'static str {
        "range optimizer"
    }

    fn optimize(&self, snapshot: &SpaceSnapshot) -> Result<Vec<CellGroup>> {
        let mut groups = fresh_groups(snapshot);
        let Some(last) = groups.len().checked_sub(1) else {
            return Ok(groups);
        };
        groups.sort_by_key(|g| g.node().hash());

        let capacity = snapshot.capacity();
        let total_power = snapshot.total_power();
        let mut min = 0u64;
        for (i, group) in groups.iter_mut().enumerate() {
            let max = if i == last {
                capacity
            } else {
                min.saturating_add(share(capacity, group.node().power(), total_power))
                    .min(capacity)
            };
            group
                .set_range(min, max)
                .map_err(|e| e.in_optimizer(self.name()))?;
            min = max;
        }
        assign(&mut groups, snapshot.cells());
        Ok(groups)
    }
}

/// Hand every cell to the group whose range covers it. `groups` must be in
/// ascending range order.
fn assign(groups: &mut [CellGroup], cells: &[CellLoad]) {
    for cell in cells {
        let idx = groups.partition_point(|g| g.range().max <= cell.id);
        if let Some(group) = groups.get_mut(idx).filter(|g| g.fits_range(cell.id)) {
            group.adopt(cell.id, cell.load);
        }
    }
}
