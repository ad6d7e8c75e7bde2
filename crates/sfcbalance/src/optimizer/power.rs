use super::{Optimizer, fresh_groups, share};
use crate::{cell_group::CellGroup, error::Result, space::SpaceSnapshot};

/// Splits the curve by node power, without filling a node past its
/// capacity.
///
/// Nodes with the least remaining capacity are laid out first. Each walks
/// the cells of its power-proportional window in id order and stops at the
/// first cell that would overflow it; the next node's range starts there.
/// The last node takes everything that is left, whatever its capacity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerRangeOptimizer;

/// A group being laid out, with the capacity figures it is sorted by.
struct Plan {
    /// The group under construction.
    group: CellGroup,
    /// Node capacity.
    capacity: f64,
    /// Capacity minus the load the node held at snapshot time.
    remaining: f64,
}

impl Optimizer for PowerRangeOptimizer {
    fn name(&self) -> &'static str {
        "power range optimizer"
    }

    fn optimize(&self, snapshot: &SpaceSnapshot) -> Result<Vec<CellGroup>> {
        let name = self.name();
        let mut plans = snapshot
            .groups()
            .iter()
            .zip(fresh_groups(snapshot))
            .map(|(current, group)| -> Result<Plan> {
                let capacity = group.node().capacity().map_err(|e| e.in_optimizer(name))?;
                Ok(Plan {
                    remaining: capacity - current.cached_load() as f64,
                    capacity,
                    group,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let Some(last) = plans.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        plans.sort_by(|a, b| {
            a.remaining
                .total_cmp(&b.remaining)
                .then_with(|| a.group.node().hash().cmp(&b.group.node().hash()))
        });

        let cells = snapshot.cells();
        let capacity = snapshot.capacity();
        let total_power = snapshot.total_power();
        let mut min = 0;
        let mut next = 0;
        for (i, plan) in plans.iter_mut().enumerate() {
            if i == last {
                plan.group
                    .set_range(min, capacity)
                    .map_err(|e| e.in_optimizer(name))?;
                for cell in &cells[next..] {
                    plan.group.adopt(cell.id, cell.load);
                }
                break;
            }

            let mut max = min
                .saturating_add(share(capacity, plan.group.node().power(), total_power))
                .min(capacity);
            let mut filled = 0.0;
            while let Some(cell) = cells.get(next).filter(|c| c.id < max) {
                let load = cell.load as f64;
                if filled + load > plan.capacity {
                    max = cell.id;
                    break;
                }
                filled += load;
                plan.group.adopt(cell.id, cell.load);
                next += 1;
            }
            plan.group
                .set_range(min, max)
                .map_err(|e| e.in_optimizer(name))?;
            min = max;
        }
        Ok(plans.into_iter().map(|p| p.group).collect())
    }
}
