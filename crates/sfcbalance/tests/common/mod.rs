//! Fixtures shared by the integration tests.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use sfcbalance::{
    DataItem, Node, Space, Value,
    error::{Error, Result},
};
use sfcurve::{CurveType, SpaceCurve, point::Coords};

/// A node with fixed figures.
#[derive(Debug)]
pub struct TestNode {
    pub id: String,
    pub power: f64,
    /// `None` makes `capacity()` fail.
    pub capacity: Option<f64>,
    pub hash: u64,
}

impl Node for TestNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn power(&self) -> f64 {
        self.power
    }

    fn capacity(&self) -> Result<f64> {
        self.capacity.ok_or_else(|| Error::Capacity {
            node: self.id.clone(),
            reason: "unavailable".into(),
        })
    }

    fn hash(&self) -> u64 {
        self.hash
    }
}

pub fn node(id: &str, power: f64, capacity: f64, hash: u64) -> Arc<dyn Node> {
    Arc::new(TestNode {
        id: id.to_string(),
        power,
        capacity: Some(capacity),
        hash,
    })
}

pub fn failing_node(id: &str, hash: u64) -> Arc<dyn Node> {
    Arc::new(TestNode {
        id: id.to_string(),
        power: 1.0,
        capacity: None,
        hash,
    })
}

/// Equal-power nodes `node-0..n` with hash equal to their index.
pub fn nodes(n: usize) -> Vec<Arc<dyn Node>> {
    (0..n)
        .map(|i| node(&format!("node-{i}"), 1.0, 1e9, i as u64))
        .collect()
}

/// An item whose values are its raw curve coordinates.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: String,
    pub size: u64,
    pub values: Vec<Value>,
}

impl DataItem for TestItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn values(&self) -> &[Value] {
        &self.values
    }
}

pub fn item(id: &str, size: u64, coords: &[u64]) -> TestItem {
    TestItem {
        id: id.to_string(),
        size,
        values: coords.iter().map(|&c| Value::from(c)).collect(),
    }
}

/// Use unsigned values as coordinates unchanged.
pub fn direct(values: &[Value], _curve: &dyn SpaceCurve) -> Result<Coords> {
    values
        .iter()
        .map(|v| match *v {
            Value::Uint(c) => Ok(c),
            _ => Err(Error::Transform(format!("{v:?} is not a coordinate"))),
        })
        .collect()
}

/// A space over a curve of `dims` axes of `bits` bits with the direct
/// transform.
pub fn space(kind: CurveType, dims: u32, bits: u32, nodes: Vec<Arc<dyn Node>>) -> Space {
    let curve = kind.build(dims, bits).expect("valid curve");
    Space::new(curve, Some(Box::new(direct)), nodes)
}

/// Ranges of the space's groups in ascending order.
pub fn ranges(space: &Space) -> Vec<(String, u64, u64)> {
    let mut out: Vec<_> = space
        .cell_groups()
        .iter()
        .map(|g| (g.id().to_string(), g.range().min, g.range().max))
        .collect();
    out.sort_by_key(|r| (r.1, r.2));
    out
}

/// Panic unless the group ranges tile `[0, capacity)` exactly and every
/// owned cell lies in its group's range.
pub fn assert_partition(space: &Space) {
    let mut next = 0;
    for (id, min, max) in ranges(space) {
        assert_eq!(min, next, "gap or overlap before {id}: {:?}", ranges(space));
        assert!(min <= max);
        next = max;
    }
    assert_eq!(next, space.capacity(), "{:?}", ranges(space));
    for g in space.cell_groups() {
        for c in g.cells() {
            assert!(g.fits_range(c), "cell {c} outside {} {}", g.id(), g.range());
            let cell = space.cell(c).expect("owned cells are materialized");
            assert!(cell.is_owned_by(g.id()));
        }
    }
}
