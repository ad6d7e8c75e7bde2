//! Lightweight N‑dimensional point type returned by curve decoders.

use std::{ops::Deref, vec::Vec};

use smallvec::SmallVec;

/// Inline storage for coordinates; most curves have at most eight axes.
pub type Coords = SmallVec<[u64; 8]>;

/// Compact N‑dimensional point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point(pub Coords);

impl Point {
    /// Create a new `Point` from a backing vector.
    pub fn new(vec: impl Into<Coords>) -> Self {
        Self(vec.into())
    }

    /// Create a new `Point`, asserting the coordinate count matches `dimension`.
    pub fn new_with_dimension(dimension: u32, vec: impl Into<Coords>) -> Self {
        let coords = vec.into();
        debug_assert_eq!(
            coords.len() as u32,
            dimension,
            "Point dimension mismatch: expected {dimension}, got {}",
            coords.len()
        );
        Self(coords)
    }

    /// Euclidean distance between two points.
    ///
    /// Both points must have the same dimensionality. In release builds the
    /// distance is computed over the shared prefix of dimensions.
    pub fn distance(&self, p2: &Self) -> f64 {
        debug_assert!(
            self.len() == p2.len(),
            "Point::distance called with differing dimensions: {} vs {}",
            self.len(),
            p2.len()
        );

        let tot: f64 = self
            .0
            .iter()
            .zip(p2.0.iter())
            .map(|(a, b)| {
                let d = a.abs_diff(*b) as f64;
                d * d
            })
            .sum();
        tot.sqrt()
    }

    /// Manhattan distance between two points.
    pub fn manhattan(&self, p2: &Self) -> u64 {
        self.0
            .iter()
            .zip(p2.0.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .sum()
    }

    /// Return the point's coordinates as a slice.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Dimensionality of the point.
    pub fn dimension(&self) -> u32 {
        self.0.len() as u32
    }
}

impl From<Point> for Vec<u64> {
    fn from(val: Point) -> Self {
        val.0.to_vec()
    }
}

impl From<&Point> for Vec<u64> {
    fn from(val: &Point) -> Self {
        val.0.to_vec()
    }
}

impl Deref for Point {
    type Target = [u64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
