//! The Morton (Z-order) index interleaves the bits of each coordinate.
//!
//! Example with two axes: `010` and `011` interleave to `001101`.

use crate::{
    error,
    ops::SpreadMasks,
    spacecurve::{SpaceCurve, validate_coordinates, validate_decode},
    spec::{GridSpec, MAX_INDEX_BITS},
};

/// Morton curve over 64-bit indices.
#[derive(Debug, Clone)]
pub struct Morton {
    /// Bits per dimension.
    pub bits: u32,
    /// The number of dimensions.
    pub dimension: u32,
    /// Largest valid index, `2^(bits * dimension) - 1`.
    length: u64,
    /// Spreading masks derived for this geometry.
    masks: SpreadMasks,
}

impl Morton {
    /// Construct a Morton curve with `dimension` axes of `bits` bits each.
    pub fn new(dimension: u32, bits: u32) -> error::Result<Self> {
        Self::from_spec(GridSpec::new(dimension, bits)?)
    }

    /// Construct a Morton curve fitting a hypercube of side `size`, which
    /// must be a power of two.
    pub fn from_dimensions(dimension: u32, size: u64) -> error::Result<Self> {
        Self::from_spec(GridSpec::power_of_two(dimension, size)?)
    }

    /// Construct from an already validated grid.
    fn from_spec(spec: GridSpec) -> error::Result<Self> {
        spec.require_index_bits_lt(MAX_INDEX_BITS + 1)?;
        Ok(Self {
            bits: spec.bits(),
            dimension: spec.dimension(),
            length: spec.length(),
            masks: SpreadMasks::new(spec.dimension(), spec.bits()),
        })
    }
}

impl SpaceCurve for Morton {
    fn name(&self) -> &'static str {
        "Morton"
    }

    fn info(&self) -> &'static str {
        "Z-order curve built by interleaving coordinate bits.\n\
        Cheap to compute in both directions; locality is good inside\n\
        aligned blocks but jumps between them."
    }

    fn dimensions(&self) -> u32 {
        self.dimension
    }

    fn bits(&self) -> u32 {
        self.bits
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn encode_in_place(&self, coords: &mut [u64]) -> error::Result<u64> {
        self.encode(coords)
    }

    fn encode(&self, coords: &[u64]) -> error::Result<u64> {
        validate_coordinates(self, coords)?;
        Ok(coords[..self.dimension as usize]
            .iter()
            .enumerate()
            .fold(0, |code, (axis, &c)| code | (self.masks.spread(c) << axis)))
    }

    fn decode_with_buffer<'a>(&self, buf: &'a mut [u64], code: u64) -> error::Result<&'a [u64]> {
        validate_decode(self, buf, code)?;
        let axes = &mut buf[..self.dimension as usize];
        for (axis, slot) in axes.iter_mut().enumerate() {
            *slot = self.masks.compact(code >> axis);
        }
        Ok(axes)
    }
}
