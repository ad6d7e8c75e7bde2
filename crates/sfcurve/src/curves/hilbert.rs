//! The Hilbert index is expressed as an array of transposed bits.
//!
//! Example: 5 bits for each of n=3 coordinates. The 15-bit Hilbert integer
//! `A B C D E F G H I J K L M N O` is stored as its transpose:
//!
//! ```text
//! X[0] = A D G J M
//! X[1] = B E H K N
//! X[2] = C F I L O
//!        high  low
//! ```
//!
//! Derived from John Skilling, "Programming the Hilbert curve", AIP
//! Conference Proceedings 707 (2004).

use crate::{
    error, ops,
    spacecurve::{SpaceCurve, validate_coordinates, validate_decode},
    spec::{GridSpec, MAX_INDEX_BITS},
};

/// An implementation of the Hilbert curve over 64-bit indices.
#[derive(Debug, Clone)]
pub struct Hilbert {
    /// Bits per dimension (the curve's order).
    pub bits: u32,
    /// The number of dimensions of the Hilbert curve.
    pub dimension: u32,
    /// Largest valid index, `2^(bits * dimension) - 1`.
    length: u64,
}

impl Hilbert {
    /// Construct a Hilbert curve with `dimension` axes of `bits` bits each.
    pub fn new(dimension: u32, bits: u32) -> error::Result<Self> {
        Self::from_spec(GridSpec::new(dimension, bits)?)
    }

    /// Construct a Hilbert curve to precisely fit a hypercube with a defined
    /// number of dimensions, and a set size in each dimension. The size must
    /// be a power of two or the result is an error.
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
        })
    }
}

/// Convert coordinates into Skilling's transposed Hilbert form in place.
fn axes_to_transpose(x: &mut [u64], bits: u32) {
    let n = x.len();
    let m = 1u64 << (bits - 1);

    // Inverse undo excess work
    let mut q = m;
    while q > 1 {
        let p = q - 1;
        for i in 0..n {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q >>= 1;
    }

    // Gray encode
    for i in 1..n {
        x[i] ^= x[i - 1];
    }
    let mut t = 0;
    let mut q = m;
    while q > 1 {
        if x[n - 1] & q != 0 {
            t ^= q - 1;
        }
        q >>= 1;
    }
    for v in x.iter_mut() {
        *v ^= t;
    }
}

/// Convert Skilling's transposed form back into coordinates in place.
fn transpose_to_axes(x: &mut [u64], bits: u32) {
    let n = x.len();

    // Gray decode by H ^ (H/2)
    let t = x[n - 1] >> 1;
    for i in (1..n).rev() {
        x[i] ^= x[i - 1];
    }
    x[0] ^= t;

    // Undo excess work
    for plane in 1..bits {
        let q = 1u64 << plane;
        let p = q - 1;
        for i in (0..n).rev() {
            if x[i] & q != 0 {
                x[0] ^= p;
            } else {
                let t = (x[0] ^ x[i]) & p;
                x[0] ^= t;
                x[i] ^= t;
            }
        }
    }
}

impl SpaceCurve for Hilbert {
    fn name(&self) -> &'static str {
        "Hilbert"
    }

    fn info(&self) -> &'static str {
        "Classic continuous space-filling curve with excellent locality.\n\
        Consecutive indices are always unit-distance neighbours, so ranges\n\
        of the curve map onto compact regions of space."
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
        validate_coordinates(self, coords)?;
        let axes = &mut coords[..self.dimension as usize];
        axes_to_transpose(axes, self.bits);
        Ok(ops::pack_transposed(self.bits, axes))
    }

    fn decode_with_buffer<'a>(&self, buf: &'a mut [u64], code: u64) -> error::Result<&'a [u64]> {
        validate_decode(self, buf, code)?;
        let axes = &mut buf[..self.dimension as usize];
        ops::unpack_transposed(self.bits, code, axes);
        transpose_to_axes(axes, self.bits);
        Ok(axes)
    }
}
