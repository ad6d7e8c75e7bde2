//! Support operations for curve calculation.

use smallvec::SmallVec;

/// Bitmask with `width` least-significant bits set. Saturates at 64 bits.
#[inline]
pub const fn bitmask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// One stage of a bit-spreading transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadStep {
    /// Distance travelled by the bits that move in this stage.
    pub shift: u32,
    /// Positions of bits that stay put during this stage.
    pub stay: u64,
    /// Positions occupied by moving bits once the stage has run.
    pub moved: u64,
}

/// Precomputed "magic number" masks that spread the low `bits` bits of a
/// word so that consecutive bits end up `stride` positions apart, and the
/// inverse compaction.
///
/// Bit `b` has to travel `b * (stride - 1)` positions. The travel distance
/// is decomposed into powers of two, largest first, so each stage moves a
/// subset of bits by a single shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadMasks {
    /// Mask applied to the input before spreading.
    input: u64,
    /// Positions of every bit after spreading.
    output: u64,
    /// Stages ordered from the largest shift to the smallest.
    steps: SmallVec<[SpreadStep; 8]>,
}

impl SpreadMasks {
    /// Derive the masks for `bits`-wide values spread with `stride`.
    ///
    /// Requires `stride * bits <= 64`.
    pub fn new(stride: u32, bits: u32) -> Self {
        debug_assert!(stride >= 1 && bits >= 1);
        debug_assert!(u64::from(stride) * u64::from(bits) <= 64);

        let max_distance = (stride - 1) * (bits - 1);
        let mut shift = match max_distance {
            0 => 0,
            d => 1 << (31 - d.leading_zeros()),
        };

        let mut steps = SmallVec::new();
        while shift > 0 {
            let mut stay = 0u64;
            let mut moved = 0u64;
            for bit in 0..bits {
                let distance = bit * (stride - 1);
                let position = bit + (distance & !(shift - 1));
                if distance & shift != 0 {
                    moved |= 1 << position;
                } else {
                    stay |= 1 << position;
                }
            }
            if moved != 0 {
                steps.push(SpreadStep { shift, stay, moved });
            }
            shift >>= 1;
        }

        let output = (0..bits).fold(0u64, |acc, bit| acc | (1 << (bit * stride)));
        Self {
            input: bitmask(bits),
            output,
            steps,
        }
    }

    /// Spread the low bits of `x`.
    #[inline]
    pub fn spread(&self, x: u64) -> u64 {
        self.steps.iter().fold(x & self.input, |acc, step| {
            (acc & step.stay) | ((acc << step.shift) & step.moved)
        })
    }

    /// Gather spread bits of `x` back into a contiguous value.
    #[inline]
    pub fn compact(&self, x: u64) -> u64 {
        self.steps.iter().rev().fold(x & self.output, |acc, step| {
            (acc & step.stay) | ((acc & step.moved) >> step.shift)
        })
    }

    /// The stages of the transform, largest shift first.
    pub fn steps(&self) -> &[SpreadStep] {
        &self.steps
    }
}

/// Pack a transposed Hilbert index into a scalar.
///
/// Bit planes are read from the most significant down; within a plane axis
/// 0 contributes the most significant bit.
#[inline]
pub fn pack_transposed(bits: u32, axes: &[u64]) -> u64 {
    let mut code = 0u64;
    for plane in (0..bits).rev() {
        for axis in axes {
            code = (code << 1) | ((axis >> plane) & 1);
        }
    }
    code
}

/// Inverse of [`pack_transposed`]: scatter `code` into `axes`, overwriting
/// their contents.
#[inline]
pub fn unpack_transposed(bits: u32, code: u64, axes: &mut [u64]) {
    axes.iter_mut().for_each(|a| *a = 0);
    let dims = axes.len() as u32;
    let width = dims * bits;
    for pos in 0..width {
        if (code >> pos) & 1 == 1 {
            let axis = (width - pos - 1) % dims;
            let plane = pos / dims;
            axes[axis as usize] |= 1 << plane;
        }
    }
}

/// Interleave coordinates bit by bit, least significant plane first. Slow
/// reference used to check the mask-based Morton path.
pub fn interleave_lsb(coords: &[u64], bits: u32) -> u64 {
    let dimension = coords.len() as u32;
    let mut value = 0u64;
    for bit in 0..bits {
        for (dim, coord) in coords.iter().enumerate() {
            let bit_val = (coord >> bit) & 1;
            value |= bit_val << (bit * dimension + dim as u32);
        }
    }
    value
}
