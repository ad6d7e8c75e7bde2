//! Grid validation shared by curve constructors.

use crate::error::{Error, Result};

/// Largest number of index bits a curve may use. The index type is `u64`
/// and the curve capacity `2^(dimensions * bits)` must itself fit in it.
pub const MAX_INDEX_BITS: u32 = 63;

/// Integer base-2 logarithm of a power of two.
///
/// Returns a configuration error when `n` is zero or not a power of two.
pub fn log2(n: u64) -> Result<u32> {
    if !n.is_power_of_two() {
        return Err(Error::Config(format!("{n} is not a power of 2")));
    }
    Ok(n.trailing_zeros())
}

/// Validated description of a hypercube grid: `dimension` axes of `bits`
/// bits each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// Number of axes.
    dimension: u32,
    /// Bits per axis.
    bits: u32,
}

impl GridSpec {
    /// Build a grid from a dimension count and a per-axis bit width.
    pub fn new(dimension: u32, bits: u32) -> Result<Self> {
        if dimension == 0 || bits == 0 {
            return Err(Error::Config(
                "number of bits and dimension must be greater than 0".into(),
            ));
        }
        Ok(Self { dimension, bits })
    }

    /// Build a grid whose side length `size` must be a power of two.
    pub fn power_of_two(dimension: u32, size: u64) -> Result<Self> {
        if size < 2 {
            return Err(Error::Config(format!(
                "size must be a power of two greater than 1, got {size}"
            )));
        }
        Self::new(dimension, log2(size)?)
    }

    /// Reject grids whose index needs `limit` bits or more.
    pub fn require_index_bits_lt(&self, limit: u32) -> Result<()> {
        match self.index_bits() {
            Some(bits) if bits < limit => Ok(()),
            _ => Err(Error::Config(format!(
                "{} dimensions of {} bits need an index wider than {} bits",
                self.dimension,
                self.bits,
                limit - 1
            ))),
        }
    }

    /// Number of axes.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Bits per axis.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Total index bits, `None` if the product overflows.
    pub fn index_bits(&self) -> Option<u32> {
        self.dimension.checked_mul(self.bits)
    }

    /// Largest coordinate on any axis. Callers must have validated the grid
    /// with [`Self::require_index_bits_lt`] first.
    pub fn dimension_size(&self) -> u64 {
        (1u64 << self.bits) - 1
    }

    /// Largest valid index. Callers must have validated the grid with
    /// [`Self::require_index_bits_lt`] first.
    pub fn length(&self) -> u64 {
        (1u64 << (self.dimension * self.bits)) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_powers() {
        assert_eq!(log2(256), Ok(8));
        assert_eq!(log2(1), Ok(0));
        assert_eq!(log2(1 << 40), Ok(40));
        assert!(matches!(log2(255), Err(Error::Config(_))));
        assert!(matches!(log2(0), Err(Error::Config(_))));
    }

    #[test]
    fn grid_limits() -> Result<()> {
        let g = GridSpec::new(2, 4)?;
        g.require_index_bits_lt(MAX_INDEX_BITS + 1)?;
        assert_eq!(g.dimension_size(), 15);
        assert_eq!(g.length(), 255);

        let g = GridSpec::power_of_two(3, 16)?;
        assert_eq!(g.bits(), 4);
        assert_eq!(g.length(), 4095);

        assert!(GridSpec::new(0, 4).is_err());
        assert!(GridSpec::new(4, 0).is_err());
        assert!(GridSpec::power_of_two(2, 1).is_err());
        assert!(GridSpec::power_of_two(2, 12).is_err());

        // 64 index bits would make the capacity 2^64.
        let wide = GridSpec::new(2, 32)?;
        assert!(wide.require_index_bits_lt(MAX_INDEX_BITS + 1).is_err());
        let widest = GridSpec::new(1, 63)?;
        assert!(widest.require_index_bits_lt(MAX_INDEX_BITS + 1).is_ok());
        assert_eq!(widest.length(), u64::MAX >> 1);
        Ok(())
    }
}
