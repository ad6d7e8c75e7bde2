//! Balancer configuration.

use serde::{Deserialize, Serialize};
use sfcurve::{
    CurveType, SpaceCurve,
    spec::{GridSpec, MAX_INDEX_BITS},
};

use crate::error::{Error, Result};

/// Which curve a balancer runs on and how large it is.
///
/// ```
/// use sfcbalance::BalancerConfig;
///
/// let config = BalancerConfig::new(sfcurve::CurveType::Morton, 3, 16);
/// assert_eq!(config.bits()?, 4);
/// assert_eq!(config.build_curve()?.capacity(), 4096);
/// # Ok::<(), sfcbalance::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BalancerConfig {
    /// Curve family.
    #[serde(default)]
    pub curve: CurveType,
    /// Number of curve axes.
    pub dimensions: u32,
    /// Side length of every axis; must be a power of two.
    pub size: u64,
}

impl BalancerConfig {
    /// Create a configuration.
    pub fn new(curve: CurveType, dimensions: u32, size: u64) -> Self {
        Self {
            curve,
            dimensions,
            size,
        }
    }

    /// Bits per axis, `log2(size)`.
    pub fn bits(&self) -> Result<u32> {
        sfcurve::log2(self.size).map_err(Error::Curve)
    }

    /// Check that the configuration describes a constructible curve.
    pub fn validate(&self) -> Result<()> {
        GridSpec::power_of_two(self.dimensions, self.size)
            .and_then(|g| g.require_index_bits_lt(MAX_INDEX_BITS + 1))
            .map_err(Error::Curve)
    }

    /// Construct the configured curve.
    pub fn build_curve(&self) -> Result<Box<dyn SpaceCurve>> {
        self.validate()?;
        self.curve
            .build(self.dimensions, self.bits()?)
            .map_err(Error::Curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate() {
        assert!(BalancerConfig::new(CurveType::Hilbert, 2, 256).validate().is_ok());
        assert!(BalancerConfig::new(CurveType::Morton, 3, 16).validate().is_ok());
        for bad in [
            BalancerConfig::new(CurveType::Hilbert, 2, 255),
            BalancerConfig::new(CurveType::Hilbert, 2, 1),
            BalancerConfig::new(CurveType::Hilbert, 2, 0),
            BalancerConfig::new(CurveType::Hilbert, 0, 16),
            // 8 * 8 index bits do not fit.
            BalancerConfig::new(CurveType::Morton, 8, 256),
        ] {
            assert!(
                matches!(bad.validate(), Err(Error::Curve(_))),
                "{bad:?} should not validate"
            );
            assert!(bad.build_curve().is_err());
        }
    }

    #[test]
    fn build() -> Result<()> {
        let curve = BalancerConfig::new(CurveType::Hilbert, 2, 1024).build_curve()?;
        assert_eq!(curve.name(), "Hilbert");
        assert_eq!(curve.bits(), 10);
        assert_eq!(curve.dimensions(), 2);
        Ok(())
    }
}
