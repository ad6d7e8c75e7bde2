//! Curve metadata and constructors.

use std::{fmt, str::FromStr};

use crate::{
    SpaceCurve,
    curves::{hilbert::Hilbert, morton::Morton},
    error::{Error, Result},
    spec,
};

/// Names accepted by [`construct`] and [`CurveType::from_str`].
pub const CURVE_NAMES: &[&str] = &["hilbert", "morton"];

/// The curve families available to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CurveType {
    /// Skilling's Hilbert curve.
    #[default]
    Hilbert,
    /// Bit-interleaved Z-order curve.
    Morton,
}

impl CurveType {
    /// Build a curve of this type with `dimensions` axes of `bits` bits.
    pub fn build(self, dimensions: u32, bits: u32) -> Result<Box<dyn SpaceCurve>> {
        Ok(match self {
            Self::Hilbert => Box::new(Hilbert::new(dimensions, bits)?),
            Self::Morton => Box::new(Morton::new(dimensions, bits)?),
        })
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hilbert => write!(f, "Hilbert"),
            Self::Morton => write!(f, "Morton"),
        }
    }
}

impl FromStr for CurveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hilbert" => Ok(Self::Hilbert),
            "morton" | "zorder" => Ok(Self::Morton),
            _ => Err(Error::UnknownCurve(s.to_string())),
        }
    }
}

/// Construct a curve by name with side length `size` (a power of two).
pub fn construct(name: &str, dimension: u32, size: u64) -> Result<Box<dyn SpaceCurve>> {
    let kind: CurveType = name.parse()?;
    kind.build(dimension, spec::log2(size)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() -> Result<()> {
        for name in CURVE_NAMES {
            let kind: CurveType = name.parse()?;
            assert_eq!(kind.to_string().to_lowercase(), *name);
        }
        assert_eq!("ZOrder".parse::<CurveType>()?, CurveType::Morton);
        assert!(matches!(
            "peano".parse::<CurveType>(),
            Err(Error::UnknownCurve(_))
        ));
        Ok(())
    }

    #[test]
    fn construct_by_name() -> Result<()> {
        let c = construct("morton", 3, 16)?;
        assert_eq!(c.name(), "Morton");
        assert_eq!(c.bits(), 4);
        assert_eq!(c.length(), 4095);

        let c = CurveType::Hilbert.build(2, 4)?;
        assert_eq!(c.capacity(), 256);

        assert!(matches!(construct("hilbert", 2, 255), Err(Error::Config(_))));
        Ok(())
    }
}
