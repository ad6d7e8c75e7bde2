//! Space-filling curve codecs over 64-bit indices.
//!
//! A curve maps an n-dimensional coordinate vector to a scalar index and
//! back. Both directions are fallible: coordinates and indices are checked
//! against the curve's geometry instead of being silently wrapped.
//!
//! # Supported Curves
//!
//! - Hilbert (Skilling's transpose algorithm)
//! - Morton / Z-order (mask-based bit interleaving)
//!
//! ```
//! use sfcurve::{SpaceCurve, curves::morton::Morton};
//!
//! let curve = Morton::new(2, 4)?;
//! assert_eq!(curve.encode(&[8, 4])?, 96);
//! assert_eq!(curve.decode(96)?.as_slice(), &[8, 4]);
//! # Ok::<(), sfcurve::error::Error>(())
//! ```

/// Implementations of specific space‑filling curves.
pub mod curves;
/// Error types used across the crate.
pub mod error;
/// Internal bit operations shared by curve implementations.
#[doc(hidden)]
pub mod ops;
/// N‑dimensional points and helpers.
pub mod point;
/// The `SpaceCurve` trait and related utilities.
mod spacecurve;
/// Grid specification helpers shared across curves.
pub mod spec;

pub use crate::{
    registry::CurveType,
    spacecurve::SpaceCurve,
    spec::log2,
};

/// Central registry of curve metadata and constructors.
pub mod registry;

/// Construct a curve by name with the requested dimensionality and side
/// length.
///
/// Returns an error if the combination is invalid or the name is unknown.
pub fn curve_from_name(
    name: &str,
    dimension: u32,
    size: u64,
) -> error::Result<Box<dyn SpaceCurve + 'static>> {
    registry::construct(name, dimension, size)
}
