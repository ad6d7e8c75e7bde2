use std::fmt::Debug;

use smallvec::smallvec;

use crate::{
    error::{Error, Result},
    point::{Coords, Point},
};

/// A bijection between an n-dimensional grid and a one-dimensional index.
///
/// Indices are `u64`; curves refuse configurations whose capacity
/// (`2^(dimensions * bits)`) does not fit.
pub trait SpaceCurve: Debug + Send + Sync {
    /// Short display name of the curve.
    fn name(&self) -> &'static str;

    /// Longer human-readable description of the curve.
    fn info(&self) -> &'static str;

    /// Number of dimensions.
    fn dimensions(&self) -> u32;

    /// Bits per dimension.
    fn bits(&self) -> u32;

    /// Largest coordinate value on any axis, `2^bits - 1`.
    fn dimension_size(&self) -> u64 {
        (1u64 << self.bits()) - 1
    }

    /// Largest index on the curve, `2^(dimensions * bits) - 1`.
    fn length(&self) -> u64;

    /// Number of distinct indices, `length() + 1`.
    fn capacity(&self) -> u64 {
        self.length() + 1
    }

    /// Encode coordinates, using `coords` as scratch space. The contents of
    /// `coords` are unspecified afterwards.
    fn encode_in_place(&self, coords: &mut [u64]) -> Result<u64>;

    /// Encode coordinates into a curve index.
    fn encode(&self, coords: &[u64]) -> Result<u64> {
        let mut scratch: Coords = coords.iter().copied().collect();
        self.encode_in_place(&mut scratch)
    }

    /// Decode `code` into `buf`, returning the filled prefix.
    fn decode_with_buffer<'a>(&self, buf: &'a mut [u64], code: u64) -> Result<&'a [u64]>;

    /// Decode a curve index into a freshly allocated point.
    fn decode(&self, code: u64) -> Result<Point> {
        let mut coords: Coords = smallvec![0; self.dimensions() as usize];
        self.decode_with_buffer(&mut coords, code)?;
        Ok(Point::new_with_dimension(self.dimensions(), coords))
    }
}

/// Shared argument checks for [`SpaceCurve::encode_in_place`].
pub fn validate_coordinates(curve: &dyn SpaceCurve, coords: &[u64]) -> Result<()> {
    let dimensions = curve.dimensions();
    if coords.len() < dimensions as usize {
        return Err(Error::Dimensions {
            got: coords.len(),
            dimensions,
        });
    }
    let limit = curve.dimension_size();
    match coords.iter().find(|&&c| c > limit) {
        Some(&value) => Err(Error::Coordinate { value, limit }),
        None => Ok(()),
    }
}

/// Shared argument checks for [`SpaceCurve::decode_with_buffer`].
pub fn validate_decode(curve: &dyn SpaceCurve, buf: &[u64], code: u64) -> Result<()> {
    let dimensions = curve.dimensions();
    if buf.len() < dimensions as usize {
        return Err(Error::Buffer {
            got: buf.len(),
            dimensions,
        });
    }
    let limit = curve.length();
    if code > limit {
        return Err(Error::Code { code, limit });
    }
    Ok(())
}
