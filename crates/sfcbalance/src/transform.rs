//! Mapping item payloads onto curve coordinates.
//!
//! A [`Transform`] turns the opaque [`Value`]s carried by a data item into
//! one coordinate per curve axis. Any
//! `Fn(&[Value], &dyn SpaceCurve) -> Result<Coords>` is a transform, so the
//! two reference transforms here are plain functions.

use sfcurve::{SpaceCurve, point::Coords};
use smallvec::smallvec;

use crate::{
    error::{Error, Result},
    node::Value,
};

/// Half-span of the latitude axis in degrees.
const LAT_STEP: f64 = 90.0;
/// Half-span of the longitude axis in degrees.
const LON_STEP: f64 = 180.0;

/// Derives curve coordinates from an item's values.
pub trait Transform: Send + Sync {
    /// Compute one coordinate per axis of `curve`. Coordinates must not
    /// exceed `curve.dimension_size()`.
    fn transform(&self, values: &[Value], curve: &dyn SpaceCurve) -> Result<Coords>;
}

impl<F> Transform for F
where
    F: Fn(&[Value], &dyn SpaceCurve) -> Result<Coords> + Send + Sync,
{
    fn transform(&self, values: &[Value], curve: &dyn SpaceCurve) -> Result<Coords> {
        self(values, curve)
    }
}

/// Rescale a `(latitude, longitude)` pair in degrees onto a two-dimensional
/// curve.
///
/// Latitude `[-90, 90]` and longitude `[-180, 180]` are mapped linearly onto
/// `[0, dimension_size]`.
pub fn geo(values: &[Value], curve: &dyn SpaceCurve) -> Result<Coords> {
    if values.len() != 2 || curve.dimensions() != 2 {
        return Err(Error::Transform("number of dimensions must be 2".into()));
    }
    let size = curve.dimension_size() as f64;
    let lat = degrees(&values[0], LAT_STEP, "latitude")?;
    let lon = degrees(&values[1], LON_STEP, "longitude")?;
    Ok(smallvec![
        ((lat + LAT_STEP) / (LAT_STEP * 2.0) * size) as u64,
        ((lon + LON_STEP) / (LON_STEP * 2.0) * size) as u64,
    ])
}

/// Read a float in `[-step, step]`.
fn degrees(value: &Value, step: f64, what: &str) -> Result<f64> {
    match *value {
        Value::Float(v) if (-step..=step).contains(&v) => Ok(v),
        Value::Float(v) => Err(Error::Transform(format!(
            "{what} {v} is outside [-{step}, {step}]"
        ))),
        _ => Err(Error::Transform(format!("{what} must be a float"))),
    }
}

/// Bucket a string key onto the curve.
///
/// The key is cut into one chunk per axis (the last axis takes the
/// remainder) and each chunk's character sum, modulo the dimension size,
/// becomes that axis' coordinate. Keys shorter than the dimension count
/// leave the trailing axes at zero.
pub fn key(values: &[Value], curve: &dyn SpaceCurve) -> Result<Coords> {
    let [Value::Str(s)] = values else {
        return Err(Error::Transform("expected exactly one string value".into()));
    };
    let dims = curve.dimensions() as usize;
    let limit = curve.dimension_size();
    let chars: Vec<char> = s.chars().collect();
    let cut = (chars.len() / dims).max(1);

    let mut coords: Coords = smallvec![0; dims];
    let mut rest = chars.as_slice();
    for (axis, coord) in coords.iter_mut().enumerate() {
        if rest.is_empty() {
            break;
        }
        let take = if axis + 1 < dims { cut.min(rest.len()) } else { rest.len() };
        let (chunk, tail) = rest.split_at(take);
        *coord = chunk.iter().map(|&c| u64::from(c)).sum::<u64>() % limit;
        rest = tail;
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use sfcurve::CurveType;

    use super::*;

    fn curve(kind: CurveType, dims: u32, bits: u32) -> Box<dyn SpaceCurve> {
        kind.build(dims, bits).expect("valid curve")
    }

    #[test]
    fn key_buckets() -> Result<()> {
        let v = [Value::from("key")];
        assert_eq!(
            key(&v, &*curve(CurveType::Morton, 3, 4))?.as_slice(),
            &[2, 11, 1]
        );
        assert_eq!(
            key(&v, &*curve(CurveType::Morton, 8, 4))?.as_slice(),
            &[2, 11, 1, 0, 0, 0, 0, 0]
        );
        assert_eq!(key(&v, &*curve(CurveType::Morton, 1, 4))?.as_slice(), &[14]);
        assert_eq!(
            key(&[Value::from("")], &*curve(CurveType::Morton, 2, 4))?.as_slice(),
            &[0, 0]
        );
        Ok(())
    }

    #[test]
    fn key_rejects_bad_values() {
        let c = curve(CurveType::Morton, 1, 4);
        assert!(matches!(key(&[], &*c), Err(Error::Transform(_))));
        assert!(matches!(
            key(&[Value::from(42u64)], &*c),
            Err(Error::Transform(_))
        ));
        assert!(matches!(
            key(&[Value::from("a"), Value::from("b")], &*c),
            Err(Error::Transform(_))
        ));
    }

    #[test]
    fn geo_corners() -> Result<()> {
        let c = curve(CurveType::Hilbert, 2, 8);
        let at = |lat: f64, lon: f64| geo(&[Value::from(lat), Value::from(lon)], &*c);
        assert_eq!(at(90.0, 180.0)?.as_slice(), &[255, 255]);
        assert_eq!(at(-90.0, -180.0)?.as_slice(), &[0, 0]);
        assert_eq!(at(0.0, 0.0)?.as_slice(), &[127, 127]);
        Ok(())
    }

    #[test]
    fn geo_rejects_bad_values() {
        let c = curve(CurveType::Hilbert, 2, 8);
        assert!(geo(&[Value::from(0.0)], &*c).is_err());
        assert!(geo(&[Value::from(91.0), Value::from(0.0)], &*c).is_err());
        assert!(geo(&[Value::from(0.0), Value::from("east")], &*c).is_err());

        let c3 = curve(CurveType::Hilbert, 3, 4);
        assert!(geo(&[Value::from(0.0), Value::from(0.0)], &*c3).is_err());
    }

    #[test]
    fn closures_are_transforms() -> Result<()> {
        let c = curve(CurveType::Morton, 2, 4);
        let t: Box<dyn Transform> =
            Box::new(|_: &[Value], _: &dyn SpaceCurve| -> Result<Coords> { Ok(smallvec![1, 1]) });
        assert_eq!(t.transform(&[], &*c)?.as_slice(), &[1, 1]);
        let f: Box<dyn Transform> = Box::new(key);
        assert_eq!(f.transform(&[Value::from("key")], &*c)?.len(), 2);
        Ok(())
    }
}
