//! Minimal Hilbert curve example: map an index to a point and back.

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // 2D Hilbert curve on an 8x8 grid (3 bits per axis)
    let curve = sfcurve::curve_from_name("hilbert", 2, 8)?;
    println!(
        "{}D Hilbert length: {} cells",
        curve.dimensions(),
        curve.capacity()
    );

    let index = 10;
    let point = curve.decode(index)?;
    println!("Point at index {index}: {:?}", point);

    let round_trip = curve.encode(&point)?;
    println!("Index for {:?}: {round_trip}", point);

    assert_eq!(round_trip, index);

    Ok(())
}
