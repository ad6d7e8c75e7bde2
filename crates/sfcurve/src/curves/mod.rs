/// Skilling's transpose-based Hilbert curve.
pub mod hilbert;
/// Bit-interleaving Morton (Z-order) curve.
pub mod morton;
