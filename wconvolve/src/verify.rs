//! Comparison of serial and parallel kernel outputs.

use crate::Value;

/// Largest accepted difference between real parts.
pub const TOLERANCE: f32 = 1e-5;

/// First element whose real part differs by more than [`TOLERANCE`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub expected: f32,
    pub actual: f32,
}

/// Find the first real-part mismatch between `expected` and `actual`.
///
/// Only the real parts are compared. Both slices must have the same length.
pub fn first_mismatch(expected: &[Value], actual: &[Value]) -> Option<Mismatch> {
    debug_assert_eq!(expected.len(), actual.len());
    expected
        .iter()
        .zip(actual)
        .position(|(e, a)| {
            let diff = (e.re - a.re).abs();
            diff.is_nan() || diff > TOLERANCE
        })
        .map(|index| Mismatch {
            index,
            expected: expected[index].re,
            actual: actual[index].re,
        })
}
