//! Scalar (non-SIMD) complex vector operations.

use crate::Value;

/// `y[i] += alpha * x[i]` over the common length of `x` and `y`.
#[inline]
pub fn scaled_add(alpha: Value, x: &[Value], y: &mut [Value]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Unconjugated dot product over the common length of `a` and `b`.
#[inline]
pub fn dot(a: &[Value], b: &[Value]) -> Value {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .fold(Value::default(), |acc, (&ai, &bi)| acc + ai * bi)
}
