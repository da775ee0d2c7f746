//! Complex vector primitives used by the gridding kernels.
//!
//! The kernels are written against [`ComplexArithmetic`], so the scaled-add and
//! dot-product can be swapped without touching the kernel loops:
//! - [`ScalarArithmetic`] is the portable reference.
//! - [`SimdArithmetic`] dispatches at runtime to AVX on x86_64 and falls back
//!   to scalar elsewhere.
//! - [`Arithmetic`] selects one of the two from configuration.

use crate::Value;

pub mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx;

#[cfg(test)]
mod tests;

/// Complex vector operations on equally long slices.
pub trait ComplexArithmetic: Sync {
    /// `y[i] += alpha * x[i]`.
    fn scaled_add(&self, alpha: Value, x: &[Value], y: &mut [Value]);

    /// Unconjugated dot product `sum(a[i] * b[i])`.
    fn dot(&self, a: &[Value], b: &[Value]) -> Value;
}

/// Portable scalar implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarArithmetic;

impl ComplexArithmetic for ScalarArithmetic {
    #[inline]
    fn scaled_add(&self, alpha: Value, x: &[Value], y: &mut [Value]) {
        scalar::scaled_add(alpha, x, y)
    }

    #[inline]
    fn dot(&self, a: &[Value], b: &[Value]) -> Value {
        scalar::dot(a, b)
    }
}

/// SIMD implementation with runtime CPU feature dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimdArithmetic;

impl ComplexArithmetic for SimdArithmetic {
    #[inline]
    fn scaled_add(&self, alpha: Value, x: &[Value], y: &mut [Value]) {
        #[cfg(target_arch = "x86_64")]
        {
            if x.len() >= 4 && common::cpu_features::has_avx() {
                unsafe { avx::scaled_add(alpha, x, y) };
                return;
            }
        }
        scalar::scaled_add(alpha, x, y)
    }

    #[inline]
    fn dot(&self, a: &[Value], b: &[Value]) -> Value {
        #[cfg(target_arch = "x86_64")]
        {
            if a.len() >= 4 && common::cpu_features::has_avx() {
                return unsafe { avx::dot(a, b) };
            }
        }
        scalar::dot(a, b)
    }
}

/// Arithmetic backend chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arithmetic {
    /// Always use the scalar reference.
    Scalar,
    /// Use the widest vector unit available.
    #[default]
    Auto,
}

impl Arithmetic {
    /// Name of the implementation that will actually run.
    pub fn resolved_name(&self) -> &'static str {
        match self {
            Arithmetic::Scalar => "scalar",
            Arithmetic::Auto => {
                if cfg!(target_arch = "x86_64") && common::cpu_features::has_avx() {
                    "avx"
                } else {
                    "scalar"
                }
            }
        }
    }
}

impl ComplexArithmetic for Arithmetic {
    #[inline]
    fn scaled_add(&self, alpha: Value, x: &[Value], y: &mut [Value]) {
        match self {
            Arithmetic::Scalar => ScalarArithmetic.scaled_add(alpha, x, y),
            Arithmetic::Auto => SimdArithmetic.scaled_add(alpha, x, y),
        }
    }

    #[inline]
    fn dot(&self, a: &[Value], b: &[Value]) -> Value {
        match self {
            Arithmetic::Scalar => ScalarArithmetic.dot(a, b),
            Arithmetic::Auto => SimdArithmetic.dot(a, b),
        }
    }
}

impl std::fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arithmetic::Scalar => write!(f, "scalar"),
            Arithmetic::Auto => write!(f, "auto"),
        }
    }
}

impl std::str::FromStr for Arithmetic {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Arithmetic::Scalar),
            "auto" | "simd" => Ok(Arithmetic::Auto),
            _ => Err(crate::Error::UnknownOption {
                option: "arithmetic",
                value: s.to_string(),
            }),
        }
    }
}
