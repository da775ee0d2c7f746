//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once and is cached; call these instead of
//! `is_x86_feature_detected!` inside hot loops.

use std::sync::OnceLock;

/// CPU feature flags relevant to the complex arithmetic backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Features {
    pub sse3: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,
}

static FEATURES: OnceLock<X86Features> = OnceLock::new();

/// Get cached CPU features (detected once on first call).
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(|| X86Features {
        sse3: is_x86_feature_detected!("sse3"),
        avx: is_x86_feature_detected!("avx"),
        avx2: is_x86_feature_detected!("avx2"),
        fma: is_x86_feature_detected!("fma"),
    })
}

/// Get cached CPU features - stub for non-x86 platforms.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(X86Features::default)
}

/// Check if AVX is available.
#[inline]
pub fn has_avx() -> bool {
    get().avx
}

/// Short name of the widest vector extension we can dispatch to, for logs.
pub fn best_available() -> &'static str {
    let f = get();
    if f.avx2 && f.fma {
        "avx2+fma"
    } else if f.avx {
        "avx"
    } else if f.sse3 {
        "sse3"
    } else {
        "scalar"
    }
}
