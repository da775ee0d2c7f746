//! AVX implementations of complex vector operations (x86_64).
//!
//! `Complex<f32>` is `#[repr(C)] { re, im }`, so a slice of values is an
//! interleaved `[re, im, re, im, ...]` f32 array and one 256-bit register holds
//! four complex numbers.

use std::arch::x86_64::*;

use crate::Value;

/// `y[i] += alpha * x[i]` using AVX.
///
/// # Safety
/// Caller must ensure AVX is available.
#[target_feature(enable = "avx")]
pub unsafe fn scaled_add(alpha: Value, x: &[Value], y: &mut [Value]) {
    debug_assert_eq!(x.len(), y.len());
    let len = x.len().min(y.len());
    let vec_len = len - len % 4;

    unsafe {
        let alpha_re = _mm256_set1_ps(alpha.re);
        let alpha_im = _mm256_set1_ps(alpha.im);
        let xp = x.as_ptr() as *const f32;
        let yp = y.as_mut_ptr() as *mut f32;

        let mut k = 0;
        while k < vec_len {
            let xv = _mm256_loadu_ps(xp.add(2 * k));
            // (re, im) -> (im, re) within each complex pair
            let swapped = _mm256_permute_ps(xv, 0b1011_0001);
            // even lanes: re*x.re - im*x.im, odd lanes: re*x.im + im*x.re
            let prod = _mm256_addsub_ps(
                _mm256_mul_ps(alpha_re, xv),
                _mm256_mul_ps(alpha_im, swapped),
            );
            let yv = _mm256_loadu_ps(yp.add(2 * k));
            _mm256_storeu_ps(yp.add(2 * k), _mm256_add_ps(yv, prod));
            k += 4;
        }
    }

    for (yi, &xi) in y[vec_len..len].iter_mut().zip(&x[vec_len..len]) {
        *yi += alpha * xi;
    }
}

/// Unconjugated dot product using AVX.
///
/// # Safety
/// Caller must ensure AVX is available.
#[target_feature(enable = "avx")]
pub unsafe fn dot(a: &[Value], b: &[Value]) -> Value {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len().min(b.len());
    let vec_len = len - len % 4;

    // acc_re_b: (a.re*b.re, a.im*b.re), acc_im_b: (a.re*b.im, a.im*b.im)
    let mut lanes_re_b = [0.0f32; 8];
    let mut lanes_im_b = [0.0f32; 8];

    unsafe {
        let ap = a.as_ptr() as *const f32;
        let bp = b.as_ptr() as *const f32;
        let mut acc_re_b = _mm256_setzero_ps();
        let mut acc_im_b = _mm256_setzero_ps();

        let mut k = 0;
        while k < vec_len {
            let av = _mm256_loadu_ps(ap.add(2 * k));
            let bv = _mm256_loadu_ps(bp.add(2 * k));
            acc_re_b = _mm256_add_ps(acc_re_b, _mm256_mul_ps(av, _mm256_moveldup_ps(bv)));
            acc_im_b = _mm256_add_ps(acc_im_b, _mm256_mul_ps(av, _mm256_movehdup_ps(bv)));
            k += 4;
        }

        _mm256_storeu_ps(lanes_re_b.as_mut_ptr(), acc_re_b);
        _mm256_storeu_ps(lanes_im_b.as_mut_ptr(), acc_im_b);
    }

    let mut re = 0.0f32;
    let mut im = 0.0f32;
    for pair in 0..4 {
        re += lanes_re_b[2 * pair] - lanes_im_b[2 * pair + 1];
        im += lanes_re_b[2 * pair + 1] + lanes_im_b[2 * pair];
    }

    let mut sum = Value::new(re, im);
    for (&ai, &bi) in a[vec_len..len].iter().zip(&b[vec_len..len]) {
        sum += ai * bi;
    }
    sum
}
