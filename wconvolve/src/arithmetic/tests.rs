//! Tests for complex vector operations.

use super::*;

fn ramp(len: usize, phase: f32) -> Vec<Value> {
    (0..len)
        .map(|k| {
            let t = k as f32 * 0.37 + phase;
            Value::new(t.cos() * (1.0 + k as f32 * 0.1), t.sin() - 0.25)
        })
        .collect()
}

fn assert_close(a: Value, b: Value, tol: f32) {
    assert!(
        (a.re - b.re).abs() < tol && (a.im - b.im).abs() < tol,
        "{a} != {b} (tol {tol})"
    );
}

// ---------------------------------------------------------------------------
// scalar reference
// ---------------------------------------------------------------------------

#[test]
fn test_scalar_scaled_add_known_values() {
    let alpha = Value::new(2.0, -1.0);
    let x = [Value::new(1.0, 1.0), Value::new(0.0, 3.0)];
    let mut y = [Value::new(10.0, 0.0), Value::new(0.0, 0.0)];
    scalar::scaled_add(alpha, &x, &mut y);
    // (2 - i)(1 + i) = 3 + i, (2 - i)(3i) = 3 + 6i
    assert_eq!(y, [Value::new(13.0, 1.0), Value::new(3.0, 6.0)]);
}

#[test]
fn test_scalar_dot_is_unconjugated() {
    let a = [Value::new(0.0, 1.0), Value::new(2.0, 0.0)];
    let b = [Value::new(0.0, 1.0), Value::new(1.0, 1.0)];
    // i * i + 2 * (1 + i) = -1 + 2 + 2i
    assert_eq!(scalar::dot(&a, &b), Value::new(1.0, 2.0));
}

#[test]
fn test_scalar_empty() {
    let mut y: Vec<Value> = vec![];
    scalar::scaled_add(Value::new(1.0, 0.0), &[], &mut y);
    assert_eq!(scalar::dot(&[], &[]), Value::default());
}

// ---------------------------------------------------------------------------
// SIMD vs scalar
// ---------------------------------------------------------------------------

#[test]
fn test_simd_scaled_add_matches_scalar() {
    let alpha = Value::new(0.7, -1.3);
    for len in [0, 1, 3, 4, 5, 8, 13, 65, 131] {
        let x = ramp(len, 0.1);
        let mut y_scalar = ramp(len, 2.0);
        let mut y_simd = y_scalar.clone();

        ScalarArithmetic.scaled_add(alpha, &x, &mut y_scalar);
        SimdArithmetic.scaled_add(alpha, &x, &mut y_simd);

        for (s, v) in y_scalar.iter().zip(&y_simd) {
            assert_close(*s, *v, 1e-5);
        }
    }
}

#[test]
fn test_simd_dot_matches_scalar() {
    for len in [0, 1, 3, 4, 7, 8, 13, 65, 131] {
        let a = ramp(len, 0.3);
        let b = ramp(len, -1.1);
        let expected = ScalarArithmetic.dot(&a, &b);
        let actual = SimdArithmetic.dot(&a, &b);
        let tol = 1e-5 * (1.0 + expected.norm());
        assert_close(expected, actual, tol);
    }
}

#[test]
fn test_simd_scaled_add_real_alpha() {
    let x = ramp(12, 0.0);
    let mut y = vec![Value::default(); 12];
    SimdArithmetic.scaled_add(Value::new(1.0, 0.0), &x, &mut y);
    for (a, b) in x.iter().zip(&y) {
        assert_close(*a, *b, 1e-6);
    }
}

// ---------------------------------------------------------------------------
// Arithmetic selection
// ---------------------------------------------------------------------------

#[test]
fn test_arithmetic_variants_agree() {
    let a = ramp(37, 0.5);
    let b = ramp(37, 1.5);
    let scalar = Arithmetic::Scalar.dot(&a, &b);
    let auto = Arithmetic::Auto.dot(&a, &b);
    assert_close(scalar, auto, 1e-4);
}

#[test]
fn test_arithmetic_parse_and_display() {
    assert_eq!("scalar".parse::<Arithmetic>().unwrap(), Arithmetic::Scalar);
    assert_eq!("AUTO".parse::<Arithmetic>().unwrap(), Arithmetic::Auto);
    assert_eq!("simd".parse::<Arithmetic>().unwrap(), Arithmetic::Auto);
    assert!("blas".parse::<Arithmetic>().is_err());
    assert_eq!(Arithmetic::Scalar.to_string(), "scalar");
    assert_eq!(Arithmetic::Scalar.resolved_name(), "scalar");
}

#[test]
fn test_trait_object_usable() {
    let backends: [&dyn ComplexArithmetic; 2] = [&ScalarArithmetic, &SimdArithmetic];
    let x = ramp(9, 0.0);
    for backend in backends {
        let mut y = vec![Value::default(); 9];
        backend.scaled_add(Value::new(2.0, 0.0), &x, &mut y);
        assert_close(y[4], x[4] * 2.0, 1e-5);
    }
}
