//! Error types for benchmark configuration and verification.

use thiserror::Error;

use crate::benchmark::Stage;

/// Errors reported by the benchmark driver.
///
/// The gridding kernels themselves never return errors; everything here is
/// detected before or after a kernel runs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown {option} '{value}'")]
    UnknownOption { option: &'static str, value: String },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Grid of size {grid_size} cannot hold a footprint of {taps} taps")]
    GridTooSmall { grid_size: usize, taps: usize },

    #[error(
        "Sample {index} footprint at row {row}, col {col} leaves the {grid_size}x{grid_size} grid or the kernel table"
    )]
    FootprintOutOfBounds {
        index: usize,
        row: usize,
        col: usize,
        grid_size: usize,
    },

    #[error("{stage} verification failed at index {index}: expected {expected}, got {actual}")]
    VerificationFailed {
        stage: Stage,
        index: usize,
        expected: f32,
        actual: f32,
    },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_message() {
        let err = Error::UnknownOption {
            option: "execution",
            value: "turbo".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown execution 'turbo'");
    }

    #[test]
    fn test_verification_failed_message() {
        let err = Error::VerificationFailed {
            stage: Stage::Gridding,
            index: 42,
            expected: 1.5,
            actual: 2.0,
        };
        assert_eq!(
            err.to_string(),
            "gridding verification failed at index 42: expected 1.5, got 2"
        );
    }

    #[test]
    fn test_grid_too_small_message() {
        let err = Error::GridTooSmall { grid_size: 64, taps: 131 };
        assert_eq!(err.to_string(), "Grid of size 64 cannot hold a footprint of 131 taps");
    }
}
