//! wconvolve - W-projection convolutional gridding.
//!
//! Resamples irregularly positioned visibility samples onto a uniform grid
//! (gridding) and back (degridding) through a precomputed, oversampled bank of
//! w-dependent convolution kernels.
//!
//! The pipeline is:
//! 1. [`KernelTableBuilder`] builds the kernel bank and derives support and
//!    w-cell size.
//! 2. [`build_offset_index`] maps every (sample, channel) to a grid anchor and
//!    a base offset into the kernel bank.
//! 3. [`gridding`] scatters values onto a [`Grid`]; [`degridding`] gathers them
//!    back. Both come in serial and thread-parallel form.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wconvolve::{BenchmarkConfig, Execution};
//!
//! let config = BenchmarkConfig::default()
//!     .with_samples(10_000)
//!     .with_execution(Execution::Verify);
//! let report = wconvolve::run(&config)?;
//! println!("support = {}", report.support);
//! ```

pub mod arithmetic;
pub mod benchmark;
pub mod config;
pub mod degridding;
mod error;
pub mod grid;
pub mod gridding;
pub mod kernel_table;
pub mod offsets;
pub mod strategy;
pub mod synthetic;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

use num_complex::Complex32;

/// Complex sample, grid and kernel value.
pub type Value = Complex32;

/// Coordinate type for u, v, w and frequencies.
pub type Coord = f64;

// ============================================================================
// Core
// ============================================================================

pub use arithmetic::{Arithmetic, ComplexArithmetic, ScalarArithmetic, SimdArithmetic};
pub use degridding::{degrid_parallel, degrid_serial};
pub use grid::Grid;
pub use gridding::{grid_parallel, grid_serial};
pub use kernel_table::{KernelTable, KernelTableBuilder, OVERSAMPLE, SupportPolicy, build_kernel_table};
pub use offsets::{GridOffset, IndexGeometry, OffsetIndex, build_offset_index};
pub use strategy::Kernel;

// ============================================================================
// Driver
// ============================================================================

pub use benchmark::{BenchmarkReport, Stage, StageTiming, run};
pub use config::{BenchmarkConfig, Execution, Operations};
pub use error::Error;
pub use synthetic::{SampleGenerator, Samples, channel_frequencies};
