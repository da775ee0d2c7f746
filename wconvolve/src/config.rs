//! Benchmark configuration.

use serde::Serialize;

use crate::error::Error;
use crate::kernel_table::SupportPolicy;
use crate::{Arithmetic, Coord};

/// Which kernels a benchmark run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operations {
    Gridding,
    Degridding,
    #[default]
    Both,
}

impl Operations {
    pub fn gridding(&self) -> bool {
        matches!(self, Operations::Gridding | Operations::Both)
    }

    pub fn degridding(&self) -> bool {
        matches!(self, Operations::Degridding | Operations::Both)
    }
}

impl std::fmt::Display for Operations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operations::Gridding => write!(f, "gridding"),
            Operations::Degridding => write!(f, "degridding"),
            Operations::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for Operations {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gridding" | "grid" => Ok(Operations::Gridding),
            "degridding" | "degrid" => Ok(Operations::Degridding),
            "both" | "all" => Ok(Operations::Both),
            _ => Err(Error::UnknownOption {
                option: "operations",
                value: s.to_string(),
            }),
        }
    }
}

/// Which kernel implementations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Serial,
    Parallel,
    /// Run both and compare the parallel result against the serial one.
    #[default]
    Verify,
}

impl Execution {
    pub fn serial(&self) -> bool {
        matches!(self, Execution::Serial | Execution::Verify)
    }

    pub fn parallel(&self) -> bool {
        matches!(self, Execution::Parallel | Execution::Verify)
    }
}

impl std::fmt::Display for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Execution::Serial => write!(f, "serial"),
            Execution::Parallel => write!(f, "parallel"),
            Execution::Verify => write!(f, "verify"),
        }
    }
}

impl std::str::FromStr for Execution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(Execution::Serial),
            "parallel" => Ok(Execution::Parallel),
            "verify" => Ok(Execution::Verify),
            _ => Err(Error::UnknownOption {
                option: "execution",
                value: s.to_string(),
            }),
        }
    }
}

/// Parameters of a gridding benchmark run.
///
/// # Examples
///
/// ```ignore
/// use wconvolve::{BenchmarkConfig, Execution};
///
/// let config = BenchmarkConfig::default()
///     .with_samples(10_000)
///     .with_channels(4)
///     .with_execution(Execution::Parallel);
/// let report = wconvolve::run(&config)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    /// Number of synthetic samples.
    pub samples: usize,
    /// Number of w-projection planes.
    pub w_planes: usize,
    /// Number of spectral channels.
    pub channels: usize,
    /// Grid cell size in wavelengths before `fov_factor` is applied.
    pub cell_size: Coord,
    /// Multiplies `cell_size`; larger values shrink the field of view.
    pub fov_factor: Coord,
    /// Grid side length in cells.
    pub grid_size: usize,
    /// Maximum baseline in metres.
    pub baseline: Coord,
    /// Seed of the synthetic sample generator.
    pub seed: u64,
    pub operations: Operations,
    pub execution: Execution,
    pub arithmetic: Arithmetic,
    pub support: SupportPolicy,
    /// Worker threads for parallel kernels (`None` = rayon global pool).
    pub threads: Option<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            samples: 160_000,
            w_planes: 33,
            channels: 1,
            cell_size: 5.0,
            fov_factor: 1.0,
            grid_size: 4096,
            baseline: 2000.0,
            seed: 1,
            operations: Operations::default(),
            execution: Execution::default(),
            arithmetic: Arithmetic::default(),
            support: SupportPolicy::default(),
            threads: None,
        }
    }
}

impl BenchmarkConfig {
    /// Cell size actually used for the grid.
    pub fn effective_cell_size(&self) -> Coord {
        self.cell_size * self.fov_factor
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_w_planes(mut self, w_planes: usize) -> Self {
        self.w_planes = w_planes;
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_cell_size(mut self, cell_size: Coord) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_fov_factor(mut self, fov_factor: Coord) -> Self {
        self.fov_factor = fov_factor;
        self
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_baseline(mut self, baseline: Coord) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_operations(mut self, operations: Operations) -> Self {
        self.operations = operations;
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_arithmetic(mut self, arithmetic: Arithmetic) -> Self {
        self.arithmetic = arithmetic;
        self
    }

    pub fn with_support(mut self, support: SupportPolicy) -> Self {
        self.support = support;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Check counts and physical parameters.
    ///
    /// Grid sizing against the derived support is checked later, once the
    /// kernel table exists.
    pub fn validate(&self) -> Result<(), Error> {
        let counts = [
            ("samples", self.samples),
            ("w_planes", self.w_planes),
            ("channels", self.channels),
            ("grid_size", self.grid_size),
            ("threads", self.threads.unwrap_or(1)),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(Error::NonPositive { name, value: 0.0 });
            }
        }

        let lengths = [
            ("cell_size", self.cell_size),
            ("fov_factor", self.fov_factor),
            ("baseline", self.baseline),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::NonPositive { name, value });
            }
        }

        Ok(())
    }
}
