//! End-to-end gridding benchmark.
//!
//! [`run`] synthesises samples, builds the kernel table and offset index, then
//! times the selected gridding and degridding kernels. With
//! [`Execution::Verify`] both serial and parallel kernels run and the parallel
//! output is checked against the serial one.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{BenchmarkConfig, Execution};
use crate::error::Error;
use crate::grid::Grid;
use crate::kernel_table::{KernelTable, KernelTableBuilder};
use crate::offsets::{IndexGeometry, OffsetIndex, build_offset_index};
use crate::strategy::Kernel;
use crate::synthetic::{SampleGenerator, Samples, channel_frequencies};
use crate::verify::first_mismatch;
use crate::{Coord, Value};


/// A timed phase of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    KernelTable,
    OffsetIndex,
    Gridding,
    Degridding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::KernelTable => write!(f, "kernel table"),
            Stage::OffsetIndex => write!(f, "offset index"),
            Stage::Gridding => write!(f, "gridding"),
            Stage::Degridding => write!(f, "degridding"),
        }
    }
}

/// Wall time and throughput of one stage.
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    /// Kernel implementation; `None` for setup stages.
    pub kernel: Option<Kernel>,
    pub workers: usize,
    pub seconds: f64,
    /// Microseconds per (sample, channel) pair.
    pub us_per_sample: f64,
    /// Nanoseconds per kernel tap applied.
    pub ns_per_point: f64,
    /// Million kernel taps applied per second.
    pub mpoints_per_second: f64,
}

impl StageTiming {
    fn new(
        stage: Stage,
        kernel: Option<Kernel>,
        workers: usize,
        elapsed: Duration,
        samples: usize,
        points: u64,
    ) -> Self {
        let seconds = elapsed.as_secs_f64();
        let per = |count: f64, unit: f64| if count > 0.0 { seconds * unit / count } else { 0.0 };
        let mpoints_per_second = if seconds > 0.0 {
            points as f64 / seconds / 1e6
        } else {
            0.0
        };

        let timing = Self {
            stage,
            kernel,
            workers,
            seconds,
            us_per_sample: per(samples as f64, 1e6),
            ns_per_point: per(points as f64, 1e9),
            mpoints_per_second,
        };
        timing.log();
        timing
    }

    fn log(&self) {
        match self.kernel {
            Some(kernel) => tracing::info!(
                stage = %self.stage,
                %kernel,
                workers = self.workers,
                seconds = self.seconds,
                us_per_sample = self.us_per_sample,
                ns_per_point = self.ns_per_point,
                mpoints_per_second = self.mpoints_per_second,
                "Stage finished"
            ),
            None => tracing::info!(stage = %self.stage, seconds = self.seconds, "Stage finished"),
        }
    }
}

/// Outcome of a benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub samples: usize,
    pub channels: usize,
    pub w_planes: usize,
    pub grid_size: usize,
    pub cell_size: Coord,
    pub support: usize,
    pub taps: usize,
    pub oversample: usize,
    pub w_cell_size: Coord,
    pub kernel_table_bytes: usize,
    /// Kernel taps applied per gridding or degridding pass.
    pub grid_points: u64,
    pub support_policy: String,
    /// Arithmetic backend that actually ran.
    pub arithmetic: &'static str,
    /// Whether serial and parallel outputs were compared.
    pub verified: bool,
    pub timings: Vec<StageTiming>,
}

impl BenchmarkReport {
    /// Timing of `stage` run with `kernel`, if it ran.
    pub fn timing(&self, stage: Stage, kernel: Option<Kernel>) -> Option<&StageTiming> {
        self.timings
            .iter()
            .find(|t| t.stage == stage && t.kernel == kernel)
    }
}

/// Run the benchmark described by `config`.
///
/// With `config.threads` set, all parallel work runs in a dedicated pool of
/// that size; otherwise in the rayon global pool.
pub fn run(config: &BenchmarkConfig) -> Result<BenchmarkReport, Error> {
    config.validate()?;

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            pool.install(|| run_in_pool(config))
        }
        None => run_in_pool(config),
    }
}

/// Everything the kernels need, built once per run.
struct Setup {
    samples: Samples,
    table: KernelTable,
    offsets: OffsetIndex,
}

fn run_in_pool(config: &BenchmarkConfig) -> Result<BenchmarkReport, Error> {
    let workers = common::parallel::worker_count();
    let cell_size = config.effective_cell_size();
    tracing::info!(
        samples = config.samples,
        channels = config.channels,
        w_planes = config.w_planes,
        grid_size = config.grid_size,
        cell_size,
        baseline = config.baseline,
        operations = %config.operations,
        execution = %config.execution,
        arithmetic = config.arithmetic.resolved_name(),
        cpu = common::cpu_features::best_available(),
        workers,
        "Starting gridding benchmark"
    );

    let mut timings = Vec::new();
    let setup = prepare(config, cell_size, workers, &mut timings)?;
    let Setup { samples, table, offsets } = &setup;

    let taps = table.taps();
    let grid_points = offsets.len() as u64 * (taps * taps) as u64;
    let kernels = kernels_for(config.execution);
    let verified = config.execution == Execution::Verify;

    if config.operations.gridding() {
        let mut outputs = Vec::with_capacity(kernels.len());
        for &kernel in &kernels {
            let mut grid = Grid::new(config.grid_size);
            let start = Instant::now();
            let used = kernel.grid(&config.arithmetic, &samples.values, table, offsets, &mut grid);
            timings.push(StageTiming::new(
                Stage::Gridding,
                Some(kernel),
                used,
                start.elapsed(),
                offsets.len(),
                grid_points,
            ));
            outputs.push(grid.into_vec());
        }
        if verified {
            compare(Stage::Gridding, &outputs[0], &outputs[1])?;
        }
    }

    if config.operations.degridding() {
        let grid = Grid::filled(config.grid_size, Value::new(1.0, 0.0));
        let mut outputs = Vec::with_capacity(kernels.len());
        for &kernel in &kernels {
            let mut out = vec![Value::default(); offsets.len()];
            let start = Instant::now();
            let used = kernel.degrid(&config.arithmetic, &grid, table, offsets, &mut out);
            timings.push(StageTiming::new(
                Stage::Degridding,
                Some(kernel),
                used,
                start.elapsed(),
                offsets.len(),
                grid_points,
            ));
            outputs.push(out);
        }
        if verified {
            compare(Stage::Degridding, &outputs[0], &outputs[1])?;
        }
    }

    if verified {
        tracing::info!("Parallel results match serial");
    }

    Ok(BenchmarkReport {
        samples: config.samples,
        channels: config.channels,
        w_planes: config.w_planes,
        grid_size: config.grid_size,
        cell_size,
        support: table.support(),
        taps,
        oversample: table.oversample(),
        w_cell_size: table.w_cell_size(),
        kernel_table_bytes: table.size_bytes(),
        grid_points,
        support_policy: config.support.to_string(),
        arithmetic: config.arithmetic.resolved_name(),
        verified,
        timings,
    })
}

/// Synthesise samples, build the kernel table and offset index, and check that
/// every footprint fits.
fn prepare(
    config: &BenchmarkConfig,
    cell_size: Coord,
    workers: usize,
    timings: &mut Vec<StageTiming>,
) -> Result<Setup, Error> {
    let frequencies = channel_frequencies(config.channels);
    let samples = SampleGenerator::new(config.seed).generate(config.samples, config.channels, config.baseline);

    let start = Instant::now();
    let table = KernelTableBuilder::new(cell_size, config.baseline, config.w_planes)
        .with_support_policy(config.support)
        .build(&frequencies);
    timings.push(StageTiming::new(Stage::KernelTable, None, workers, start.elapsed(), 0, 0));

    if table.taps() > config.grid_size {
        return Err(Error::GridTooSmall {
            grid_size: config.grid_size,
            taps: table.taps(),
        });
    }

    let start = Instant::now();
    let geometry = IndexGeometry::for_table(&table, cell_size, config.grid_size);
    let offsets = build_offset_index(&samples.u, &samples.v, &samples.w, &frequencies, &geometry);
    timings.push(StageTiming::new(Stage::OffsetIndex, None, workers, start.elapsed(), 0, 0));

    if let Some(index) = offsets.first_out_of_bounds(&table, config.grid_size) {
        let offset = offsets[index];
        return Err(Error::FootprintOutOfBounds {
            index,
            row: offset.row,
            col: offset.col,
            grid_size: config.grid_size,
        });
    }

    Ok(Setup { samples, table, offsets })
}

fn kernels_for(execution: Execution) -> Vec<Kernel> {
    let mut kernels = Vec::with_capacity(2);
    if execution.serial() {
        kernels.push(Kernel::Serial);
    }
    if execution.parallel() {
        kernels.push(Kernel::Parallel);
    }
    kernels
}

fn compare(stage: Stage, serial: &[Value], parallel: &[Value]) -> Result<(), Error> {
    match first_mismatch(serial, parallel) {
        None => Ok(()),
        Some(mismatch) => {
            tracing::error!(
                stage = %stage,
                index = mismatch.index,
                expected = mismatch.expected,
                actual = mismatch.actual,
                "Parallel result differs from serial"
            );
            Err(Error::VerificationFailed {
                stage,
                index: mismatch.index,
                expected: mismatch.expected,
                actual: mismatch.actual,
            })
        }
    }
}
