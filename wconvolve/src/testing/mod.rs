//! Testing utilities for wconvolve.

#![allow(dead_code)]

use crate::kernel_table::{KernelTable, KernelTableBuilder};
use crate::offsets::{IndexGeometry, OffsetIndex, build_offset_index};
use crate::synthetic::{SampleGenerator, Samples, channel_frequencies};
use crate::{Coord, Value};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A small but complete gridding setup.
///
/// Baseline 200 and cell size 20 give a support of 10 (21 taps); with 9
/// w-planes and a 128 grid every footprint stays inside the grid.
pub struct Fixture {
    pub samples: Samples,
    pub frequencies: Vec<Coord>,
    pub table: KernelTable,
    pub offsets: OffsetIndex,
    pub grid_size: usize,
}

pub const FIXTURE_BASELINE: Coord = 200.0;
pub const FIXTURE_CELL_SIZE: Coord = 20.0;
pub const FIXTURE_W_PLANES: usize = 9;
pub const FIXTURE_GRID_SIZE: usize = 128;

impl Fixture {
    pub fn new(samples: usize, channels: usize, seed: u64) -> Self {
        init_tracing();
        let frequencies = channel_frequencies(channels);
        let samples = SampleGenerator::new(seed).generate(samples, channels, FIXTURE_BASELINE);
        let table = KernelTableBuilder::new(FIXTURE_CELL_SIZE, FIXTURE_BASELINE, FIXTURE_W_PLANES)
            .build(&frequencies);
        let geometry = IndexGeometry::for_table(&table, FIXTURE_CELL_SIZE, FIXTURE_GRID_SIZE);
        let offsets = build_offset_index(&samples.u, &samples.v, &samples.w, &frequencies, &geometry);
        assert_eq!(offsets.first_out_of_bounds(&table, FIXTURE_GRID_SIZE), None);

        Self {
            samples,
            frequencies,
            table,
            offsets,
            grid_size: FIXTURE_GRID_SIZE,
        }
    }

    /// Sample values with varied phase and amplitude instead of all ones.
    pub fn varied_values(&self) -> Vec<Value> {
        (0..self.offsets.len())
            .map(|k| {
                let t = k as f32 * 0.61;
                Value::new(t.cos() + 0.5, t.sin() * 0.75)
            })
            .collect()
    }
}

/// Build a dedicated rayon pool with `threads` workers.
pub fn pool(threads: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .expect("failed to build test thread pool")
}

/// Largest absolute difference of the real parts.
pub fn max_real_diff(a: &[Value], b: &[Value]) -> f32 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x.re - y.re).abs())
        .fold(0.0, f32::max)
}
