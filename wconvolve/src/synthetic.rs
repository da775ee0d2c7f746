//! Synthetic visibility samples for benchmarking and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Coord, Value};

/// Speed of light in metres per second.
const SPEED_OF_LIGHT: Coord = 2.998e8;
/// Frequency of the first channel in Hz.
const START_FREQUENCY_HZ: Coord = 1.4e9;
/// Total bandwidth spanned by all channels in Hz.
const BANDWIDTH_HZ: Coord = 2.0e5;

/// Sample coordinates plus one value per (sample, channel), sample-major.
#[derive(Debug, Clone, Default)]
pub struct Samples {
    pub u: Vec<Coord>,
    pub v: Vec<Coord>,
    pub w: Vec<Coord>,
    pub values: Vec<Value>,
    pub channels: usize,
}

impl Samples {
    /// Number of samples (not counting channels).
    #[inline]
    pub fn len(&self) -> usize {
        self.u.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// Number of (sample, channel) values.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}

/// Seeded generator of uniformly distributed samples.
///
/// Each generator owns its state, so fixtures built from the same seed are
/// identical and generators can be used from several threads independently.
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `count` samples with u, v, w uniform in `[-baseline/2, baseline/2)`
    /// and every channel value set to one.
    pub fn generate(&mut self, count: usize, channels: usize, baseline: Coord) -> Samples {
        let mut u = Vec::with_capacity(count);
        let mut v = Vec::with_capacity(count);
        let mut w = Vec::with_capacity(count);
        for _ in 0..count {
            u.push(self.coordinate(baseline));
            v.push(self.coordinate(baseline));
            w.push(self.coordinate(baseline));
        }

        Samples {
            u,
            v,
            w,
            values: vec![Value::new(1.0, 0.0); count * channels],
            channels,
        }
    }

    fn coordinate(&mut self, baseline: Coord) -> Coord {
        baseline * self.rng.random::<Coord>() - baseline / 2.0
    }
}

/// Channel frequencies in inverse wavelengths, spread below 1.4 GHz.
pub fn channel_frequencies(channels: usize) -> Vec<Coord> {
    (0..channels)
        .map(|c| (START_FREQUENCY_HZ - BANDWIDTH_HZ * c as Coord / channels as Coord) / SPEED_OF_LIGHT)
        .collect()
}
