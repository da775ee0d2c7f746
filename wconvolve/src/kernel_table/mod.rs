//! W-projection convolution kernel table.
//!
//! The table holds one oversampled kernel per w-plane. Each kernel approximates
//! the Fresnel w-term convolved with an anti-aliasing taper; the w = 0 plane is
//! a pure Gaussian. Values are stored in a single buffer, logically shaped
//! `[w_plane][row_phase][col_phase][tap_row][tap_col]` (tap column fastest):
//!
//! ```text
//! index = i + s * (j + s * (osi + O * (osj + O * k)))
//! ```
//!
//! where `s = 2 * support + 1` and `O` is the oversampling factor.

use rayon::prelude::*;

use crate::{Coord, Value};


/// Sub-cell subdivisions per grid cell along each kernel axis.
pub const OVERSAMPLE: usize = 8;

/// How the kernel half-width is derived from the physical inputs.
///
/// The estimate is `1.5 * sqrt(|baseline| * cell_size * freq[0]) / cell_size`.
/// Its derivation is not established; it is kept behind this policy so it can
/// be replaced without touching the table generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupportPolicy {
    /// Round the estimate to the nearest integer.
    #[default]
    Round,
    /// Truncate the estimate toward zero.
    Truncate,
    /// Ignore the estimate and use this support.
    Fixed(usize),
}

impl SupportPolicy {
    /// Unrounded support estimate in grid cells.
    pub fn estimate(baseline: Coord, cell_size: Coord, freq: Coord) -> Coord {
        1.5 * (baseline.abs() * cell_size * freq).sqrt() / cell_size
    }

    /// Support (kernel half-width in grid cells) for the given inputs.
    pub fn support(&self, baseline: Coord, cell_size: Coord, freq: Coord) -> usize {
        match *self {
            SupportPolicy::Round => Self::estimate(baseline, cell_size, freq).round() as usize,
            SupportPolicy::Truncate => Self::estimate(baseline, cell_size, freq) as usize,
            SupportPolicy::Fixed(support) => support,
        }
    }
}

impl std::fmt::Display for SupportPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportPolicy::Round => write!(f, "round"),
            SupportPolicy::Truncate => write!(f, "truncate"),
            SupportPolicy::Fixed(support) => write!(f, "{support}"),
        }
    }
}

impl std::str::FromStr for SupportPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "round" => Ok(SupportPolicy::Round),
            "truncate" | "trunc" => Ok(SupportPolicy::Truncate),
            other => other
                .parse::<usize>()
                .map(SupportPolicy::Fixed)
                .map_err(|_| crate::Error::UnknownOption {
                    option: "support",
                    value: s.to_string(),
                }),
        }
    }
}

/// Dense oversampled w-projection kernel bank.
#[derive(Debug, Clone)]
pub struct KernelTable {
    data: Vec<Value>,
    support: usize,
    oversample: usize,
    w_planes: usize,
    w_cell_size: Coord,
}

impl KernelTable {
    /// Kernel half-width in grid cells.
    #[inline]
    pub fn support(&self) -> usize {
        self.support
    }

    /// Footprint side length, `2 * support + 1`.
    #[inline]
    pub fn taps(&self) -> usize {
        2 * self.support + 1
    }

    #[inline]
    pub fn oversample(&self) -> usize {
        self.oversample
    }

    #[inline]
    pub fn w_planes(&self) -> usize {
        self.w_planes
    }

    /// Size of one w-plane step in wavelengths.
    #[inline]
    pub fn w_cell_size(&self) -> Coord {
        self.w_cell_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.data
    }

    /// Logical shape `[taps, taps, oversample, oversample, w_planes]`.
    pub fn shape(&self) -> [usize; 5] {
        let s = self.taps();
        [s, s, self.oversample, self.oversample, self.w_planes]
    }

    /// Flat index of tap `(i, j)` at phase `(osi, osj)` in w-plane `k`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, osi: usize, osj: usize, k: usize) -> usize {
        let s = self.taps();
        i + s * (j + s * (osi + self.oversample * (osj + self.oversample * k)))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, osi: usize, osj: usize, k: usize) -> Value {
        self.data[self.index(i, j, osi, osj, k)]
    }

    /// Flat offset of the first tap of the kernel selected by column phase
    /// `frac_u`, row phase `frac_v` and w-plane `w_plane`.
    #[inline]
    pub fn base_offset(&self, frac_u: usize, frac_v: usize, w_plane: usize) -> usize {
        self.index(0, 0, frac_u, frac_v, w_plane)
    }

    /// The `taps * taps` kernel starting at `base`.
    #[inline]
    pub fn footprint(&self, base: usize) -> &[Value] {
        let s = self.taps();
        &self.data[base..base + s * s]
    }

    /// Sum of magnitudes over every entry.
    pub fn magnitude_sum(&self) -> f64 {
        magnitude_sum(&self.data)
    }

    /// Size of the table in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<Value>()
    }
}

/// Builds a [`KernelTable`] from physical inputs.
#[derive(Debug, Clone)]
pub struct KernelTableBuilder {
    cell_size: Coord,
    baseline: Coord,
    w_planes: usize,
    oversample: usize,
    support_policy: SupportPolicy,
}

impl KernelTableBuilder {
    /// `cell_size` is the grid cell size in wavelengths, `baseline` the maximum
    /// baseline length and `w_planes` the number of w-projection planes.
    pub fn new(cell_size: Coord, baseline: Coord, w_planes: usize) -> Self {
        Self {
            cell_size,
            baseline,
            w_planes,
            oversample: OVERSAMPLE,
            support_policy: SupportPolicy::default(),
        }
    }

    /// Set how the support is derived.
    pub fn with_support_policy(mut self, support_policy: SupportPolicy) -> Self {
        self.support_policy = support_policy;
        self
    }

    /// Build the table for the given channel frequencies (inverse wavelengths).
    /// Only the first frequency shapes the kernels.
    pub fn build(&self, frequencies: &[Coord]) -> KernelTable {
        assert!(!frequencies.is_empty(), "at least one channel frequency is required");
        assert!(self.w_planes > 0, "w_planes must be > 0");

        let freq = frequencies[0];
        let cell_size = self.cell_size;
        let oversample = self.oversample;
        let w_planes = self.w_planes;

        let support = self.support_policy.support(self.baseline, cell_size, freq);
        let w_cell_size = 2.0 * self.baseline * freq / w_planes as Coord;
        let s = 2 * support + 1;
        let plane_len = s * s * oversample * oversample;

        tracing::info!(
            fov_deg = 180.0 / std::f64::consts::PI / cell_size,
            support,
            oversample,
            w_cell_size,
            policy = %self.support_policy,
            "Initializing W projection convolution function"
        );

        let mut data = vec![Value::default(); plane_len * w_planes];
        data.par_chunks_mut(plane_len)
            .enumerate()
            .for_each(|(k, plane)| {
                let w = k as Coord - (w_planes / 2) as Coord;
                let f_scale = (w.abs() * w_cell_size * freq).sqrt() / cell_size;
                fill_plane(plane, w, f_scale, support, oversample);
            });

        normalize(&mut data, (w_planes * oversample * oversample) as f64);

        let table = KernelTable {
            data,
            support,
            oversample,
            w_planes,
            w_cell_size,
        };

        tracing::info!(
            shape = ?table.shape(),
            size_mb = table.size_bytes() / (1024 * 1024),
            "Convolution function ready"
        );

        table
    }
}

/// Build a kernel table with the default support policy.
pub fn build_kernel_table(
    frequencies: &[Coord],
    cell_size: Coord,
    baseline: Coord,
    w_planes: usize,
) -> KernelTable {
    KernelTableBuilder::new(cell_size, baseline, w_planes).build(frequencies)
}

/// Fill one w-plane (all phases, all taps) with unnormalized weights.
///
/// `w` is in w-cell units. For `w != 0` the weight is `cos(r2 / (w * f_scale))`,
/// for `w == 0` it is `exp(-r2)`, with `r2` the squared distance from the
/// footprint centre in cells including the sub-cell phase.
fn fill_plane(plane: &mut [Value], w: Coord, f_scale: Coord, support: usize, oversample: usize) {
    let s = 2 * support + 1;
    let centre = support as Coord;
    let over = oversample as Coord;
    debug_assert_eq!(plane.len(), s * s * oversample * oversample);

    // One chunk per (osj, osi, j): a row of `s` taps along i.
    for (row_idx, row) in plane.chunks_exact_mut(s).enumerate() {
        let j = row_idx % s;
        let osi = (row_idx / s) % oversample;
        let osj = row_idx / (s * oversample);

        let dj = j as Coord - centre + osj as Coord / over;
        let j2 = dj * dj;

        for (i, cell) in row.iter_mut().enumerate() {
            let di = i as Coord - centre + osi as Coord / over;
            let r2 = j2 + di * di;
            let weight = if w != 0.0 {
                (r2 / (w * f_scale)).cos()
            } else {
                (-r2).exp()
            };
            *cell = Value::new(weight as f32, 0.0);
        }
    }
}

fn magnitude_sum(data: &[Value]) -> f64 {
    data.par_iter().map(|c| c.norm() as f64).sum()
}

/// Scale `data` so its magnitudes sum to `target`.
fn normalize(data: &mut [Value], target: f64) {
    let total = magnitude_sum(data);
    if total == 0.0 {
        tracing::warn!("Convolution function is identically zero, skipping normalization");
        return;
    }
    let scale = (target / total) as f32;
    data.par_iter_mut().for_each(|c| *c *= scale);
}
