//! Per-sample grid anchors and kernel offsets.
//!
//! Every (sample, channel) pair is reduced to an integer grid anchor and a flat
//! offset into the [`KernelTable`] selecting the sub-cell phase and w-plane.
//! The gridding kernels only ever see these integers; they know nothing about
//! world coordinates or the shape of the convolution function.

use std::ops::Index;

use rayon::prelude::*;

use crate::Coord;
use crate::kernel_table::KernelTable;

#[cfg(test)]
mod tests;

/// Grid anchor and kernel offset of one (sample, channel) pair.
///
/// The footprint covers grid rows `row .. row + taps` and columns
/// `col - support ..= col + support`; the kernel row for footprint row `r`
/// starts at `kernel + r * taps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridOffset {
    /// Anchor row, already shifted to the grid centre.
    pub row: usize,
    /// Anchor column, already shifted to the grid centre.
    pub col: usize,
    /// Flat offset of the first kernel tap in the table.
    pub kernel: usize,
}

/// Geometry needed to place samples on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexGeometry {
    /// Grid cell size in wavelengths.
    pub cell_size: Coord,
    /// w-plane step in wavelengths.
    pub w_cell_size: Coord,
    pub w_planes: usize,
    /// Grid side length in cells.
    pub grid_size: usize,
    pub support: usize,
    pub oversample: usize,
}

impl IndexGeometry {
    /// Geometry matching `table` on a `grid_size` grid with `cell_size` cells.
    pub fn for_table(table: &KernelTable, cell_size: Coord, grid_size: usize) -> Self {
        Self {
            cell_size,
            w_cell_size: table.w_cell_size(),
            w_planes: table.w_planes(),
            grid_size,
            support: table.support(),
            oversample: table.oversample(),
        }
    }

    #[inline]
    pub fn taps(&self) -> usize {
        2 * self.support + 1
    }

    /// Place one sample observed at frequency `freq`.
    ///
    /// u and v are floored (truncation corrected for negative values); w is
    /// plain-truncated toward zero. No bounds checks are performed: a
    /// coordinate outside the grid or the w range yields an offset that the
    /// kernels will reject when indexing.
    pub fn locate(&self, u: Coord, v: Coord, w: Coord, freq: Coord) -> GridOffset {
        let half = (self.grid_size / 2) as isize;
        let s = self.taps() as isize;
        let over = self.oversample as isize;

        let (iu, frac_u) = floor_with_phase(freq * u / self.cell_size, self.oversample);
        let (iv, frac_v) = floor_with_phase(freq * v / self.cell_size, self.oversample);

        // TODO: w keeps truncation toward zero while u/v are floored; confirm
        // the intended w-plane centring before unifying the two.
        let w_scaled = freq * w / self.w_cell_size;
        let w_plane = (self.w_planes / 2) as isize + w_scaled as isize;

        let kernel = s * s * (frac_u + over * (frac_v + over * w_plane));

        GridOffset {
            row: (iv + half) as usize,
            col: (iu + half) as usize,
            kernel: kernel as usize,
        }
    }
}

/// Floor `scaled` and return the cell together with its sub-cell phase in
/// `0..oversample`.
#[inline]
fn floor_with_phase(scaled: Coord, oversample: usize) -> (isize, isize) {
    let mut cell = scaled as isize;
    if scaled < cell as Coord {
        cell -= 1;
    }
    let phase = (oversample as Coord * (scaled - cell as Coord)) as isize;
    (cell, phase)
}

/// Anchors and kernel offsets for every (sample, channel) pair, sample-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetIndex {
    offsets: Vec<GridOffset>,
    channels: usize,
}

impl OffsetIndex {
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn as_slice(&self) -> &[GridOffset] {
        &self.offsets
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, GridOffset> {
        self.offsets.iter()
    }

    /// Offset of `channel` of `sample`.
    #[inline]
    pub fn get(&self, sample: usize, channel: usize) -> GridOffset {
        self.offsets[sample * self.channels + channel]
    }

    pub fn anchor_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.iter().map(|o| o.row)
    }

    pub fn anchor_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.iter().map(|o| o.col)
    }

    pub fn kernel_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.iter().map(|o| o.kernel)
    }

    /// Index of the first entry whose footprint leaves the grid or whose
    /// kernel leaves the table.
    pub fn first_out_of_bounds(&self, table: &KernelTable, grid_size: usize) -> Option<usize> {
        let support = table.support();
        let taps = table.taps();
        let kernel_len = taps * taps;
        if taps > grid_size || kernel_len > table.len() {
            return (!self.offsets.is_empty()).then_some(0);
        }
        // Wrapped (negative) anchors are huge, so compare without adding.
        self.offsets.iter().position(|o| {
            o.col < support
                || o.col >= grid_size - support
                || o.row > grid_size - taps
                || o.kernel > table.len() - kernel_len
        })
    }
}

impl Index<usize> for OffsetIndex {
    type Output = GridOffset;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.offsets[idx]
    }
}

impl<'a> IntoIterator for &'a OffsetIndex {
    type Item = &'a GridOffset;
    type IntoIter = std::slice::Iter<'a, GridOffset>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.iter()
    }
}

/// Compute anchors and kernel offsets for every sample and channel.
///
/// `u`, `v`, `w` hold one coordinate per sample; `frequencies` one value per
/// channel. Entry `i * channels + c` describes channel `c` of sample `i`.
pub fn build_offset_index(
    u: &[Coord],
    v: &[Coord],
    w: &[Coord],
    frequencies: &[Coord],
    geometry: &IndexGeometry,
) -> OffsetIndex {
    assert_eq!(u.len(), v.len(), "u and v must have equal length");
    assert_eq!(u.len(), w.len(), "u and w must have equal length");
    assert!(!frequencies.is_empty(), "at least one channel frequency is required");

    let channels = frequencies.len();
    let mut offsets = vec![GridOffset::default(); u.len() * channels];

    offsets
        .par_chunks_mut(channels)
        .zip(u.par_iter().zip(v.par_iter()).zip(w.par_iter()))
        .for_each(|(per_channel, ((&u, &v), &w))| {
            for (out, &freq) in per_channel.iter_mut().zip(frequencies) {
                *out = geometry.locate(u, v, w, freq);
            }
        });

    OffsetIndex { offsets, channels }
}
