//! Convolutional gridding: scatter sample values onto the grid.
//!
//! For every sample the `taps x taps` kernel selected by its [`GridOffset`]
//! is scaled by the sample value and added onto the grid, one footprint row
//! at a time.
//!
//! The parallel variant partitions grid rows, not samples: row `y` is owned by
//! worker `y % workers` for the whole call, and every worker walks all samples
//! but only applies the footprint rows it owns. No grid cell is ever written by
//! two workers, so no locks or atomics are needed. Work is uneven only to the
//! extent that anchors cluster modulo the worker count.
//!
//! [`GridOffset`]: crate::offsets::GridOffset

use common::parallel;

use crate::Value;
use crate::arithmetic::ComplexArithmetic;
use crate::grid::Grid;
use crate::kernel_table::KernelTable;
use crate::offsets::{GridOffset, OffsetIndex};


/// Grid `values` serially.
///
/// `values[d]` is placed according to `offsets[d]`. Footprints must lie inside
/// the grid (see [`OffsetIndex::first_out_of_bounds`]); otherwise this panics
/// on slice indexing.
pub fn grid_serial<A>(
    arithmetic: &A,
    values: &[Value],
    table: &KernelTable,
    offsets: &OffsetIndex,
    grid: &mut Grid,
) where
    A: ComplexArithmetic + ?Sized,
{
    debug_assert_eq!(values.len(), offsets.len());
    let taps = table.taps();
    let support = table.support();
    let kernel = table.as_slice();
    let size = grid.size();
    let cells = grid.cells_mut();

    for (&value, offset) in values.iter().zip(offsets) {
        let col0 = offset.col - support;
        let mut g = offset.row * size + col0;
        let mut c = offset.kernel;

        for _ in 0..taps {
            arithmetic.scaled_add(value, &kernel[c..c + taps], &mut cells[g..g + taps]);
            g += size;
            c += taps;
        }
    }
}

/// Grid `values` on the current rayon pool using row ownership.
///
/// Produces the same grid as [`grid_serial`] up to floating-point rounding.
/// Returns the number of workers used.
pub fn grid_parallel<A>(
    arithmetic: &A,
    values: &[Value],
    table: &KernelTable,
    offsets: &OffsetIndex,
    grid: &mut Grid,
) -> usize
where
    A: ComplexArithmetic + ?Sized,
{
    debug_assert_eq!(values.len(), offsets.len());
    let taps = table.taps();
    let support = table.support();
    let kernel = table.as_slice();
    let size = grid.size();

    parallel::for_each_row_owner(grid.cells_mut(), size, |rows| {
        let workers = rows.parts();
        for (&value, offset) in values.iter().zip(offsets) {
            let GridOffset { row, col, kernel: base } = *offset;
            let col0 = col - support;

            // Footprint rows owned here are every `workers`-th row starting at
            // the first one that lands on an owned grid row.
            let mut r = rows.first_owned_from(row);
            while r < taps {
                let c = base + r * taps;
                let target = &mut rows.row_mut(row + r)[col0..col0 + taps];
                arithmetic.scaled_add(value, &kernel[c..c + taps], target);
                r += workers;
            }
        }
    })
}
