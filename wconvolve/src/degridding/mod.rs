//! Convolutional degridding: gather grid values back to sample positions.
//!
//! Each output is the unconjugated dot product of a sample's kernel footprint
//! with the matching grid window. Outputs are independent, so the parallel
//! variant simply splits them into fixed-size tasks.

use rayon::prelude::*;

use crate::Value;
use crate::arithmetic::ComplexArithmetic;
use crate::grid::Grid;
use crate::kernel_table::KernelTable;
use crate::offsets::{GridOffset, OffsetIndex};


/// Number of outputs handed to a worker at a time.
pub const SAMPLES_PER_TASK: usize = 32;

/// Degrid serially, overwriting `out`.
///
/// `out[d]` receives the footprint sum for `offsets[d]`. Panics if a footprint
/// leaves the grid or `out` has a different length than `offsets`.
pub fn degrid_serial<A>(
    arithmetic: &A,
    grid: &Grid,
    table: &KernelTable,
    offsets: &OffsetIndex,
    out: &mut [Value],
) where
    A: ComplexArithmetic + ?Sized,
{
    assert_eq!(out.len(), offsets.len(), "output length must equal offset count");
    for (slot, offset) in out.iter_mut().zip(offsets) {
        *slot = gather(arithmetic, grid, table, offset);
    }
}

/// Degrid on the current rayon pool in tasks of [`SAMPLES_PER_TASK`].
///
/// Output order and values match [`degrid_serial`]. Returns the number of
/// workers in the pool.
pub fn degrid_parallel<A>(
    arithmetic: &A,
    grid: &Grid,
    table: &KernelTable,
    offsets: &OffsetIndex,
    out: &mut [Value],
) -> usize
where
    A: ComplexArithmetic + ?Sized,
{
    assert_eq!(out.len(), offsets.len(), "output length must equal offset count");
    out.par_chunks_mut(SAMPLES_PER_TASK)
        .zip(offsets.as_slice().par_chunks(SAMPLES_PER_TASK))
        .for_each(|(slots, chunk)| {
            for (slot, offset) in slots.iter_mut().zip(chunk) {
                *slot = gather(arithmetic, grid, table, offset);
            }
        });

    common::parallel::worker_count()
}

#[inline]
fn gather<A>(arithmetic: &A, grid: &Grid, table: &KernelTable, offset: &GridOffset) -> Value
where
    A: ComplexArithmetic + ?Sized,
{
    let taps = table.taps();
    let size = grid.size();
    let kernel = table.as_slice();
    let cells = grid.cells();

    let mut g = offset.row * size + offset.col - table.support();
    let mut c = offset.kernel;
    let mut sum = Value::default();
    for _ in 0..taps {
        sum += arithmetic.dot(&kernel[c..c + taps], &cells[g..g + taps]);
        g += size;
        c += taps;
    }
    sum
}
