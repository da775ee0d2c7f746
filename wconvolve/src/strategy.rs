//! Run-time selection between serial and parallel kernels.

use serde::Serialize;

use crate::arithmetic::ComplexArithmetic;
use crate::grid::Grid;
use crate::kernel_table::KernelTable;
use crate::offsets::OffsetIndex;
use crate::{Value, degridding, gridding};

/// Interchangeable kernel implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    Serial,
    Parallel,
}

impl Kernel {
    /// Grid `values` with this implementation. Returns the workers used.
    pub fn grid<A>(
        &self,
        arithmetic: &A,
        values: &[Value],
        table: &KernelTable,
        offsets: &OffsetIndex,
        grid: &mut Grid,
    ) -> usize
    where
        A: ComplexArithmetic + ?Sized,
    {
        match self {
            Kernel::Serial => {
                gridding::grid_serial(arithmetic, values, table, offsets, grid);
                1
            }
            Kernel::Parallel => gridding::grid_parallel(arithmetic, values, table, offsets, grid),
        }
    }

    /// Degrid into `out` with this implementation. Returns the workers used.
    pub fn degrid<A>(
        &self,
        arithmetic: &A,
        grid: &Grid,
        table: &KernelTable,
        offsets: &OffsetIndex,
        out: &mut [Value],
    ) -> usize
    where
        A: ComplexArithmetic + ?Sized,
    {
        match self {
            Kernel::Serial => {
                degridding::degrid_serial(arithmetic, grid, table, offsets, out);
                1
            }
            Kernel::Parallel => degridding::degrid_parallel(arithmetic, grid, table, offsets, out),
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Serial => write!(f, "serial"),
            Kernel::Parallel => write!(f, "parallel"),
        }
    }
}
