//! Parallel processing utilities.

use rayon::prelude::*;


/// Number of workers in the rayon pool the caller is currently running on.
///
/// Inside `ThreadPool::install` this is the size of that pool, otherwise the
/// global pool (sized from `RAYON_NUM_THREADS` or the hardware).
#[inline]
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}

// ============================================================================
// Interleaved row ownership
// ============================================================================

/// The rows of a row-major buffer owned by one worker.
///
/// Produced by [`interleave_rows_mut`]: row `y` belongs to owner `y % parts`
/// and is stored at position `y / parts` of that owner's list.
#[derive(Debug)]
pub struct InterleavedRows<'a, T> {
    owner: usize,
    parts: usize,
    rows: Vec<&'a mut [T]>,
}

impl<'a, T> InterleavedRows<'a, T> {
    #[inline]
    pub fn owner(&self) -> usize {
        self.owner
    }

    #[inline]
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Number of rows held by this owner.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn owns(&self, y: usize) -> bool {
        y % self.parts == self.owner
    }

    /// Smallest `r >= 0` such that row `start + r` is owned by this worker.
    #[inline]
    pub fn first_owned_from(&self, start: usize) -> usize {
        (self.owner + self.parts - start % self.parts) % self.parts
    }

    /// Mutable access to global row `y`. Panics if `y` is not owned here.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(self.owns(y), "row {y} is not owned by worker {}", self.owner);
        &mut *self.rows[y / self.parts]
    }

    /// Iterate `(global_row, row)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut [T])> + '_ {
        let owner = self.owner;
        let parts = self.parts;
        self.rows
            .iter_mut()
            .enumerate()
            .map(move |(local, row)| (local * parts + owner, &mut **row))
    }
}

/// Deal the rows of a row-major buffer round-robin over `parts` owners.
///
/// Every row ends up in exactly one owner's list, so the returned values can
/// be handed to separate workers and written without synchronization.
///
/// # Panics
///
/// Panics if `width` or `parts` is 0, or if `data.len()` is not a multiple of `width`.
pub fn interleave_rows_mut<T>(data: &mut [T], width: usize, parts: usize) -> Vec<InterleavedRows<'_, T>> {
    assert!(width > 0, "width must be > 0");
    assert!(parts > 0, "parts must be > 0");
    assert_eq!(data.len() % width, 0, "buffer length must be a multiple of width");

    let height = data.len() / width;
    let mut owners: Vec<InterleavedRows<'_, T>> = (0..parts)
        .map(|owner| InterleavedRows {
            owner,
            parts,
            rows: Vec::with_capacity(height.div_ceil(parts)),
        })
        .collect();

    for (y, row) in data.chunks_exact_mut(width).enumerate() {
        owners[y % parts].rows.push(row);
    }
    owners
}

/// Run `f` once per worker over the interleaved rows of `data`.
///
/// `f` receives the rows owned by one worker; each physical row is visited by
/// exactly one invocation. Returns the number of workers used.
pub fn for_each_row_owner<T, F>(data: &mut [T], width: usize, f: F) -> usize
where
    T: Send,
    F: Fn(&mut InterleavedRows<'_, T>) + Sync + Send,
{
    let workers = worker_count();
    let mut owners = interleave_rows_mut(data, width, workers);
    owners.par_iter_mut().for_each(|rows| f(rows));
    workers
}
