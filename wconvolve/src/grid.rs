use std::ops::{Index, IndexMut};

use crate::Value;

/// Square, row-major complex grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Value>,
    size: usize,
}

impl Grid {
    /// All-zero `size x size` grid.
    pub fn new(size: usize) -> Self {
        Self::filled(size, Value::default())
    }

    pub fn filled(size: usize, value: Value) -> Self {
        Self {
            cells: vec![value; size * size],
            size,
        }
    }

    pub fn from_cells(size: usize, cells: Vec<Value>) -> Self {
        assert_eq!(cells.len(), size * size, "cells length must equal size * size");
        Self { cells, size }
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Position of `(col, row)` in [`cells`](Self::cells).
    #[inline]
    pub fn flat_index(&self, col: usize, row: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Value] {
        &mut self.cells
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[Value] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [Value] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    #[inline]
    pub fn fill(&mut self, value: Value) {
        self.cells.fill(value);
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Value> {
        self.cells
    }

    /// Sum of all cells.
    pub fn sum(&self) -> Value {
        self.cells.iter().sum()
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Value;

    /// Cell at `(col, row)`.
    #[inline]
    fn index(&self, (col, row): (usize, usize)) -> &Self::Output {
        &self.cells[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    #[inline]
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut Self::Output {
        &mut self.cells[row * self.size + col]
    }
}
