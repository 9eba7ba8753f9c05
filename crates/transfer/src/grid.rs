//! Fixed-size 2D grid of optional cell values.
//!
//! Rows index the slow axis of a sweep (time of flight for porkchops, altitude for flyby maps)
//! and columns the fast axis (departure epoch, alignment angle). `None` marks an infeasible cell.
//! The dimensions are fixed at construction and there is no mutating API.

use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T = f64> {
    rows: usize,
    cols: usize,
    cells: Vec<Option<T>>,
}

/// Location and value of a grid extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMinimum {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl<T: Copy> Grid<T> {
    /// Build from row-major cells; `None` when the cell count does not match.
    pub fn from_row_major(rows: usize, cols: usize, cells: Vec<Option<T>>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self { rows, cols, cells })
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Option<T>>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.rows).map(move |row| self.get(row, col))
    }

    /// Row-major iteration as `(row, col, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Option<T>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, value)| (idx / self.cols, idx % self.cols, *value))
    }

    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.cells.len() - self.valid_count()
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|cell| cell.map(&f)).collect(),
        }
    }
}

impl Grid<f64> {
    /// Smallest valid value; ties resolve to the first cell in row-major order.
    pub fn minimum(&self) -> Option<CellMinimum> {
        let mut best: Option<CellMinimum> = None;
        for (row, col, value) in self.iter() {
            let Some(value) = value else { continue };
            if best.is_none_or(|current| value < current.value) {
                best = Some(CellMinimum { row, col, value });
            }
        }
        best
    }

    /// Row of the smallest valid value within a column.
    pub fn column_argmin(&self, col: usize) -> Option<usize> {
        self.column(col)
            .enumerate()
            .filter_map(|(row, value)| value.map(|v| (row, v)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(row, _)| row)
    }

    /// `(min, max)` over valid cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        // 2 rows x 3 cols
        Grid::from_row_major(
            2,
            3,
            vec![Some(4.0), None, Some(2.0), Some(1.0), None, Some(2.0)],
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_sizes() {
        assert!(Grid::<f64>::from_row_major(2, 2, vec![None; 3]).is_none());
    }

    #[test]
    fn minimum_skips_invalid_cells() {
        let min = sample().minimum().unwrap();
        assert_eq!((min.row, min.col, min.value), (1, 0, 1.0));
    }

    #[test]
    fn column_argmin_handles_empty_columns() {
        let grid = sample();
        assert_eq!(grid.column_argmin(0), Some(1));
        assert_eq!(grid.column_argmin(1), None);
        assert_eq!(grid.column_argmin(2), Some(0));
    }

    #[test]
    fn counts_and_range() {
        let grid = sample();
        assert_eq!(grid.valid_count(), 4);
        assert_eq!(grid.invalid_count(), 2);
        assert_eq!(grid.value_range(), Some((1.0, 4.0)));
        assert_eq!(grid.get(5, 5), None);
    }
}
