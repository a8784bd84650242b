//! Histogram grid resolution and cell indexing.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox2;

/// Dimensions of the histogram and density grids.
///
/// Cells are stored row-major: cell `(x, y)` lives at index `x + y * nx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    nx: usize,
    ny: usize,
}

impl Grid {
    /// Derive a grid from the horizontal resolution and a domain aspect.
    ///
    /// `nx = res` and `ny = floor(res * aspect)`, each at least 1. A zero
    /// (or negative, or NaN) aspect therefore yields a single row.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_aspect(res: usize, aspect: f64) -> Self {
        let ny = (res as f64 * aspect) as usize;
        Self {
            nx: res.max(1),
            ny: ny.max(1),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Always `false`; a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat index of cell `(x, y)`.
    #[must_use]
    pub fn cell_index(&self, x: usize, y: usize) -> usize {
        x + y * self.nx
    }

    /// `(x, y)` coordinates of a flat index.
    #[must_use]
    pub fn cell_coords(&self, index: usize) -> (usize, usize) {
        (index % self.nx, index / self.nx)
    }

    /// Flat index of the cell containing `p`.
    ///
    /// Points outside `bounds` are clamped to the nearest border cell; NaN
    /// coordinates land in column or row 0.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn cell_of(&self, bounds: &BoundingBox2, p: &Point2<f64>) -> usize {
        let rel = bounds.normalize(p);
        let x = (rel.x * self.nx as f64).clamp(0.0, (self.nx - 1) as f64) as usize;
        let y = (rel.y * self.ny as f64).clamp(0.0, (self.ny - 1) as f64) as usize;
        self.cell_index(x, y)
    }

    /// Reshape a flat row-major array into `[y][x]` rows.
    #[must_use]
    pub fn rows(&self, values: &[f64]) -> Vec<Vec<f64>> {
        values.chunks(self.nx).map(<[f64]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_res_gives_odd_columns_and_positive_rows() {
        for res in (1..60).step_by(2) {
            for &aspect in &[0.0, 0.3, 1.0, 2.0, core::f64::consts::PI] {
                let g = Grid::from_aspect(res, aspect);
                assert_eq!(g.nx() % 2, 1);
                assert!(g.ny() >= 1);
            }
        }
    }

    #[test]
    fn test_sphere_aspect() {
        let g = Grid::from_aspect(101, 2.0);
        assert_eq!((g.nx(), g.ny()), (101, 202));
        assert_eq!(g.len(), 101 * 202);
    }

    #[test]
    fn test_cell_of_clamps() {
        let b = BoundingBox2::new([0.0, 0.0], [1.0, 1.0]).unwrap();
        let g = Grid::from_aspect(5, 1.0);
        assert_eq!(g.cell_of(&b, &Point2::new(0.0, 0.0)), 0);
        assert_eq!(g.cell_of(&b, &Point2::new(1.0, 1.0)), g.len() - 1);
        assert_eq!(g.cell_of(&b, &Point2::new(1.00001, 0.5)), g.cell_index(4, 2));
        assert_eq!(g.cell_of(&b, &Point2::new(0.21, 0.79)), g.cell_index(1, 3));
        assert_eq!(g.cell_of(&b, &Point2::new(f64::NAN, 0.5)), g.cell_index(0, 2));
    }

    #[test]
    fn test_rows_are_row_major() {
        let g = Grid::from_aspect(3, 0.7);
        let rows = g.rows(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(rows, vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]]);
        assert_eq!(g.cell_coords(4), (1, 1));
    }
}
