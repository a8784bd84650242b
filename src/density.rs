//! Expected cell counts obtained by integrating the density over each cell.
//!
//! Each cell is integrated with a tensor-product composite trapezoid rule on
//! `ires x ires` nodes that span the cell corners. Nodes are mapped into
//! sampler space with [`Domain::map_forward`] before the density is called.
//! The integral is finally scaled by `sample_count * area` so the table is in
//! the same units as the histogram.

use nalgebra::Point2;
use rayon::prelude::*;

use crate::checks::{Checked, MASS_SLACK, nan_min};
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::grid::Grid;

/// Composite trapezoid rule on `[0, 1]`.
///
/// # Examples
///
/// ```
/// use chi2test::density::QuadratureRule;
///
/// let rule = QuadratureRule::trapezoid(3);
/// assert_eq!(rule.nodes(), &[0.0, 0.5, 1.0]);
/// assert_eq!(rule.weights(), &[0.25, 0.5, 0.25]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureRule {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl QuadratureRule {
    /// `n >= 2` equally spaced nodes `i / (n - 1)`; interior weights
    /// `1 / (n - 1)`, end weights half that. Weights sum to 1.
    ///
    /// # Panics
    ///
    /// Panics if `n < 2`. [`ChiSquareConfig::validate`](crate::ChiSquareConfig::validate)
    /// rejects such `ires` values before tabulation.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn trapezoid(n: usize) -> Self {
        assert!(n >= 2, "trapezoid rule needs at least two nodes");
        let h = 1.0 / (n - 1) as f64;
        let nodes = (0..n).map(|i| i as f64 * h).collect();
        let mut weights = vec![h; n];
        weights[0] *= 0.5;
        weights[n - 1] *= 0.5;
        Self { nodes, weights }
    }

    /// Node positions in `[0, 1]`.
    #[must_use]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Node weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Expected sample counts per grid cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityTable {
    grid: Grid,
    expected: Vec<f64>,
}

impl DensityTable {
    /// Build a table from precomputed expected counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GridMismatch`] if `expected.len() != grid.len()`.
    pub fn from_expected(grid: Grid, expected: Vec<f64>) -> Result<Self> {
        if expected.len() != grid.len() {
            return Err(Error::GridMismatch {
                expected: grid.len(),
                got: expected.len(),
            });
        }
        Ok(Self { grid, expected })
    }

    /// The grid the table is laid out on.
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Per-cell expected counts, indexed `x + y * nx`.
    #[must_use]
    pub fn expected(&self) -> &[f64] {
        &self.expected
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.expected.iter().sum()
    }

    /// Expected counts as `[y][x]` rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.grid.rows(&self.expected)
    }
}

/// Integrate `pdf` over every cell of `grid` and scale to expected counts for
/// `sample_count` samples.
///
/// Fails (without aborting) when a cell is negative or NaN, or when the total
/// exceeds [`MASS_SLACK`](crate::checks::MASS_SLACK) times `sample_count`.
#[allow(clippy::cast_precision_loss)]
pub fn tabulate_density<D, F>(
    domain: &D,
    pdf: &F,
    grid: Grid,
    ires: usize,
    sample_count: usize,
) -> Checked<DensityTable>
where
    D: Domain,
    F: Fn(&D::Point) -> f64 + Sync + ?Sized,
{
    let bounds = domain.bounds();
    let extents = bounds.extents();
    let origin = bounds.min();
    let (nx, ny) = (grid.nx() as f64, grid.ny() as f64);
    let cell_w = extents.x / nx;
    let cell_h = extents.y / ny;
    let rule = QuadratureRule::trapezoid(ires);

    let expected: Vec<f64> = (0..grid.len())
        .into_par_iter()
        .map(|index| {
            let (cx, cy) = grid.cell_coords(index);
            let x0 = origin.x + cx as f64 * cell_w;
            let y0 = origin.y + cy as f64 * cell_h;
            let mut integral = 0.0_f64;

            for (&ty, &wy) in rule.nodes().iter().zip(rule.weights()) {
                for (&tx, &wx) in rule.nodes().iter().zip(rule.weights()) {
                    let node = Point2::new(x0 + tx * cell_w, y0 + ty * cell_h);
                    let value = pdf(&domain.map_forward(node));
                    // Weights are in units of the normalized rectangle.
                    integral = value.mul_add((wx / nx) * (wy / ny), integral);
                }
            }
            integral
        })
        .collect();

    let scale = sample_count as f64 * bounds.area();
    let mut checked = Checked::new(DensityTable {
        grid,
        expected: expected.into_iter().map(|v| v * scale).collect(),
    });

    let min = nan_min(&checked.value.expected);
    if !(min >= 0.0) {
        checked.fail(format!(
            "Encountered a cell with a negative PDF value: {min}"
        ));
    }

    let total = checked.value.total();
    if total > MASS_SLACK * sample_count as f64 {
        checked.fail(format!(
            "PDF integrates to a value greater than 1.0: {}",
            total / sample_count as f64
        ));
    }

    trace_info!(total, cells = grid.len(), "density tabulated");

    checked
}
