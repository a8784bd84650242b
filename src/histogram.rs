//! Monte Carlo histogram of a sampler's output over the parameter grid.
//!
//! Samples are drawn in batches of `batch_size`. Each batch is handled by one
//! rayon worker that bins into its own partial histogram; partials are then
//! reduced by elementwise sum. Sample `i` always receives the same uniform
//! variates, so the result does not depend on how batches are scheduled.

use nalgebra::Point2;
use rayon::prelude::*;

use crate::bounds::BoundingBox2;
use crate::checks::{Checked, DOMAIN_TOLERANCE, MASS_SLACK, nan_min};
use crate::config::ChiSquareConfig;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::sampling::SampleFn;

/// Out-of-domain samples quoted in the failure message.
const MAX_REPORTED_OUTLIERS: usize = 8;

/// Weighted sample counts per grid cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    grid: Grid,
    counts: Vec<f64>,
}

impl Histogram {
    /// Build a histogram from precomputed counts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GridMismatch`] if `counts.len() != grid.len()`.
    pub fn from_counts(grid: Grid, counts: Vec<f64>) -> Result<Self> {
        if counts.len() != grid.len() {
            return Err(Error::GridMismatch {
                expected: grid.len(),
                got: counts.len(),
            });
        }
        Ok(Self { grid, counts })
    }

    /// The grid the counts are laid out on.
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Per-cell counts, indexed `x + y * nx`.
    #[must_use]
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Sum of all cells.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Counts as `[y][x]` rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.grid.rows(&self.counts)
    }
}

/// Partial result of one worker.
struct Tally {
    counts: Vec<f64>,
    outside: usize,
    outliers: Vec<Point2<f64>>,
}

impl Tally {
    fn new(cells: usize) -> Self {
        Self {
            counts: vec![0.0; cells],
            outside: 0,
            outliers: Vec::new(),
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.outside += other.outside;
        let room = MAX_REPORTED_OUTLIERS.saturating_sub(self.outliers.len());
        self.outliers.extend(other.outliers.into_iter().take(room));
        self
    }
}

/// Draw `config.sample_count` samples, map them into the rectangle and bin
/// them on `grid`.
///
/// Samples mapped outside the bounds by more than
/// [`DOMAIN_TOLERANCE`](crate::checks::DOMAIN_TOLERANCE) of the extents are
/// reported as a failure and clamped into the border cells. The table is
/// also checked for negative cells and for a total weight above
/// [`MASS_SLACK`](crate::checks::MASS_SLACK) times the sample count.
#[allow(clippy::cast_precision_loss)]
pub fn tabulate_histogram<D: Domain>(
    domain: &D,
    sampler: &SampleFn<D::Point>,
    grid: Grid,
    config: &ChiSquareConfig,
) -> Checked<Histogram> {
    let bounds = domain.bounds();
    let n = config.sample_count;
    let batch_size = config.batch_size.max(1);
    let n_batches = n.div_ceil(batch_size);

    let tally = (0..n_batches)
        .into_par_iter()
        .map(|batch| {
            let start = batch * batch_size;
            let end = (start + batch_size).min(n);
            let mut tally = Tally::new(grid.len());
            let mut uniforms = vec![0.0; config.sample_dim];

            for index in start..end {
                config
                    .uniform_source
                    .fill(config.seed, index as u64, &mut uniforms);
                let (point, weight) = sampler.call(&uniforms);
                let xy = domain.map_backward(&point);
                bin_sample(&mut tally, &bounds, grid, xy, weight);
            }
            tally
        })
        .reduce(|| Tally::new(grid.len()), Tally::merge);

    let mut checked = Checked::new(Histogram {
        grid,
        counts: tally.counts,
    });

    if tally.outside > 0 {
        checked.fail(format!(
            "Encountered {} samples outside of the specified domain, e.g. {}",
            tally.outside,
            format_points(&tally.outliers)
        ));
    }

    let min = nan_min(&checked.value.counts);
    if !(min >= 0.0) {
        checked.fail(format!(
            "Encountered a cell with negative sample weights: {min}"
        ));
    }

    let mass = checked.value.total() / n as f64;
    if mass > MASS_SLACK {
        checked.fail(format!(
            "Sample weights add up to a value greater than 1.0: {mass}"
        ));
    }

    trace_info!(
        sample_count = n,
        mass,
        outside = tally.outside,
        "histogram tabulated"
    );

    checked
}

fn bin_sample(tally: &mut Tally, bounds: &BoundingBox2, grid: Grid, xy: Point2<f64>, weight: f64) {
    if !bounds.contains_within(&xy, DOMAIN_TOLERANCE) {
        tally.outside += 1;
        if tally.outliers.len() < MAX_REPORTED_OUTLIERS {
            tally.outliers.push(xy);
        }
    }
    tally.counts[grid.cell_of(bounds, &xy)] += weight;
}

fn format_points(points: &[Point2<f64>]) -> String {
    let parts: Vec<String> = points
        .iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect();
    format!("[{}]", parts.join(", "))
}
