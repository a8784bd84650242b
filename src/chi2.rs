//! Pearson's chi-square statistic with pooling of low-frequency cells.
//!
//! # Algorithm
//!
//! 1. Sort cells by increasing expected count ([`sort_by_expected`]).
//! 2. Walk the sorted cells. Cells whose expected count reaches the pooling
//!    threshold are kept as they are. Smaller cells are added to a running
//!    pool, which is emitted as one effective cell as soon as its expected
//!    sum reaches the threshold. Whatever remains in the pool at the end is
//!    emitted as a final cell, so no observed mass is dropped. Cells that are
//!    empty in both tables are skipped.
//! 3. Sum `(observed - expected)^2 / expected` over effective cells with a
//!    positive expected count; the degrees of freedom are the number of
//!    effective cells minus one ([`pool_and_reduce`]).
//! 4. Convert to a p-value through the regularized upper incomplete gamma
//!    function ([`p_value`]).
//!
//! [`sidak_correction`] adjusts a significance level for a batch of
//! independent tests.

use serde::{Deserialize, Serialize};
use statrs::function::gamma::gamma_ur;

/// Outcome of [`pool_and_reduce`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareStatistic {
    /// Pearson's chi-square statistic.
    pub statistic: f64,
    /// Effective cells minus one (never negative).
    pub degrees_of_freedom: usize,
    /// Raw cells that went through the pool.
    pub pooled_in: usize,
    /// Effective cells emitted by the pool.
    pub pooled_out: usize,
}

/// Sort `observed` and `expected` jointly by increasing expected count.
///
/// The sort is stable, so equal expected counts keep their original order.
/// NaN expected counts sort last.
///
/// # Examples
///
/// ```
/// use chi2test::chi2::sort_by_expected;
///
/// let (obs, exp) = sort_by_expected(&[1.0, 2.0, 3.0], &[9.0, 4.0, 4.0]);
/// assert_eq!(exp, [4.0, 4.0, 9.0]);
/// assert_eq!(obs, [2.0, 3.0, 1.0]);
/// ```
#[must_use]
pub fn sort_by_expected(observed: &[f64], expected: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut order: Vec<usize> = (0..expected.len().min(observed.len())).collect();
    order.sort_by(|&a, &b| expected[a].total_cmp(&expected[b]));
    // `total_cmp` orders -NaN first; keep every NaN at the end instead.
    order.sort_by_key(|&i| expected[i].is_nan());

    let obs = order.iter().map(|&i| observed[i]).collect();
    let exp = order.iter().map(|&i| expected[i]).collect();
    (obs, exp)
}

/// Compute the pooled chi-square statistic of cells already sorted by
/// increasing expected count.
///
/// # Examples
///
/// ```
/// use chi2test::chi2::pool_and_reduce;
///
/// let expected = [1.0, 1.0, 1.0, 1.0, 10.0];
/// let stat = pool_and_reduce(&expected, &expected, 5.0);
/// assert_eq!(stat.degrees_of_freedom, 1);
/// assert_eq!((stat.pooled_in, stat.pooled_out), (4, 1));
/// assert_eq!(stat.statistic, 0.0);
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn pool_and_reduce(observed: &[f64], expected: &[f64], threshold: f64) -> ChiSquareStatistic {
    let mut statistic = 0.0;
    let mut pooled_obs = 0.0;
    let mut pooled_exp = 0.0;
    let mut cells = 0_usize;
    let mut pooled_in = 0_usize;
    let mut pooled_out = 0_usize;

    for (&obs, &exp) in observed.iter().zip(expected) {
        if exp == 0.0 && obs == 0.0 {
            continue;
        }

        if exp < threshold {
            pooled_obs += obs;
            pooled_exp += exp;
            pooled_in += 1;

            if pooled_exp >= threshold {
                statistic += pearson_term(pooled_obs, pooled_exp);
                pooled_obs = 0.0;
                pooled_exp = 0.0;
                pooled_out += 1;
                cells += 1;
            }
        } else {
            statistic += pearson_term(obs, exp);
            cells += 1;
        }
    }

    if pooled_exp != 0.0 || pooled_obs != 0.0 {
        statistic += pearson_term(pooled_obs, pooled_exp);
        pooled_out += 1;
        cells += 1;
    }

    ChiSquareStatistic {
        statistic,
        degrees_of_freedom: cells.max(1) - 1,
        pooled_in,
        pooled_out,
    }
}

fn pearson_term(observed: f64, expected: f64) -> f64 {
    if expected > 0.0 {
        let d = observed - expected;
        d * d / expected
    } else {
        0.0
    }
}

/// Whether some cell has observed mass but zero expected count.
///
/// Such a cell cannot be explained by the density at all, whatever the
/// statistic says.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn has_unexplained_mass(observed: &[f64], expected: &[f64]) -> bool {
    observed
        .iter()
        .zip(expected)
        .any(|(&obs, &exp)| exp == 0.0 && obs != 0.0)
}

/// Probability of a chi-square statistic at least as large as `statistic`
/// with `degrees_of_freedom` degrees of freedom.
///
/// Returns NaN when the degrees of freedom are zero or the statistic is not
/// a finite non-negative number.
///
/// # Examples
///
/// ```
/// use chi2test::chi2::p_value;
///
/// // The median of chi^2(2) is 2 ln 2.
/// let p = p_value(2.0 * 2f64.ln(), 2);
/// assert!((p - 0.5).abs() < 1e-10);
/// assert!(p_value(1.0, 0).is_nan());
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn p_value(statistic: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 || !statistic.is_finite() || statistic < 0.0 {
        return f64::NAN;
    }
    if statistic == 0.0 {
        return 1.0;
    }
    gamma_ur(degrees_of_freedom as f64 / 2.0, statistic / 2.0)
}

/// Šidák-corrected per-test significance level so that `test_count`
/// independent tests together have significance `significance_level`.
///
/// # Examples
///
/// ```
/// use chi2test::chi2::sidak_correction;
///
/// let alpha = sidak_correction(0.05, 2);
/// assert!((alpha - 0.025_320_565).abs() < 1e-8);
/// assert_eq!(sidak_correction(0.05, 1), 0.05);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sidak_correction(significance_level: f64, test_count: usize) -> f64 {
    if test_count <= 1 {
        return significance_level;
    }
    1.0 - (1.0 - significance_level).powf(1.0 / test_count as f64)
}
