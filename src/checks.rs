//! Post-conditions shared by the histogram and density tabulators.

/// Relative slack (of the rectangle extents) within which mapped samples may
/// fall outside the domain bounds before they are reported.
pub const DOMAIN_TOLERANCE: f64 = 1e-4;

/// Largest accepted ratio of tabulated mass to sample count. The extra 10%
/// absorbs quadrature and floating-point error.
pub const MASS_SLACK: f64 = 1.1;

/// A tabulated table together with the failed post-conditions, if any.
#[derive(Clone, Debug)]
pub struct Checked<T> {
    /// The tabulated value; always produced, even when checks fail.
    pub value: T,
    /// One message per failed check.
    pub failures: Vec<String>,
}

impl<T> Checked<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            failures: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.failures.push(message);
    }

    /// Whether every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Minimum of `values`, propagating NaN so a poisoned cell is never hidden.
pub(crate) fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .fold(f64::INFINITY, |m, v| if v < m || v.is_nan() { v } else { m })
}
