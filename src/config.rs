//! Test configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::UniformSource;

/// Options controlling tabulation and evaluation of a [`ChiSquareTest`](crate::ChiSquareTest).
///
/// # Defaults
///
/// | Option | Default |
/// |---|---|
/// | `sample_dim` | `2` |
/// | `sample_count` | `1_000_000` |
/// | `res` | `101` |
/// | `ires` | `4` |
/// | `pooling_threshold` | `5.0` |
/// | `seed` | `0` |
/// | `batch_size` | `16384` |
/// | `uniform_source` | [`UniformSource::Independent`] |
/// | `dump_dir` | `None` |
///
/// # Examples
///
/// ```
/// use chi2test::ChiSquareConfig;
///
/// let config = ChiSquareConfig::default()
///     .sample_count(100_000)
///     .res(31)
///     .seed(7);
/// assert!(config.validate().is_ok());
/// assert!(ChiSquareConfig::default().res(32).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareConfig {
    /// Uniform variates consumed per sample.
    pub sample_dim: usize,
    /// Number of samples drawn for the histogram.
    pub sample_count: usize,
    /// Horizontal grid resolution; must be odd. The vertical resolution is
    /// derived from the domain aspect.
    pub res: usize,
    /// Quadrature nodes per axis per cell; at least 2.
    pub ires: usize,
    /// Minimum expected count per effective cell.
    pub pooling_threshold: f64,
    /// Seed of the uniform input stream.
    pub seed: u64,
    /// Samples processed per tabulation work item.
    pub batch_size: usize,
    /// Source of the uniform variates.
    pub uniform_source: UniformSource,
    /// Directory receiving `chi2_data.json` / `chi2_data.html` on rejection.
    pub dump_dir: Option<PathBuf>,
}

impl Default for ChiSquareConfig {
    fn default() -> Self {
        Self {
            sample_dim: 2,
            sample_count: 1_000_000,
            res: 101,
            ires: 4,
            pooling_threshold: 5.0,
            seed: 0,
            batch_size: 16384,
            uniform_source: UniformSource::Independent,
            dump_dir: None,
        }
    }
}

impl ChiSquareConfig {
    /// Set the number of uniform variates consumed per sample.
    #[must_use]
    pub fn sample_dim(mut self, sample_dim: usize) -> Self {
        self.sample_dim = sample_dim;
        self
    }

    /// Set the number of samples.
    #[must_use]
    pub fn sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Set the horizontal grid resolution (must be odd).
    #[must_use]
    pub fn res(mut self, res: usize) -> Self {
        self.res = res;
        self
    }

    /// Set the number of quadrature nodes per axis per cell.
    #[must_use]
    pub fn ires(mut self, ires: usize) -> Self {
        self.ires = ires;
        self
    }

    /// Set the minimum expected count per effective cell.
    #[must_use]
    pub fn pooling_threshold(mut self, threshold: f64) -> Self {
        self.pooling_threshold = threshold;
        self
    }

    /// Set the seed of the uniform input stream.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of samples per tabulation work item.
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Select where uniform variates come from.
    #[must_use]
    pub fn uniform_source(mut self, source: UniformSource) -> Self {
        self.uniform_source = source;
        self
    }

    /// Write diagnostic files to `dir` when the test rejects.
    #[must_use]
    pub fn dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    /// Check every option.
    ///
    /// # Errors
    ///
    /// - [`Error::EvenResolution`] if `res` is even.
    /// - [`Error::InvalidQuadratureResolution`] if `ires < 2`.
    /// - [`Error::InvalidSampleDim`] if `sample_dim` is zero or exceeds what
    ///   the uniform source provides.
    /// - [`Error::InvalidSampleCount`] if `sample_count` is zero.
    /// - [`Error::InvalidBatchSize`] if `batch_size` is zero.
    /// - [`Error::InvalidPoolingThreshold`] if the threshold is not finite and positive.
    pub fn validate(&self) -> Result<()> {
        if self.res % 2 == 0 {
            return Err(Error::EvenResolution(self.res));
        }
        if self.ires < 2 {
            return Err(Error::InvalidQuadratureResolution(self.ires));
        }
        if self.sample_dim == 0 || self.sample_dim > self.uniform_source.max_dimensions() {
            return Err(Error::InvalidSampleDim(self.sample_dim));
        }
        if self.sample_count == 0 {
            return Err(Error::InvalidSampleCount);
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        if !(self.pooling_threshold.is_finite() && self.pooling_threshold > 0.0) {
            return Err(Error::InvalidPoolingThreshold(self.pooling_threshold));
        }
        Ok(())
    }
}
