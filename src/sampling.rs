//! Sampling strategies under test and the uniform input stream fed to them.

use serde::{Deserialize, Serialize};

use crate::rng_util;

/// Boxed unweighted sampler: uniform variates to a point.
pub type PointFn<P> = Box<dyn Fn(&[f64]) -> P + Send + Sync>;

/// Boxed weighted sampler: uniform variates to a `(point, weight)` pair.
pub type WeightedFn<P> = Box<dyn Fn(&[f64]) -> (P, f64) + Send + Sync>;

/// Boxed density: native point to probability density.
pub type DensityFn<P> = Box<dyn Fn(&P) -> f64 + Send + Sync>;

/// The sampling routine being judged.
///
/// Each call receives `sample_dim` uniform variates in `[0, 1)` and must be
/// deterministic in them. Unweighted samples count as `1.0` in the histogram;
/// weighted samples scatter their weight.
pub enum SampleFn<P> {
    /// Each sample carries unit weight.
    Unweighted(PointFn<P>),
    /// Each sample carries an explicit weight.
    Weighted(WeightedFn<P>),
}

impl<P> SampleFn<P> {
    /// Wrap a sampler that returns bare points.
    pub fn unweighted(f: impl Fn(&[f64]) -> P + Send + Sync + 'static) -> Self {
        Self::Unweighted(Box::new(f))
    }

    /// Wrap a sampler that returns `(point, weight)` pairs.
    pub fn weighted(f: impl Fn(&[f64]) -> (P, f64) + Send + Sync + 'static) -> Self {
        Self::Weighted(Box::new(f))
    }

    /// Draw one sample from `uniforms`.
    #[inline]
    pub(crate) fn call(&self, uniforms: &[f64]) -> (P, f64) {
        match self {
            Self::Unweighted(f) => (f(uniforms), 1.0),
            Self::Weighted(f) => f(uniforms),
        }
    }

    /// Whether samples carry explicit weights.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        matches!(self, Self::Weighted(_))
    }
}

impl<P> core::fmt::Debug for SampleFn<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unweighted(_) => f.write_str("SampleFn::Unweighted(..)"),
            Self::Weighted(_) => f.write_str("SampleFn::Weighted(..)"),
        }
    }
}

/// Where the uniform variates fed to the sampler come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniformSource {
    /// Independent pseudo-random variates; sample `i` uses a generator
    /// seeded from `(seed, i)`.
    #[default]
    Independent,
    /// Owen-scrambled Sobol points (Burley 2020); sample `i` is sequence
    /// index `i`, dimensions `0..sample_dim`.
    ///
    /// Low-discrepancy input makes the histogram closer to the density than
    /// independent sampling would, so p-values skew towards 1.
    ///
    /// Requires the **`sobol`** feature flag.
    #[cfg(feature = "sobol")]
    Sobol,
}

impl UniformSource {
    /// Largest `sample_dim` the source can provide.
    #[must_use]
    pub fn max_dimensions(self) -> usize {
        match self {
            Self::Independent => usize::MAX,
            #[cfg(feature = "sobol")]
            Self::Sobol => sobol_burley::NUM_DIMENSIONS as usize,
        }
    }

    /// Fill `out` with the variates of sample `index`.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn fill(self, seed: u64, index: u64, out: &mut [f64]) {
        match self {
            Self::Independent => rng_util::fill_uniform(seed, index, out),
            #[cfg(feature = "sobol")]
            Self::Sobol => {
                for (dim, u) in out.iter_mut().enumerate() {
                    *u = f64::from(sobol_burley::sample(index as u32, dim as u32, seed as u32));
                }
            }
        }
    }
}
