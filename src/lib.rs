#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Pearson chi-square goodness-of-fit tests for Monte Carlo sampling
//! routines.
//!
//! A sampler maps uniform variates to points of some domain (a line, a
//! plane, the unit sphere) and claims to produce them with a known density.
//! [`ChiSquareTest`] checks that claim: it draws many samples, bins them on
//! a grid over the domain's parameter rectangle, integrates the density over
//! the same cells and compares observed with expected counts. Sparse cells
//! are pooled so every effective cell has a reasonable expected count.
//!
//! # Getting Started
//!
//! ```
//! use chi2test::prelude::*;
//! use nalgebra::Vector3;
//!
//! // Uniform sampling of the unit sphere.
//! let sampler = |u: &[f64]| {
//!     let z = 1.0 - 2.0 * u[0];
//!     let r = (1.0 - z * z).max(0.0).sqrt();
//!     let phi = 2.0 * std::f64::consts::PI * u[1];
//!     Vector3::new(r * phi.cos(), r * phi.sin(), z)
//! };
//! let pdf = |_: &Vector3<f64>| 1.0 / (4.0 * std::f64::consts::PI);
//!
//! let config = ChiSquareConfig::default().sample_count(200_000).res(21);
//! let sampler = SampleFn::unweighted(sampler);
//! let mut test = ChiSquareTest::with_config(SphericalDomain, sampler, pdf, config)?;
//! assert!(test.run(0.01, 1)?, "{}", test.messages());
//! # Ok::<(), chi2test::Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Domain`](domain::Domain) | Maps points between the sampler's space and a 2D parameter rectangle. |
//! | [`SampleFn`] | The routine under test, optionally returning a weight per sample. |
//! | [`ChiSquareConfig`] | Sample count, grid resolution, quadrature order, pooling threshold, seed. |
//! | [`ChiSquareTest`] | Tabulates, evaluates and decides; keeps a [`MessageLog`] of everything it found. |
//! | [`TestResult`] | Statistic, degrees of freedom, p-value and [`Decision`] of a run. |
//! | [`DiagnosticDump`] | Both tables of a rejected run, exportable as JSON and an HTML heatmap page. |
//!
//! # Stages
//!
//! A test can be driven in one call with [`ChiSquareTest::run`] or stage by
//! stage:
//!
//! 1. [`tabulate_histogram`](ChiSquareTest::tabulate_histogram) draws and bins the samples.
//! 2. [`tabulate_pdf`](ChiSquareTest::tabulate_pdf) integrates the density per cell.
//! 3. [`evaluate`](ChiSquareTest::evaluate) pools cells and computes the statistic and p-value.
//! 4. [`run`](ChiSquareTest::run) applies the Šidák correction and decides.
//!
//! Either table can also be supplied directly with
//! [`set_histogram`](ChiSquareTest::set_histogram) and
//! [`set_pdf`](ChiSquareTest::set_pdf).
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `sobol` | [`UniformSource::Sobol`]: Owen-scrambled Sobol variates instead of independent ones | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) after each stage | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod bounds;
pub mod checks;
pub mod chi2;
mod chisquare;
mod config;
pub mod density;
pub mod domain;
pub mod dump;
mod error;
mod grid;
pub mod histogram;
mod report;
mod rng_util;
pub mod sampling;

pub use bounds::BoundingBox2;
pub use chisquare::{ChiSquareTest, Stage};
pub use config::ChiSquareConfig;
pub use dump::DiagnosticDump;
pub use error::{Error, Result};
pub use grid::Grid;
pub use report::{Decision, MessageLog, TestResult};
pub use sampling::{SampleFn, UniformSource};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use chi2test::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::BoundingBox2;
    pub use crate::chisquare::{ChiSquareTest, Stage};
    pub use crate::config::ChiSquareConfig;
    pub use crate::domain::{Domain, LineDomain, PlanarDomain, SphericalDomain};
    pub use crate::dump::DiagnosticDump;
    pub use crate::error::{Error, Result};
    pub use crate::report::{Decision, TestResult};
    pub use crate::sampling::{SampleFn, UniformSource};
}
