#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

mod accept;
mod failures;
mod reject;
mod stages;

use core::f64::consts::PI;

use chi2test::prelude::*;
use nalgebra::{Point2, Vector3};

pub(crate) fn uniform_sphere(u: &[f64]) -> Vector3<f64> {
    let z = 1.0 - 2.0 * u[0];
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u[1];
    Vector3::new(r * phi.cos(), r * phi.sin(), z)
}

pub(crate) fn cosine_hemisphere(u: &[f64]) -> Vector3<f64> {
    let r = u[0].sqrt();
    let phi = 2.0 * PI * u[1];
    Vector3::new(r * phi.cos(), r * phi.sin(), (1.0 - r * r).max(0.0).sqrt())
}

pub(crate) fn cosine_hemisphere_pdf(v: &Vector3<f64>) -> f64 {
    if v.z > 0.0 { v.z / PI } else { 0.0 }
}

pub(crate) fn uniform_square(u: &[f64]) -> Point2<f64> {
    Point2::new(2.0 * u[0] - 1.0, 2.0 * u[1] - 1.0)
}

pub(crate) fn small_config() -> ChiSquareConfig {
    ChiSquareConfig::default().sample_count(100_000).res(21)
}
