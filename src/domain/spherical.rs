//! Unit sphere parameterized by `(phi, -cos theta)`.

use core::f64::consts::PI;

use nalgebra::{Point2, Vector3};

use crate::bounds::BoundingBox2;
use crate::domain::Domain;

/// Maps between unit vectors and the rectangle `[-pi, pi] x [-1, 1]`.
///
/// A rectangle point `(x, y)` corresponds to azimuth `phi = x` and
/// `cos theta = -y`, so equal-area cells in the rectangle are equal-area
/// patches on the sphere. The backward map uses `atan2(y, x)`, whose range
/// `[-pi, pi]` matches the rectangle's horizontal extent.
///
/// The grid aspect is `2`, giving `res x 2 res` cells.
///
/// # Examples
///
/// ```
/// use chi2test::domain::{Domain, SphericalDomain};
/// use nalgebra::Point2;
///
/// let d = SphericalDomain;
/// let v = d.map_forward(Point2::new(0.0, -1.0));
/// assert!((v.z - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SphericalDomain;

impl Domain for SphericalDomain {
    type Point = Vector3<f64>;

    fn bounds(&self) -> BoundingBox2 {
        BoundingBox2::from_corners_unchecked([-PI, -1.0], [PI, 1.0])
    }

    fn aspect(&self) -> f64 {
        2.0
    }

    fn map_forward(&self, p: Point2<f64>) -> Vector3<f64> {
        let cos_theta = -p.y;
        // Clamp so rounding near the poles never takes the root of a negative.
        let sin_theta = cos_theta.mul_add(-cos_theta, 1.0).max(0.0).sqrt();
        let (sin_phi, cos_phi) = p.x.sin_cos();

        Vector3::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta)
    }

    fn map_backward(&self, p: &Vector3<f64>) -> Point2<f64> {
        Point2::new(p.y.atan2(p.x), -p.z)
    }
}
