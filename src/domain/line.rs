//! Identity map on a line segment.

use nalgebra::Point2;

use crate::bounds::BoundingBox2;
use crate::domain::Domain;
use crate::error::Result;

/// The identity map on `[min, max]`, embedded in the thin rectangle
/// `[min, max] x [-0.5, 0.5]`.
///
/// Samples are `f64`; the backward map places them on `y = 0`, so the
/// histogram has a single row.
///
/// # Examples
///
/// ```
/// use chi2test::domain::{Domain, LineDomain};
///
/// let domain = LineDomain::default();
/// assert_eq!(domain.aspect(), 0.0);
/// assert_eq!(domain.bounds().area(), 2.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LineDomain {
    bounds: BoundingBox2,
}

impl LineDomain {
    /// Create a line domain over `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`](crate::Error::InvalidBounds) if
    /// `min >= max` or either end is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        Ok(Self {
            bounds: BoundingBox2::new([min, -0.5], [max, 0.5])?,
        })
    }
}

impl Default for LineDomain {
    fn default() -> Self {
        Self {
            bounds: BoundingBox2::from_corners_unchecked([-1.0, -0.5], [1.0, 0.5]),
        }
    }
}

impl Domain for LineDomain {
    type Point = f64;

    fn bounds(&self) -> BoundingBox2 {
        self.bounds
    }

    fn aspect(&self) -> f64 {
        0.0
    }

    fn map_forward(&self, p: Point2<f64>) -> f64 {
        p.x
    }

    fn map_backward(&self, p: &f64) -> Point2<f64> {
        Point2::new(*p, 0.0)
    }
}
