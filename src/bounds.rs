//! Axis-aligned rectangles in the parameter domain.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A closed axis-aligned rectangle `[min.x, max.x] x [min.y, max.y]`.
///
/// The rectangle is validated on construction and immutable afterwards:
/// both extents are finite and strictly positive.
///
/// # Examples
///
/// ```
/// use chi2test::BoundingBox2;
///
/// let bounds = BoundingBox2::new([-1.0, 0.0], [1.0, 0.5]).unwrap();
/// assert_eq!(bounds.extents().x, 2.0);
/// assert_eq!(bounds.area(), 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl BoundingBox2 {
    /// Create a rectangle from its lower and upper corners.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless `min < max` on both axes and
    /// all coordinates are finite.
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Result<Self> {
        let valid = min.iter().chain(max.iter()).all(|v| v.is_finite())
            && min[0] < max[0]
            && min[1] < max[1];
        if !valid {
            return Err(Error::InvalidBounds {
                min_x: min[0],
                min_y: min[1],
                max_x: max[0],
                max_y: max[1],
            });
        }
        Ok(Self {
            min: Point2::new(min[0], min[1]),
            max: Point2::new(max[0], max[1]),
        })
    }

    /// Callers pass constants already known to be ordered and finite.
    pub(crate) fn from_corners_unchecked(min: [f64; 2], max: [f64; 2]) -> Self {
        Self {
            min: Point2::new(min[0], min[1]),
            max: Point2::new(max[0], max[1]),
        }
    }

    /// The lower corner.
    #[must_use]
    pub fn min(&self) -> Point2<f64> {
        self.min
    }

    /// The upper corner.
    #[must_use]
    pub fn max(&self) -> Point2<f64> {
        self.max
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub fn extents(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// Width times height.
    #[must_use]
    pub fn area(&self) -> f64 {
        let e = self.extents();
        e.x * e.y
    }

    /// Whether `p` lies inside the rectangle grown by `tolerance` times the
    /// extents on every side.
    ///
    /// NaN coordinates are never contained.
    #[must_use]
    pub fn contains_within(&self, p: &Point2<f64>, tolerance: f64) -> bool {
        let eps = self.extents() * tolerance;
        p.x >= self.min.x - eps.x
            && p.x <= self.max.x + eps.x
            && p.y >= self.min.y - eps.y
            && p.y <= self.max.y + eps.y
    }

    /// Map `p` to `[0, 1]^2` relative coordinates (not clamped).
    #[must_use]
    pub fn normalize(&self, p: &Point2<f64>) -> Vector2<f64> {
        (p - self.min).component_div(&self.extents())
    }
}
