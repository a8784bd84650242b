//! Identity map on a rectangle.

use nalgebra::Point2;

use crate::bounds::BoundingBox2;
use crate::domain::Domain;

/// The identity map on a caller-supplied rectangle (default `[-1, 1]^2`).
#[derive(Clone, Copy, Debug)]
pub struct PlanarDomain {
    bounds: BoundingBox2,
}

impl PlanarDomain {
    /// Create a planar domain over `bounds`.
    #[must_use]
    pub fn new(bounds: BoundingBox2) -> Self {
        Self { bounds }
    }
}

impl Default for PlanarDomain {
    fn default() -> Self {
        Self::new(BoundingBox2::from_corners_unchecked([-1.0, -1.0], [1.0, 1.0]))
    }
}

impl Domain for PlanarDomain {
    type Point = Point2<f64>;

    fn bounds(&self) -> BoundingBox2 {
        self.bounds
    }

    fn aspect(&self) -> f64 {
        let e = self.bounds.extents();
        e.x / e.y
    }

    fn map_forward(&self, p: Point2<f64>) -> Point2<f64> {
        p
    }

    fn map_backward(&self, p: &Point2<f64>) -> Point2<f64> {
        *p
    }
}
