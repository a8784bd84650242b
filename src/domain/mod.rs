//! Domain adapters between a sampler's native output space and the 2D
//! parameter rectangle used for binning and quadrature.
//!
//! A [`Domain`] supplies the rectangle and two maps:
//!
//! - [`map_backward`](Domain::map_backward) sends sampler output into the
//!   rectangle so it can be binned;
//! - [`map_forward`](Domain::map_forward) sends quadrature nodes from the
//!   rectangle into sampler space so the density is always evaluated on
//!   native coordinates.
//!
//! | Domain | Native point | Rectangle |
//! |---|---|---|
//! | [`LineDomain`] | `f64` | `[a, b] x [-0.5, 0.5]` |
//! | [`PlanarDomain`] | `Point2<f64>` | caller-supplied |
//! | [`SphericalDomain`] | unit `Vector3<f64>` | `[-pi, pi] x [-1, 1]` (`phi`, `-cos theta`) |

pub mod line;
pub mod planar;
pub mod spherical;

use nalgebra::Point2;

use crate::bounds::BoundingBox2;

pub use line::LineDomain;
pub use planar::PlanarDomain;
pub use spherical::SphericalDomain;

/// Conversion between sampler space and the parameter rectangle.
///
/// Implementations must be `Send + Sync` because tabulation calls the maps
/// from a worker pool.
pub trait Domain: Send + Sync {
    /// The sampler's native point type.
    type Point: Send;

    /// The parameter rectangle.
    fn bounds(&self) -> BoundingBox2;

    /// Ratio used to derive the second grid axis from the first.
    ///
    /// A degenerate one-dimensional domain reports `0`, which collapses the
    /// second axis to a single cell.
    fn aspect(&self) -> f64;

    /// Map a rectangle point into sampler space.
    fn map_forward(&self, p: Point2<f64>) -> Self::Point;

    /// Map a sampler-space point into the rectangle.
    fn map_backward(&self, p: &Self::Point) -> Point2<f64>;
}
