//! Canonical facets (edges) of planar triangles.
//!
//! A facet is identified purely by its two endpoints. Endpoints are stored in
//! canonical order so `(a, b)` and `(b, a)` compare and hash equal, which is
//! what boundary extraction needs: a facet shared by two cavity triangles must
//! cancel out no matter which triangle reports it first.

#![forbid(unsafe_code)]

use crate::geometry::point::VectorPoint;
use serde::Serialize;
use std::fmt;

/// An undirected edge between two distinct points.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::facet::Facet;
/// use planar_delaunay::point;
///
/// let ab = Facet::new(point!(1.0, 0.0), point!(0.0, 0.0));
/// let ba = Facet::new(point!(0.0, 0.0), point!(1.0, 0.0));
/// assert_eq!(ab, ba);
/// assert_eq!(ab.v0(), &point!(0.0, 0.0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Facet {
    v0: VectorPoint,
    v1: VectorPoint,
}

impl Facet {
    /// Creates a canonical facet; endpoints are reordered so that `v0 <= v1`.
    #[must_use]
    pub fn new(a: VectorPoint, b: VectorPoint) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// The smaller endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(&self) -> &VectorPoint {
        &self.v0
    }

    /// The larger endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(&self) -> &VectorPoint {
        &self.v1
    }

    /// Both endpoints in canonical order.
    #[inline]
    #[must_use]
    pub const fn endpoints(&self) -> (&VectorPoint, &VectorPoint) {
        (&self.v0, &self.v1)
    }

    /// Returns `true` if `point` is one of the endpoints.
    #[must_use]
    pub fn contains(&self, point: &VectorPoint) -> bool {
        &self.v0 == point || &self.v1 == point
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.v0.distance(&self.v1).unwrap_or(f64::NAN)
    }
}

impl From<(VectorPoint, VectorPoint)> for Facet {
    fn from((a, b): (VectorPoint, VectorPoint)) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} - {}]", self.v0, self.v1)
    }
}
