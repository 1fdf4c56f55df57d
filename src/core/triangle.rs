//! Triangles: the 2-simplices of a planar triangulation.
//!
//! A [`Triangle`] has exactly three distinct 2D vertices and an identity.
//! Equality and hashing use a [`TriangleId`] drawn from a process-wide
//! counter, never the vertex coordinates: two triangles with the same
//! vertices created separately are different triangles. Incremental
//! insertion relies on this to tell the triangles it is about to delete from
//! the ones it just built, even when they coincide for a moment.

#![forbid(unsafe_code)]

use crate::core::facet::Facet;
use crate::core::simplex_set::SimplexSet;
use crate::geometry::point::{GeometryError, VectorPoint};
use crate::geometry::predicates::{circumcenter, content};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Number of vertices of a triangle.
pub const TRIANGLE_VERTEX_COUNT: usize = 3;

/// Dimension of triangle vertices.
pub const TRIANGLE_DIMENSION: usize = 2;

static NEXT_TRIANGLE_ID: AtomicU64 = AtomicU64::new(0);

/// Creation-order identity of a [`Triangle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(u64);

impl TriangleId {
    fn next() -> Self {
        Self(NEXT_TRIANGLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw sequence number.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Errors from triangle construction and membership queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriangleError {
    /// Construction did not receive exactly three distinct vertices.
    #[error("A triangle needs exactly 3 distinct vertices, got {found}")]
    VertexCount {
        /// Number of distinct vertices supplied.
        found: usize,
    },

    /// A vertex is not two-dimensional.
    #[error("Triangle vertices must be {TRIANGLE_DIMENSION}-dimensional, got {found}")]
    Dimension {
        /// Dimension of the offending vertex.
        found: usize,
    },

    /// The point is not one of the triangle's vertices.
    #[error("Point {point} is not a vertex of triangle {triangle}")]
    VertexNotInTriangle {
        /// The queried point.
        point: VectorPoint,
        /// The triangle that was queried.
        triangle: TriangleId,
    },

    /// Every vertex was excluded.
    #[error("Every vertex of triangle {triangle} is excluded")]
    NoRemainingVertex {
        /// The triangle that was queried.
        triangle: TriangleId,
    },

    /// A geometric computation on the triangle failed.
    #[error("Geometry error on triangle {triangle}: {source}")]
    Geometry {
        /// The triangle being evaluated.
        triangle: TriangleId,
        /// The underlying error.
        #[source]
        source: GeometryError,
    },
}

/// A triangle with identity semantics and a cached circumcenter.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::triangle::Triangle;
/// use planar_delaunay::point;
///
/// let a = Triangle::new(point!(0.0, 0.0), point!(1.0, 0.0), point!(0.0, 1.0)).unwrap();
/// let b = Triangle::new(point!(0.0, 0.0), point!(1.0, 0.0), point!(0.0, 1.0)).unwrap();
/// assert_ne!(a, b);
/// assert!(a.contains(&point!(1.0, 0.0)));
/// ```
pub struct Triangle {
    id: TriangleId,
    vertices: SimplexSet<VectorPoint>,
    circumcenter: OnceLock<VectorPoint>,
}

impl Triangle {
    /// Creates a triangle from three vertices.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::VertexCount`] if two vertices are equal, or
    /// [`TriangleError::Dimension`] if a vertex is not 2D.
    pub fn new(a: VectorPoint, b: VectorPoint, c: VectorPoint) -> Result<Self, TriangleError> {
        Self::from_vertices([a, b, c])
    }

    /// Creates a triangle from any collection of vertices.
    ///
    /// Duplicates collapse before counting, so the collection must contain
    /// exactly three distinct points.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::VertexCount`] unless there are exactly three
    /// distinct vertices, or [`TriangleError::Dimension`] if a vertex is not
    /// 2D.
    pub fn from_vertices<I>(vertices: I) -> Result<Self, TriangleError>
    where
        I: IntoIterator<Item = VectorPoint>,
    {
        let vertices: SimplexSet<VectorPoint> = vertices.into_iter().collect();
        if vertices.len() != TRIANGLE_VERTEX_COUNT {
            return Err(TriangleError::VertexCount {
                found: vertices.len(),
            });
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| v.dimension() != TRIANGLE_DIMENSION)
        {
            return Err(TriangleError::Dimension {
                found: bad.dimension(),
            });
        }
        Ok(Self {
            id: TriangleId::next(),
            vertices,
            circumcenter: OnceLock::new(),
        })
    }

    /// The square-ish bootstrap triangle `((-e, -e), (e, -e), (0, e))`.
    ///
    /// The largest centered square it contains is the open square
    /// `(-e/3, e/3)²`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::VertexCount`] if `extent` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::triangle::Triangle;
    /// use planar_delaunay::point;
    ///
    /// let big = Triangle::bounding(10_000.0).unwrap();
    /// assert!(point!(0.0, 0.0).is_inside(big.vertices()).unwrap());
    /// ```
    pub fn bounding(extent: f64) -> Result<Self, TriangleError> {
        Self::new(
            VectorPoint::new([-extent, -extent]),
            VectorPoint::new([extent, -extent]),
            VectorPoint::new([0.0, extent]),
        )
    }

    /// Creation-order identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> TriangleId {
        self.id
    }

    /// The three vertices in construction order.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[VectorPoint] {
        self.vertices.as_slice()
    }

    /// Returns `true` if `point` is a vertex.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &VectorPoint) -> bool {
        self.vertices.contains(point)
    }

    /// Returns the first vertex not in `excluded`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::NoRemainingVertex`] if every vertex is
    /// excluded.
    pub fn vertex_but_not(&self, excluded: &[&VectorPoint]) -> Result<&VectorPoint, TriangleError> {
        self.vertices
            .iter()
            .find(|v| !excluded.contains(v))
            .ok_or(TriangleError::NoRemainingVertex { triangle: self.id })
    }

    /// Returns `true` if the two triangles share exactly one facet, i.e.
    /// exactly one vertex of `self` is missing from `other`.
    #[must_use]
    pub fn is_neighbor(&self, other: &Self) -> bool {
        self.vertices.iter().filter(|v| !other.contains(v)).count() == 1
    }

    /// The facet opposite `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::VertexNotInTriangle`] if `vertex` is not a
    /// vertex of this triangle.
    pub fn facet_opposite(&self, vertex: &VectorPoint) -> Result<Facet, TriangleError> {
        let index = self
            .vertices
            .position(vertex)
            .ok_or_else(|| TriangleError::VertexNotInTriangle {
                point: vertex.clone(),
                triangle: self.id,
            })?;
        Ok(self.facet_opposite_index(index))
    }

    fn facet_opposite_index(&self, index: usize) -> Facet {
        let v = self.vertices();
        Facet::new(
            v[(index + 1) % TRIANGLE_VERTEX_COUNT].clone(),
            v[(index + 2) % TRIANGLE_VERTEX_COUNT].clone(),
        )
    }

    /// The three `(opposite vertex, facet)` pairs.
    pub fn facets(&self) -> impl Iterator<Item = (&VectorPoint, Facet)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, vertex)| (vertex, self.facet_opposite_index(index)))
    }

    /// Circumcenter, computed on first use and cached.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::Geometry`] for collinear vertices, which have
    /// no circumcenter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::triangle::Triangle;
    /// use planar_delaunay::point;
    ///
    /// let t = Triangle::new(point!(0.0, 0.0), point!(4.0, 0.0), point!(0.0, 4.0)).unwrap();
    /// assert_eq!(t.circumcenter().unwrap(), &point!(2.0, 2.0));
    /// ```
    pub fn circumcenter(&self) -> Result<&VectorPoint, TriangleError> {
        if let Some(center) = self.circumcenter.get() {
            return Ok(center);
        }
        let center = circumcenter(self.vertices()).map_err(|source| TriangleError::Geometry {
            triangle: self.id,
            source,
        })?;
        Ok(self.circumcenter.get_or_init(|| center))
    }

    /// Signed area; positive when the vertices are counter-clockwise.
    ///
    /// # Errors
    ///
    /// Never fails for a constructed triangle; the `Result` carries the
    /// predicate's shape check.
    pub fn content(&self) -> Result<f64, TriangleError> {
        content(self.vertices()).map_err(|source| TriangleError::Geometry {
            triangle: self.id,
            source,
        })
    }
}

impl Clone for Triangle {
    /// Clones keep the identity of the original.
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            vertices: self.vertices.clone(),
            circumcenter: self.circumcenter.clone(),
        }
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Triangle {}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangle")
            .field("id", &self.id)
            .field("vertices", &self.vertices)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.vertices();
        write!(f, "{}[{}, {}, {}]", self.id, v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;
    use approx::assert_relative_eq;

    fn sample() -> Triangle {
        Triangle::new(point!(0.0, 0.0), point!(2.0, 0.0), point!(0.0, 2.0)).unwrap()
    }

    #[test]
    fn construction_requires_three_distinct_2d_vertices() {
        assert!(sample().vertices().len() == 3);

        assert_eq!(
            Triangle::new(point!(0.0, 0.0), point!(0.0, 0.0), point!(1.0, 1.0)).unwrap_err(),
            TriangleError::VertexCount { found: 2 }
        );
        assert_eq!(
            Triangle::from_vertices([
                point!(0.0, 0.0),
                point!(1.0, 0.0),
                point!(0.0, 1.0),
                point!(1.0, 1.0),
            ])
            .unwrap_err(),
            TriangleError::VertexCount { found: 4 }
        );
        assert_eq!(
            Triangle::new(point!(0.0, 0.0, 0.0), point!(1.0, 0.0, 0.0), point!(0.0, 1.0, 0.0))
                .unwrap_err(),
            TriangleError::Dimension { found: 3 }
        );
    }

    #[test]
    fn identity_semantics() {
        let a = sample();
        let b = sample();
        assert_ne!(a, b);
        assert!(a.id() < b.id());
        assert_eq!(a, a.clone());
    }

    #[test]
    fn vertex_but_not_skips_excluded() {
        let t = sample();
        let v = t.vertices().to_vec();
        assert_eq!(t.vertex_but_not(&[]).unwrap(), &v[0]);
        assert_eq!(t.vertex_but_not(&[&v[0]]).unwrap(), &v[1]);
        assert_eq!(t.vertex_but_not(&[&v[0], &v[1]]).unwrap(), &v[2]);
        assert_eq!(
            t.vertex_but_not(&[&v[0], &v[1], &v[2]]).unwrap_err(),
            TriangleError::NoRemainingVertex { triangle: t.id() }
        );
    }

    #[test]
    fn neighbors_share_exactly_one_facet() {
        let t = sample();
        let across = Triangle::new(point!(2.0, 0.0), point!(0.0, 2.0), point!(2.0, 2.0)).unwrap();
        let corner = Triangle::new(point!(0.0, 0.0), point!(-1.0, 0.0), point!(0.0, -1.0)).unwrap();
        let twin = sample();

        assert!(t.is_neighbor(&across));
        assert!(across.is_neighbor(&t));
        assert!(!t.is_neighbor(&corner));
        assert!(!t.is_neighbor(&twin));
        assert!(!t.is_neighbor(&t));
    }

    #[test]
    fn facet_opposite_vertex() {
        let t = sample();
        let facet = t.facet_opposite(&point!(0.0, 0.0)).unwrap();
        assert_eq!(facet, Facet::new(point!(0.0, 2.0), point!(2.0, 0.0)));
        assert!(matches!(
            t.facet_opposite(&point!(5.0, 5.0)),
            Err(TriangleError::VertexNotInTriangle { .. })
        ));

        let facets: Vec<_> = t.facets().collect();
        assert_eq!(facets.len(), 3);
        for (vertex, facet) in facets {
            assert!(!facet.contains(vertex));
        }
    }

    #[test]
    fn circumcenter_is_cached_and_equidistant() {
        let t = Triangle::new(point!(0.5, -0.25), point!(3.0, 1.0), point!(-1.0, 2.5)).unwrap();
        let first = t.circumcenter().unwrap().clone();
        let second = t.circumcenter().unwrap();
        assert_eq!(&first, second);

        let r = first.distance(&t.vertices()[0]).unwrap();
        for v in t.vertices() {
            assert_relative_eq!(first.distance(v).unwrap(), r, max_relative = 1e-9);
        }
    }

    #[test]
    fn collinear_triangle_has_no_circumcenter() {
        let flat = Triangle::new(point!(0.0, 0.0), point!(1.0, 0.0), point!(2.0, 0.0)).unwrap();
        assert!(matches!(
            flat.circumcenter(),
            Err(TriangleError::Geometry {
                source: GeometryError::DegenerateSimplex,
                ..
            })
        ));
        assert_relative_eq!(flat.content().unwrap(), 0.0);
    }

    #[test]
    fn bounding_triangle_contains_the_third_extent_square() {
        let big = Triangle::bounding(100.0).unwrap();
        assert!(big.content().unwrap() > 0.0);
        let half = 100.0 / 3.0 - 1.0;
        for corner in [
            point!(-half, -half),
            point!(half, -half),
            point!(half, half),
            point!(-half, half),
        ] {
            assert!(corner.is_inside(big.vertices()).unwrap());
        }
        // The right edge passes through (25.5, 49), so the half-extent
        // square does not fit.
        assert!(point!(49.0, 49.0).is_outside(big.vertices()).unwrap().is_some());
        assert!(Triangle::bounding(0.0).is_err());
    }
}
