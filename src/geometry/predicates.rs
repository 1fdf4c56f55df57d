//! Geometric predicates for n-dimensional simplices.
//!
//! All predicates evaluate `f64` determinants. The only tolerance is the
//! relative epsilon used by [`VectorPoint::relation_with_tolerance`]: a minor
//! whose magnitude is at most `tolerance · |content|` counts as zero. This is
//! not an exact or adaptive scheme; nearly collinear or nearly cocircular
//! inputs can be classified inconsistently.

#![forbid(unsafe_code)]

use crate::geometry::matrix::{cross, determinant};
use crate::geometry::point::{GeometryError, VectorPoint};
use num_traits::cast;
use smallvec::SmallVec;
use std::fmt;

/// Default relative tolerance for [`VectorPoint::relation`].
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1.0e-6;

/// One signed indicator per simplex vertex, as produced by
/// [`VectorPoint::relation`].
///
/// Entry `j` is `+1` when the point lies strictly outside the facet opposite
/// vertex `j`, `0` when it lies on that facet's hyperplane, `-1` otherwise.
pub type RelationSigns = SmallVec<[i8; 4]>;

/// Position of a point relative to a circumcircle (or circumsphere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InCircle {
    /// The point is inside the circumcircle
    INSIDE,
    /// The point is on the circumcircle
    BOUNDARY,
    /// The point is outside the circumcircle
    OUTSIDE,
}

impl InCircle {
    /// `-1` inside, `0` on the boundary, `+1` outside.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::INSIDE => -1,
            Self::BOUNDARY => 0,
            Self::OUTSIDE => 1,
        }
    }

    const fn from_determinant(det: f64) -> Self {
        if det < 0.0 {
            Self::INSIDE
        } else if det > 0.0 {
            Self::OUTSIDE
        } else {
            Self::BOUNDARY
        }
    }

    const fn flipped(self) -> Self {
        match self {
            Self::INSIDE => Self::OUTSIDE,
            Self::BOUNDARY => Self::BOUNDARY,
            Self::OUTSIDE => Self::INSIDE,
        }
    }
}

impl fmt::Display for InCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::INSIDE => write!(f, "INSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::OUTSIDE => write!(f, "OUTSIDE"),
        }
    }
}

/// Checks that `simplex` has `dimension + 1` vertices, all of `dimension`.
fn check_simplex(simplex: &[VectorPoint], dimension: usize) -> Result<(), GeometryError> {
    if simplex.len() != dimension + 1 {
        return Err(GeometryError::SimplexSize {
            dimension,
            expected: dimension + 1,
            found: simplex.len(),
        });
    }
    if let Some(bad) = simplex.iter().find(|v| v.dimension() != dimension) {
        return Err(GeometryError::DimensionMismatch {
            expected: dimension,
            found: bad.dimension(),
        });
    }
    Ok(())
}

/// Signed content (area in 2D, volume in 3D) of a simplex.
///
/// Positive for counter-clockwise triangles.
///
/// # Errors
///
/// Returns an error unless `simplex` has `n + 1` vertices of dimension `n`.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::predicates::content;
/// use planar_delaunay::point;
///
/// let ccw = [point!(0.0, 0.0), point!(4.0, 0.0), point!(0.0, 3.0)];
/// assert_eq!(content(&ccw).unwrap(), 6.0);
/// ```
pub fn content(simplex: &[VectorPoint]) -> Result<f64, GeometryError> {
    let dimension = simplex.first().map_or(0, VectorPoint::dimension);
    check_simplex(simplex, dimension)?;

    let rows: SmallVec<[VectorPoint; 4]> = simplex.iter().map(|v| v.extend(&[1.0])).collect();
    let factorial: f64 = (1..=dimension)
        .map(|i| cast::<usize, f64>(i).unwrap_or(f64::INFINITY))
        .product();
    Ok(determinant(&rows)? / factorial)
}

/// Circumcenter of a simplex: the point equidistant from all its vertices.
///
/// Intersects the perpendicular bisectors of consecutive vertex pairs with a
/// generalized cross product and projects the homogeneous result back.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateSimplex`] when the vertices are affinely
/// dependent, or a shape error unless `simplex` has `n + 1` vertices of
/// dimension `n`.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::predicates::circumcenter;
/// use planar_delaunay::point;
///
/// let right = [point!(0.0, 0.0), point!(2.0, 0.0), point!(0.0, 2.0)];
/// assert_eq!(circumcenter(&right).unwrap(), point!(1.0, 1.0));
/// ```
pub fn circumcenter(simplex: &[VectorPoint]) -> Result<VectorPoint, GeometryError> {
    let dimension = simplex.first().map_or(0, VectorPoint::dimension);
    check_simplex(simplex, dimension)?;

    let bisectors = simplex
        .windows(2)
        .map(|pair| pair[0].bisector(&pair[1]))
        .collect::<Result<SmallVec<[VectorPoint; 4]>, _>>()?;
    let homogeneous = cross(&bisectors)?;

    let last = homogeneous[dimension];
    if last == 0.0 || !last.is_finite() {
        return Err(GeometryError::DegenerateSimplex);
    }
    Ok(VectorPoint::new(
        homogeneous.coords()[..dimension].iter().map(|c| c / last),
    ))
}

impl VectorPoint {
    /// Position of this point relative to each facet of `simplex`, using
    /// [`DEFAULT_RELATIVE_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::point;
    ///
    /// let triangle = [point!(0.0, 0.0), point!(4.0, 0.0), point!(0.0, 4.0)];
    /// assert_eq!(point!(1.0, 1.0).relation(&triangle).unwrap().as_slice(), &[-1, -1, -1]);
    /// // Beyond the hypotenuse, i.e. outside the facet opposite vertex 0.
    /// assert_eq!(point!(3.0, 3.0).relation(&triangle).unwrap().as_slice(), &[1, -1, -1]);
    /// ```
    pub fn relation(&self, simplex: &[VectorPoint]) -> Result<RelationSigns, GeometryError> {
        self.relation_with_tolerance(simplex, DEFAULT_RELATIVE_TOLERANCE)
    }

    /// Position of this point relative to each facet of `simplex`.
    ///
    /// Builds the matrix whose first row is all ones and whose row `i + 1` is
    /// `[self_i, s0_i, s1_i, ...]`; component 0 of its cross product is the
    /// simplex content `c` and component `j + 1` is the negated content of
    /// the simplex with this point substituted for vertex `j`. A component
    /// whose magnitude is at most `tolerance · |c|` maps to `0`. Signs are
    /// normalized so that the simplex orientation does not matter.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    pub fn relation_with_tolerance(
        &self,
        simplex: &[VectorPoint],
        tolerance: f64,
    ) -> Result<RelationSigns, GeometryError> {
        let dimension = self.dimension();
        check_simplex(simplex, dimension)?;

        let mut rows: SmallVec<[VectorPoint; 4]> = SmallVec::with_capacity(dimension + 1);
        rows.push(VectorPoint::new(std::iter::repeat_n(1.0, dimension + 2)));
        for i in 0..dimension {
            rows.push(VectorPoint::new(
                std::iter::once(self[i]).chain(simplex.iter().map(|v| v[i])),
            ));
        }

        let areas = cross(&rows)?;
        let simplex_content = areas[0];
        let threshold = tolerance * simplex_content.abs();
        let mut signs: RelationSigns = areas.coords()[1..]
            .iter()
            .map(|&value| {
                if value.abs() <= threshold {
                    0
                } else if value < 0.0 {
                    -1
                } else {
                    1
                }
            })
            .collect();

        if simplex_content < 0.0 {
            signs.iter_mut().for_each(|s| *s = -*s);
        } else if simplex_content == 0.0 {
            signs.iter_mut().for_each(|s| *s = s.abs());
        }
        Ok(signs)
    }

    /// Returns the vertex of `simplex` whose opposite facet this point lies
    /// strictly outside of, or `None` if the point is inside or on the
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    pub fn is_outside<'s>(
        &self,
        simplex: &'s [VectorPoint],
    ) -> Result<Option<&'s VectorPoint>, GeometryError> {
        self.is_outside_with_tolerance(simplex, DEFAULT_RELATIVE_TOLERANCE)
    }

    /// [`is_outside`](Self::is_outside) with an explicit relative tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    pub fn is_outside_with_tolerance<'s>(
        &self,
        simplex: &'s [VectorPoint],
        tolerance: f64,
    ) -> Result<Option<&'s VectorPoint>, GeometryError> {
        let signs = self.relation_with_tolerance(simplex, tolerance)?;
        Ok(signs
            .iter()
            .position(|&s| s > 0)
            .map(|index| &simplex[index]))
    }

    /// If this point lies on the boundary of `simplex`, returns a witness
    /// vertex whose opposite facet contains it; `None` for interior or
    /// exterior points.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    pub fn is_on<'s>(
        &self,
        simplex: &'s [VectorPoint],
    ) -> Result<Option<&'s VectorPoint>, GeometryError> {
        let signs = self.relation(simplex)?;
        if signs.iter().any(|&s| s > 0) {
            return Ok(None);
        }
        Ok(signs
            .iter()
            .rposition(|&s| s == 0)
            .map(|index| &simplex[index]))
    }

    /// Returns `true` if this point is strictly inside `simplex`.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    pub fn is_inside(&self, simplex: &[VectorPoint]) -> Result<bool, GeometryError> {
        Ok(self.relation(simplex)?.iter().all(|&s| s < 0))
    }

    /// Position of this point relative to the circumcircle of `simplex`.
    ///
    /// Evaluates the lifted-paraboloid determinant of rows `[v, 1, v·v]` for
    /// each vertex followed by this point, then corrects for the simplex's
    /// orientation. The comparison against zero is exact.
    ///
    /// # Errors
    ///
    /// Returns an error unless `simplex` has `n + 1` vertices of this point's
    /// dimension `n`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::geometry::predicates::InCircle;
    /// use planar_delaunay::point;
    ///
    /// let triangle = [point!(0.0, 0.0), point!(2.0, 0.0), point!(0.0, 2.0)];
    /// assert_eq!(point!(1.0, 1.0).vs_circumcircle(&triangle).unwrap(), InCircle::INSIDE);
    /// assert_eq!(point!(2.0, 2.0).vs_circumcircle(&triangle).unwrap(), InCircle::BOUNDARY);
    /// assert_eq!(point!(3.0, 3.0).vs_circumcircle(&triangle).unwrap(), InCircle::OUTSIDE);
    /// ```
    pub fn vs_circumcircle(&self, simplex: &[VectorPoint]) -> Result<InCircle, GeometryError> {
        check_simplex(simplex, self.dimension())?;

        let lift = |v: &VectorPoint| v.extend(&[1.0, v.dot_unchecked(v)]);
        let rows: SmallVec<[VectorPoint; 4]> =
            simplex.iter().chain(std::iter::once(self)).map(lift).collect();

        let result = InCircle::from_determinant(determinant(&rows)?);
        if content(simplex)? < 0.0 {
            Ok(result.flipped())
        } else {
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;
    use approx::assert_relative_eq;

    fn ccw_triangle() -> [VectorPoint; 3] {
        [point!(0.0, 0.0), point!(4.0, 0.0), point!(0.0, 4.0)]
    }

    #[test]
    fn content_sign_follows_orientation() {
        let [a, b, c] = ccw_triangle();
        assert_relative_eq!(content(&[a.clone(), b.clone(), c.clone()]).unwrap(), 8.0);
        assert_relative_eq!(content(&[a, c, b]).unwrap(), -8.0);
    }

    #[test]
    fn content_of_tetrahedron() {
        let tet = [
            point!(0.0, 0.0, 0.0),
            point!(1.0, 0.0, 0.0),
            point!(0.0, 1.0, 0.0),
            point!(0.0, 0.0, 1.0),
        ];
        assert_relative_eq!(content(&tet).unwrap().abs(), 1.0 / 6.0);
    }

    #[test]
    fn relation_is_orientation_independent() {
        let [a, b, c] = ccw_triangle();
        let cw = [a.clone(), c.clone(), b.clone()];
        let ccw = [a, b, c];
        let p = point!(6.0, -1.0);

        // Outside the hypotenuse and below the x axis.
        let r_ccw = p.relation(&ccw).unwrap();
        assert_eq!(r_ccw.as_slice(), &[1, -1, 1]);
        let r_cw = p.relation(&cw).unwrap();
        assert_eq!(r_cw.as_slice(), &[1, 1, -1]);
    }

    #[test]
    fn relation_marks_points_on_facets() {
        let simplex = ccw_triangle();
        let on_edge = point!(2.0, 0.0);
        assert_eq!(on_edge.relation(&simplex).unwrap().as_slice(), &[-1, -1, 0]);
        assert_eq!(on_edge.is_on(&simplex).unwrap(), Some(&simplex[2]));
        assert_eq!(on_edge.is_outside(&simplex).unwrap(), None);
        assert!(!on_edge.is_inside(&simplex).unwrap());

        // A vertex lies on two facets.
        let corner = point!(4.0, 0.0);
        assert_eq!(corner.relation(&simplex).unwrap().as_slice(), &[0, -1, 0]);
    }

    #[test]
    fn relation_tolerance_is_relative_to_content() {
        let simplex = ccw_triangle();
        let nearly_on = point!(2.0, -1e-9);
        assert_eq!(nearly_on.is_outside(&simplex).unwrap(), None);
        assert_eq!(
            nearly_on
                .is_outside_with_tolerance(&simplex, 0.0)
                .unwrap(),
            Some(&simplex[2])
        );
    }

    #[test]
    fn interior_and_exterior_classification() {
        let simplex = ccw_triangle();
        let inside = point!(1.0, 1.0);
        assert!(inside.is_inside(&simplex).unwrap());
        assert_eq!(inside.is_on(&simplex).unwrap(), None);
        assert_eq!(inside.is_outside(&simplex).unwrap(), None);

        let outside = point!(-1.0, 1.0);
        assert_eq!(outside.is_outside(&simplex).unwrap(), Some(&simplex[1]));
        assert_eq!(outside.is_on(&simplex).unwrap(), None);
    }

    #[test]
    fn degenerate_simplex_relation_is_non_negative() {
        let flat = [point!(0.0, 0.0), point!(1.0, 0.0), point!(2.0, 0.0)];
        let signs = point!(0.5, 1.0).relation(&flat).unwrap();
        assert!(signs.iter().all(|&s| s >= 0));
    }

    #[test]
    fn circumcircle_of_square_corners() {
        let simplex = [point!(0.0, 0.0), point!(1.0, 0.0), point!(1.0, 1.0)];
        assert_eq!(
            point!(0.0, 1.0).vs_circumcircle(&simplex).unwrap(),
            InCircle::BOUNDARY
        );
        assert_eq!(
            point!(0.5, 0.5).vs_circumcircle(&simplex).unwrap(),
            InCircle::INSIDE
        );
        assert_eq!(
            point!(2.0, 2.0).vs_circumcircle(&simplex).unwrap(),
            InCircle::OUTSIDE
        );

        // Reversing the orientation must not change the answer.
        let reversed = [simplex[2].clone(), simplex[1].clone(), simplex[0].clone()];
        assert_eq!(
            point!(0.5, 0.5).vs_circumcircle(&reversed).unwrap(),
            InCircle::INSIDE
        );
        assert_eq!(InCircle::INSIDE.sign(), -1);
        assert_eq!(InCircle::OUTSIDE.to_string(), "OUTSIDE");
    }

    #[test]
    fn circumcenter_is_equidistant() {
        let simplex = [point!(0.3, -1.2), point!(4.1, 0.7), point!(-0.5, 3.3)];
        let center = circumcenter(&simplex).unwrap();
        let r0 = center.distance(&simplex[0]).unwrap();
        for v in &simplex[1..] {
            assert_relative_eq!(center.distance(v).unwrap(), r0, max_relative = 1e-9);
        }
    }

    #[test]
    fn circumcenter_of_collinear_points_fails() {
        let flat = [point!(0.0, 0.0), point!(1.0, 1.0), point!(2.0, 2.0)];
        assert_eq!(circumcenter(&flat), Err(GeometryError::DegenerateSimplex));
    }

    #[test]
    fn predicates_reject_malformed_simplices() {
        let p = point!(0.0, 0.0);
        let too_small = [point!(1.0, 0.0), point!(0.0, 1.0)];
        assert!(matches!(
            p.relation(&too_small),
            Err(GeometryError::SimplexSize { expected: 3, found: 2, .. })
        ));

        let mixed = [point!(1.0, 0.0), point!(0.0, 1.0), point!(1.0, 1.0, 1.0)];
        assert!(matches!(
            p.vs_circumcircle(&mixed),
            Err(GeometryError::DimensionMismatch { .. })
        ));
    }
}
