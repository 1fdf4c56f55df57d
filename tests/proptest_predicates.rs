//! Property-based tests for geometric predicates.
//!
//! Covers properties that must hold for every non-degenerate triangle:
//! - content changes sign when two vertices are swapped
//! - the centroid is strictly inside, far points are outside
//! - the circumcenter is equidistant from the vertices
//! - circumcircle classification agrees with the circumcenter distance

use approx::assert_relative_eq;
use planar_delaunay::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for generating finite f64 coordinates in a reasonable range
fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-1000.0..1000.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

/// Strategy for generating 2D points
fn point_2d() -> impl Strategy<Value = VectorPoint> {
    prop::array::uniform2(finite_coordinate()).prop_map(VectorPoint::new)
}

/// Strategy for triangles whose area is not tiny relative to their size
fn proper_triangle() -> impl Strategy<Value = [VectorPoint; 3]> {
    (point_2d(), point_2d(), point_2d())
        .prop_map(|(a, b, c)| [a, b, c])
        .prop_filter("triangle must be well shaped", |t| {
            let area = content(t).unwrap().abs();
            let longest = (0..3)
                .map(|i| t[i].distance(&t[(i + 1) % 3]).unwrap())
                .fold(0.0, f64::max);
            area > 1e-3 * longest * longest && area > 1.0
        })
}

fn centroid(t: &[VectorPoint; 3]) -> VectorPoint {
    VectorPoint::new([
        (t[0][0] + t[1][0] + t[2][0]) / 3.0,
        (t[0][1] + t[1][1] + t[2][1]) / 3.0,
    ])
}

// =============================================================================
// ORIENTATION PROPERTY TESTS
// =============================================================================

proptest! {
    /// Property: swapping two vertices negates the signed content.
    #[test]
    fn prop_content_sign_flip(t in proper_triangle()) {
        let swapped = [t[0].clone(), t[2].clone(), t[1].clone()];
        let a = content(&t).unwrap();
        let b = content(&swapped).unwrap();
        assert_relative_eq!(a, -b, max_relative = 1e-12);
    }

    /// Property: the centroid is strictly inside regardless of orientation.
    #[test]
    fn prop_centroid_is_inside(t in proper_triangle()) {
        let c = centroid(&t);
        prop_assert!(c.is_inside(&t).unwrap());
        prop_assert!(c.is_outside(&t).unwrap().is_none());
        prop_assert!(c.is_on(&t).unwrap().is_none());

        let swapped = [t[1].clone(), t[0].clone(), t[2].clone()];
        prop_assert!(c.is_inside(&swapped).unwrap());
    }

    /// Property: a point pushed past a vertex, away from the centroid, is
    /// outside some facet.
    #[test]
    fn prop_reflected_point_is_outside(t in proper_triangle()) {
        let c = centroid(&t);
        let beyond = VectorPoint::new([
            3.0f64.mul_add(t[0][0] - c[0], c[0]),
            3.0f64.mul_add(t[0][1] - c[1], c[1]),
        ]);
        let signs = beyond.relation(&t).unwrap();
        prop_assert!(signs.iter().any(|&s| s > 0));
        prop_assert!(beyond.is_outside(&t).unwrap().is_some());
        prop_assert!(!beyond.is_inside(&t).unwrap());
    }

    /// Property: vertices sit on their own triangle's boundary.
    #[test]
    fn prop_vertices_are_on_the_boundary(t in proper_triangle()) {
        for v in &t {
            prop_assert!(v.is_outside(&t).unwrap().is_none());
            prop_assert!(v.is_on(&t).unwrap().is_some());
            prop_assert!(!v.is_inside(&t).unwrap());
        }
    }
}

// =============================================================================
// CIRCUMCIRCLE PROPERTY TESTS
// =============================================================================

proptest! {
    /// Property: the circumcenter is equidistant from all three vertices.
    #[test]
    fn prop_circumcenter_equidistant(t in proper_triangle()) {
        let center = circumcenter(&t).unwrap();
        let r0 = center.distance(&t[0]).unwrap();
        for v in &t[1..] {
            assert_relative_eq!(center.distance(v).unwrap(), r0, max_relative = 1e-6);
        }
    }

    /// Property: the circumcenter is inside the circumcircle and a point two
    /// radii away is outside, for either orientation.
    #[test]
    fn prop_circumcircle_classification(t in proper_triangle(), angle in 0.0..std::f64::consts::TAU) {
        let center = circumcenter(&t).unwrap();
        let r = center.distance(&t[0]).unwrap();
        let far = VectorPoint::new([
            (2.0 * r).mul_add(angle.cos(), center[0]),
            (2.0 * r).mul_add(angle.sin(), center[1]),
        ]);
        let reversed = [t[2].clone(), t[1].clone(), t[0].clone()];

        for simplex in [&t, &reversed] {
            prop_assert_eq!(center.vs_circumcircle(simplex).unwrap(), InCircle::INSIDE);
            prop_assert_eq!(far.vs_circumcircle(simplex).unwrap(), InCircle::OUTSIDE);
        }
    }

    /// Property: the triangle's cached circumcenter matches the free function.
    #[test]
    fn prop_cached_circumcenter_matches(t in proper_triangle()) {
        let [a, b, c] = t.clone();
        let triangle = Triangle::new(a, b, c).unwrap();
        let cached = triangle.circumcenter().unwrap();
        let direct = circumcenter(&t).unwrap();
        let scale = direct.magnitude().max(1.0);
        prop_assert!(cached.distance(&direct).unwrap() <= 1e-9 * scale);
    }
}

// =============================================================================
// FIXED CONFIGURATIONS
// =============================================================================

#[test]
fn square_corner_is_on_the_circle() {
    let square = [point!(0.0, 0.0), point!(4.0, 0.0), point!(4.0, 4.0)];
    assert_eq!(
        point!(0.0, 4.0).vs_circumcircle(&square).unwrap(),
        InCircle::BOUNDARY
    );
    assert_eq!(InCircle::BOUNDARY.sign(), 0);
    assert_eq!(
        point!(2.0, 2.0).vs_circumcircle(&square).unwrap().sign(),
        -1
    );
    assert_eq!(
        point!(9.0, 9.0).vs_circumcircle(&square).unwrap().sign(),
        1
    );
}
