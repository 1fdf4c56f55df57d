//! End-to-end insertion scenarios.
//!
//! Fixed point sets with known triangle counts, ring structure and error
//! behavior, checked through the public API only.

use planar_delaunay::prelude::*;

const EXTENT: f64 = 10_000.0;

fn bootstrap() -> Triangulation {
    Triangulation::with_extent(EXTENT).unwrap()
}

fn insert_all(dt: &mut Triangulation, points: &[VectorPoint]) {
    for p in points {
        assert!(
            dt.insert(p.clone()).unwrap().is_inserted(),
            "{p} should be new"
        );
    }
}

fn assert_symmetric(dt: &Triangulation) {
    for key in dt.keys() {
        for &other in dt.neighbors(key).unwrap() {
            assert!(
                dt.neighbors(other).unwrap().contains(&key),
                "{other:?} does not list {key:?} back"
            );
        }
    }
}

// =============================================================================
// TRIANGLE COUNTS
// =============================================================================

#[test]
fn single_point_makes_a_fan_of_three() {
    let mut dt = bootstrap();
    let seed = dt.most_recent();
    assert_eq!(
        dt.bootstrap_vertices(),
        &[
            point!(-EXTENT, -EXTENT),
            point!(EXTENT, -EXTENT),
            point!(0.0, EXTENT)
        ]
    );

    dt.insert(point!(0.0, 0.0)).unwrap();

    assert_eq!(dt.number_of_triangles(), 3);
    assert!(!dt.contains(seed));
    let keys: Vec<_> = dt.keys().collect();
    for &key in &keys {
        assert!(dt.triangle(key).unwrap().contains(&point!(0.0, 0.0)));
        let neighbors = dt.neighbors(key).unwrap();
        assert_eq!(neighbors.len(), 2);
        for &other in &keys {
            if other != key {
                assert!(neighbors.contains(&other));
            }
        }
    }
    dt.is_valid().unwrap();
}

#[test]
fn square_corners_give_one_plus_two_n() {
    let mut dt = bootstrap();
    let square = [
        point!(0.0, 0.0),
        point!(5.0, 0.0),
        point!(0.0, 5.0),
        point!(5.0, 5.0),
    ];
    insert_all(&mut dt, &square);

    assert_eq!(dt.number_of_triangles(), 9);
    assert_eq!(dt.number_of_vertices(), 7);
    assert_symmetric(&dt);
    dt.validation_report().unwrap();

    // The square itself is split into two triangles.
    let inner: Vec<_> = dt
        .triangles()
        .filter(|(key, _)| !dt.touches_bootstrap(*key).unwrap())
        .collect();
    assert_eq!(inner.len(), 2);
}

#[test]
fn count_grows_by_two_per_point() {
    let mut dt = bootstrap();
    let points = generate_random_points_seeded(200, (-500.0, 500.0), 0xD1EA).unwrap();
    for (i, p) in points.into_iter().enumerate() {
        dt.insert(p).unwrap();
        assert_eq!(dt.number_of_triangles(), 1 + 2 * (i + 1));
    }
    dt.validation_report().unwrap();
    assert_eq!(dt.statistics().points_inserted, 200);
}

// =============================================================================
// RINGS AND NEIGHBOR QUERIES
// =============================================================================

#[test]
fn ring_around_last_point_matches_its_fan() {
    let mut dt = bootstrap();
    let points = [
        point!(-20.0, -10.0),
        point!(20.0, -12.0),
        point!(18.0, 15.0),
        point!(-22.0, 14.0),
        point!(1.0, 2.0),
    ];
    insert_all(&mut dt, &points);

    let site = &points[4];
    let fan: Vec<_> = dt
        .triangles()
        .filter(|(_, t)| t.contains(site))
        .map(|(key, _)| key)
        .collect();
    assert_eq!(fan.len(), 4);

    let start = dt.most_recent();
    assert!(dt.triangle(start).unwrap().contains(site));
    let ring = dt.surrounding_triangles(site, start).unwrap();

    assert_eq!(ring.len(), fan.len());
    assert_eq!(ring[0], start);
    for key in &fan {
        assert!(ring.contains(key));
    }
    for (i, &key) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        assert!(dt.neighbors(key).unwrap().contains(&next));
        assert!(
            dt.triangle(key)
                .unwrap()
                .is_neighbor(dt.triangle(next).unwrap())
        );
    }
}

#[test]
fn neighbor_opposite_requires_membership() {
    let mut dt = bootstrap();
    insert_all(&mut dt, &[point!(0.0, 0.0), point!(3.0, 1.0)]);
    let key = dt.most_recent();

    let outsider = point!(123.0, 456.0);
    assert!(!dt.triangle(key).unwrap().contains(&outsider));
    assert!(matches!(
        dt.neighbor_opposite(&outsider, key),
        Err(TriangulationError::Triangle(
            TriangleError::VertexNotInTriangle { .. }
        ))
    ));
    assert!(matches!(
        dt.surrounding_triangles(&outsider, key),
        Err(TriangulationError::Triangle(
            TriangleError::VertexNotInTriangle { .. }
        ))
    ));
}

// =============================================================================
// IDEMPOTENCE AND FAILURE ATOMICITY
// =============================================================================

#[test]
fn reinserting_a_vertex_changes_nothing() {
    let mut dt = bootstrap();
    let points = generate_random_points_seeded(30, (-100.0, 100.0), 5).unwrap();
    insert_all(&mut dt, &points);

    let keys_before: Vec<_> = dt.keys().collect();
    let neighbors_before: Vec<_> = keys_before
        .iter()
        .map(|&k| dt.neighbors(k).unwrap().clone())
        .collect();

    for p in &points {
        assert!(matches!(
            dt.insert(p.clone()).unwrap(),
            InsertionOutcome::Duplicate { .. }
        ));
    }

    assert_eq!(dt.keys().collect::<Vec<_>>(), keys_before);
    for (key, before) in keys_before.iter().zip(&neighbors_before) {
        assert_eq!(dt.neighbors(*key).unwrap(), before);
    }
    assert_eq!(dt.statistics().duplicates_skipped, points.len());
}

#[test]
fn rejected_points_leave_the_triangulation_untouched() {
    let mut dt = bootstrap();
    insert_all(&mut dt, &[point!(0.0, 0.0), point!(1.0, 1.0)]);
    let keys_before: Vec<_> = dt.keys().collect();
    let recent = dt.most_recent();

    for bad in [
        point!(2.0 * EXTENT, 0.0),
        point!(0.0, EXTENT),
        point!(f64::INFINITY, 0.0),
        point!(1.0, 2.0, 3.0),
    ] {
        assert!(dt.insert(bad).is_err());
    }

    assert_eq!(dt.keys().collect::<Vec<_>>(), keys_before);
    assert_eq!(dt.most_recent(), recent);
    assert_eq!(dt.statistics().points_inserted, 2);
    dt.is_valid().unwrap();
}

// =============================================================================
// NEAR-DEGENERATE INPUT
// =============================================================================

#[test]
fn near_collinear_input_survives_walk_cycles() {
    let mut dt = Triangulation::with_extent(100.0).unwrap();
    for x in 0..20_i32 {
        dt.insert(point!(f64::from(x - 10), 0.0)).unwrap();
    }

    let mut cycled = 0;
    for x in 0..20_i32 {
        let p = point!(f64::from(x - 10) + 1e-9, 1e-9);
        if let InsertionOutcome::Inserted {
            strategy:
                LocateStrategy::BruteForce {
                    reason: FallbackReason::CycleDetected { .. },
                },
            ..
        } = dt.insert(p).unwrap()
        {
            cycled += 1;
        }
    }

    let stats = dt.statistics();
    assert_eq!(stats.points_inserted, 40);
    assert!(stats.cycles_detected > 0);
    assert_eq!(stats.cycles_detected, cycled);
    assert!(stats.walk_fallbacks >= stats.cycles_detected);
    assert!(stats.used_fallback());
    assert_eq!(dt.number_of_triangles(), 1 + 2 * 40);
    dt.is_valid().unwrap();
}

// =============================================================================
// LOCATION
// =============================================================================

#[test]
fn locate_finds_a_containing_triangle_before_insertion() {
    let mut dt = bootstrap();
    let points = generate_random_points_seeded(50, (-1_000.0, 1_000.0), 99).unwrap();
    let queries = generate_random_points_seeded(50, (-1_000.0, 1_000.0), 100).unwrap();
    insert_all(&mut dt, &points);

    for q in &queries {
        let found = dt.locate(q).unwrap();
        let triangle = dt.triangle(found.triangle).unwrap();
        assert!(
            q.is_outside(triangle.vertices()).unwrap().is_none(),
            "{q} is outside {triangle}"
        );
    }
}

#[test]
fn locating_outside_the_bootstrap_reports_why() {
    let mut dt = bootstrap();
    dt.insert(point!(0.0, 0.0)).unwrap();
    match dt.locate(&point!(0.0, -2.0 * EXTENT)) {
        Err(LocateError::NotFound { reason, .. }) => {
            assert!(matches!(reason, FallbackReason::WalkExhausted { .. }));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}
