//! # planar-delaunay
//!
//! Incremental Delaunay triangulation of points in the plane, with Voronoi
//! cell extraction.
//!
//! A [`Triangulation`](core::triangulation::Triangulation) starts as one
//! large bootstrap triangle that must enclose every point you will insert.
//! Each [`insert`](core::triangulation::Triangulation::insert):
//!
//! 1. walks the triangle adjacency graph from the most recently created
//!    triangle to one containing the point, falling back to a linear scan if
//!    the walk fails;
//! 2. collects the Bowyer–Watson cavity, the connected set of triangles whose
//!    circumcircle does not have the point outside it;
//! 3. replaces the cavity with a fan of triangles from the point to the cavity
//!    boundary.
//!
//! Insertion is all-or-nothing: every check runs before the first mutation.
//!
//! # Basic Usage
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let mut dt = Triangulation::with_extent(10_000.0).unwrap();
//! for p in [point!(0.0, 0.0), point!(10.0, 0.0), point!(5.0, 8.0), point!(4.0, 3.0)] {
//!     dt.insert(p).unwrap();
//! }
//!
//! // Every interior insertion adds two triangles.
//! assert_eq!(dt.number_of_triangles(), 1 + 2 * 4);
//! assert!(dt.validation_report().is_ok());
//!
//! // The cell of an interior site is a closed polygon of circumcenters.
//! let site = point!(4.0, 3.0);
//! let cell = dt.voronoi_cell(&site, dt.incident_triangle(&site).unwrap()).unwrap();
//! assert_eq!(cell.polygon.len(), cell.triangles.len());
//! ```
//!
//! # Numerics
//!
//! Predicates evaluate `f64` determinants. The orientation test
//! ([`VectorPoint::relation`](geometry::point::VectorPoint::relation)) treats
//! values within a relative tolerance of zero as zero; the circumcircle test
//! compares against zero exactly. There is no adaptive-precision arithmetic,
//! so nearly degenerate input can make the walk cycle. The walk detects that,
//! logs it through [`tracing`], and falls back to a linear scan; the
//! [`InsertionStatistics`](core::triangulation::InsertionStatistics) counters
//! record every fallback.
//!
//! # Logging
//!
//! The crate emits `tracing` events (`warn` for fallbacks and location
//! failures, `debug` per insertion, `trace` per walk step) and never installs
//! a subscriber.

#![forbid(unsafe_code)]

/// Triangles, their adjacency, and the triangulation built from them.
pub mod core {
    /// Point location and incremental insertion.
    pub mod algorithms {
        /// Bowyer–Watson cavity insertion.
        pub mod incremental_insertion;
        /// Walking and brute-force point location.
        pub mod locate;
    }
    pub mod adjacency;
    pub mod builder;
    pub mod collections;
    pub mod facet;
    pub mod simplex_set;
    pub mod triangle;
    pub mod triangulation;
    pub mod validation;
    pub mod voronoi;

    pub use adjacency::*;
    pub use algorithms::incremental_insertion::*;
    pub use algorithms::locate::*;
    pub use builder::*;
    pub use facet::*;
    pub use simplex_set::*;
    pub use triangle::*;
    pub use triangulation::*;
    pub use validation::*;
    pub use voronoi::*;
    // collections is not re-exported here; use the prelude or the full path.
}

/// Points, small dense matrix helpers and geometric predicates.
pub mod geometry {
    pub mod matrix;
    pub mod point;
    pub mod point_generation;
    pub mod predicates;

    pub use matrix::*;
    pub use point::*;
    pub use point_generation::*;
    pub use predicates::*;
}

/// Re-exports of the commonly used types and the [`point!`] macro.
pub mod prelude {
    pub use crate::core::{
        adjacency::*, algorithms::incremental_insertion::*, algorithms::locate::*, builder::*,
        facet::*, simplex_set::*, triangle::*, triangulation::*, validation::*, voronoi::*,
    };

    pub use crate::core::collections::{FastHashMap, FastHashSet, SmallBuffer};

    pub use crate::geometry::{matrix::*, point::*, point_generation::*, predicates::*};

    pub use crate::point;
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            adjacency::AdjacencyGraph,
            triangle::Triangle,
            triangulation::{TriangleKey, Triangulation},
        },
        geometry::point::VectorPoint,
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<VectorPoint>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<AdjacencyGraph<TriangleKey>>());
        assert!(is_normal::<Triangulation>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = FastHashMap::default();
        map.insert(123, 456);
        assert_eq!(map.get(&123), Some(&456));

        let mut set: FastHashSet<u64> = FastHashSet::default();
        set.insert(789);
        assert!(set.contains(&789));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let mut dt = TriangulationBuilder::with_extent(10.0).build().unwrap();
        assert!(dt.insert(point!(1.0, 1.0)).unwrap().is_inserted());
        assert_eq!(
            point!(0.0, 0.0).vs_circumcircle(&[point!(1.0, 0.0), point!(0.0, 1.0), point!(-1.0, 0.0)]).unwrap(),
            InCircle::INSIDE
        );
    }
}
