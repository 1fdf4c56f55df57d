//! The triangulation: an arena of triangles plus their adjacency graph.
//!
//! A [`Triangulation`] starts from one bootstrap triangle and only ever grows
//! by [`insert`](Triangulation::insert) (see
//! [`incremental_insertion`](crate::core::algorithms::incremental_insertion)).
//! Triangles live in a [`SlotMap`] keyed by [`TriangleKey`]; the
//! [`AdjacencyGraph`] holds the same keys, with an edge for every shared
//! facet.
//!
//! # Invariants
//!
//! - The arena and the graph hold exactly the same keys.
//! - At least one triangle is always live.
//! - Two triangles are adjacent iff they share a facet.
//! - The live triangles tile the bootstrap triangle.
//!
//! [`validation`](crate::core::validation) checks all of these.

#![forbid(unsafe_code)]

use crate::core::adjacency::{AdjacencyGraph, GraphError};
use crate::core::builder::TriangulationOptions;
use crate::core::collections::FastHashSet;
use crate::core::simplex_set::SimplexSet;
use crate::core::triangle::{Triangle, TriangleError, TriangleId};
use crate::geometry::point::VectorPoint;
use serde::Serialize;
use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Handle of a live triangle in a [`Triangulation`].
    ///
    /// Keys of removed triangles are never reported as live again.
    pub struct TriangleKey;
}

/// Errors from triangulation construction and topology queries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriangulationError {
    /// The bootstrap triangle has zero (or non-finite) area.
    #[error("Bootstrap triangle {triangle} is degenerate")]
    DegenerateBootstrap {
        /// The rejected triangle.
        triangle: TriangleId,
    },

    /// The options are out of range.
    #[error("Invalid triangulation options: {reason}")]
    InvalidOptions {
        /// What is wrong.
        reason: String,
    },

    /// The key does not name a live triangle.
    #[error("Triangle {key:?} is not in the triangulation")]
    MissingTriangle {
        /// The stale key.
        key: TriangleKey,
    },

    /// Walking around a vertex reached the hull before closing the ring.
    #[error("Triangles around {site} do not form a closed ring (starting at {key:?})")]
    OpenRing {
        /// The vertex being circled.
        site: VectorPoint,
        /// The starting triangle.
        key: TriangleKey,
    },

    /// A triangle-level error, e.g. a site that is not a vertex.
    #[error(transparent)]
    Triangle(#[from] TriangleError),

    /// A graph-level error.
    #[error(transparent)]
    Graph(#[from] GraphError<TriangleKey>),
}

/// Cumulative counters maintained by [`Triangulation::insert`].
///
/// The fallback counters are the observable signal that point location left
/// its fast path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InsertionStatistics {
    /// Points that changed the triangulation.
    pub points_inserted: usize,
    /// Points that were already vertices.
    pub duplicates_skipped: usize,
    /// Insertions abandoned because the point could not be located.
    pub location_failures: usize,
    /// Times the walk gave up and a linear scan was attempted.
    pub walk_fallbacks: usize,
    /// Times the walk revisited a triangle.
    pub cycles_detected: usize,
    /// Triangles created by insertions.
    pub triangles_created: usize,
    /// Triangles removed by insertions.
    pub triangles_removed: usize,
}

impl InsertionStatistics {
    /// Returns `true` if any insertion needed the linear-scan fallback.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.walk_fallbacks > 0
    }

    /// Mean number of triangles removed per inserted point.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "counters stay far below 2^52"
    )]
    pub fn mean_cavity_size(&self) -> f64 {
        if self.points_inserted == 0 {
            0.0
        } else {
            self.triangles_removed as f64 / self.points_inserted as f64
        }
    }
}

/// An incremental planar Delaunay triangulation.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::prelude::*;
///
/// let mut dt = Triangulation::with_extent(10.0).unwrap();
/// assert_eq!(dt.number_of_triangles(), 1);
///
/// dt.insert(point!(0.0, 0.0)).unwrap();
/// assert_eq!(dt.number_of_triangles(), 3);
/// assert!(dt.is_valid().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct Triangulation {
    pub(crate) triangles: SlotMap<TriangleKey, Triangle>,
    pub(crate) graph: AdjacencyGraph<TriangleKey>,
    pub(crate) most_recent: TriangleKey,
    pub(crate) bootstrap: [VectorPoint; 3],
    pub(crate) options: TriangulationOptions,
    pub(crate) statistics: InsertionStatistics,
}

impl Triangulation {
    /// Creates a triangulation whose only triangle is `seed`.
    ///
    /// Every later point must fall strictly inside `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::DegenerateBootstrap`] if `seed` has zero
    /// or non-finite area.
    pub fn new(seed: Triangle) -> Result<Self, TriangulationError> {
        Self::with_options(seed, TriangulationOptions::default())
    }

    /// Creates a triangulation bootstrapped by
    /// [`Triangle::bounding(extent)`](Triangle::bounding).
    ///
    /// # Errors
    ///
    /// Returns an error if `extent` does not produce a proper triangle.
    pub fn with_extent(extent: f64) -> Result<Self, TriangulationError> {
        Self::new(Triangle::bounding(extent)?)
    }

    /// Creates a triangulation with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidOptions`] for out-of-range options
    /// and [`TriangulationError::DegenerateBootstrap`] for a flat seed.
    pub fn with_options(
        seed: Triangle,
        options: TriangulationOptions,
    ) -> Result<Self, TriangulationError> {
        options.validate()?;

        let area = seed.content()?;
        if !area.is_finite() || area == 0.0 {
            return Err(TriangulationError::DegenerateBootstrap {
                triangle: seed.id(),
            });
        }

        let v = seed.vertices();
        let bootstrap = [v[0].clone(), v[1].clone(), v[2].clone()];

        let mut triangles = SlotMap::with_key();
        let key = triangles.insert(seed);
        let mut graph = AdjacencyGraph::new();
        graph.add_node(key);

        Ok(Self {
            triangles,
            graph,
            most_recent: key,
            bootstrap,
            options,
            statistics: InsertionStatistics::default(),
        })
    }

    // =========================================================================
    // Storage queries
    // =========================================================================

    /// Returns `true` if `key` names a live triangle.
    #[must_use]
    pub fn contains(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    /// The triangle behind `key`, if it is live.
    #[must_use]
    pub fn triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    pub(crate) fn get(&self, key: TriangleKey) -> Result<&Triangle, TriangulationError> {
        self.triangles
            .get(key)
            .ok_or(TriangulationError::MissingTriangle { key })
    }

    /// Every live triangle with its key.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> + '_ {
        self.triangles.iter()
    }

    /// Every live key.
    pub fn keys(&self) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles.keys()
    }

    /// Number of live triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Distinct vertices of all live triangles, bootstrap vertices included.
    #[must_use]
    pub fn vertices(&self) -> Vec<VectorPoint> {
        let mut seen = FastHashSet::default();
        let mut vertices = Vec::new();
        for triangle in self.triangles.values() {
            for v in triangle.vertices() {
                if seen.insert(v) {
                    vertices.push(v.clone());
                }
            }
        }
        vertices
    }

    /// Number of distinct vertices, bootstrap vertices included.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.triangles
            .values()
            .flat_map(Triangle::vertices)
            .collect::<FastHashSet<_>>()
            .len()
    }

    /// The three corners of the bootstrap triangle.
    #[must_use]
    pub const fn bootstrap_vertices(&self) -> &[VectorPoint; 3] {
        &self.bootstrap
    }

    /// Returns `true` if `point` is a bootstrap corner.
    #[must_use]
    pub fn is_bootstrap_vertex(&self, point: &VectorPoint) -> bool {
        self.bootstrap.contains(point)
    }

    pub(crate) fn touches_bootstrap_triangle(&self, triangle: &Triangle) -> bool {
        triangle
            .vertices()
            .iter()
            .any(|v| self.is_bootstrap_vertex(v))
    }

    /// Returns `true` if the triangle has a bootstrap corner as a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::MissingTriangle`] for a stale key.
    pub fn touches_bootstrap(&self, key: TriangleKey) -> Result<bool, TriangulationError> {
        Ok(self.touches_bootstrap_triangle(self.get(key)?))
    }

    /// Some live triangle having `site` as a vertex.
    ///
    /// The most recent triangle is tried first.
    #[must_use]
    pub fn incident_triangle(&self, site: &VectorPoint) -> Option<TriangleKey> {
        if self
            .triangles
            .get(self.most_recent)
            .is_some_and(|t| t.contains(site))
        {
            return Some(self.most_recent);
        }
        self.triangles
            .iter()
            .find(|(_, t)| t.contains(site))
            .map(|(key, _)| key)
    }

    /// The triangle created first by the latest insertion; the walk starts
    /// here.
    #[must_use]
    pub const fn most_recent(&self) -> TriangleKey {
        self.most_recent
    }

    /// Cumulative insertion counters.
    #[must_use]
    pub const fn statistics(&self) -> &InsertionStatistics {
        &self.statistics
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    // =========================================================================
    // Topology queries
    // =========================================================================

    /// Triangles sharing a facet with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::Graph`] for a stale key.
    pub fn neighbors(&self, key: TriangleKey) -> Result<&SimplexSet<TriangleKey>, TriangulationError> {
        Ok(self.graph.neighbors(&key)?)
    }

    /// The neighbor of `key` across the facet opposite `site`, or `None` when
    /// that facet lies on the hull.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::MissingTriangle`] for a stale key and
    /// [`TriangleError::VertexNotInTriangle`] if `site` is not a vertex of
    /// the triangle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut dt = Triangulation::with_extent(10.0).unwrap();
    /// dt.insert(point!(0.0, 0.0)).unwrap();
    ///
    /// let key = dt.incident_triangle(&point!(0.0, 0.0)).unwrap();
    /// let across = dt.neighbor_opposite(&point!(0.0, 0.0), key).unwrap();
    /// assert!(across.is_none());
    ///
    /// assert!(dt.neighbor_opposite(&point!(1.0, 1.0), key).is_err());
    /// ```
    pub fn neighbor_opposite(
        &self,
        site: &VectorPoint,
        key: TriangleKey,
    ) -> Result<Option<TriangleKey>, TriangulationError> {
        let triangle = self.get(key)?;
        if !triangle.contains(site) {
            return Err(TriangleError::VertexNotInTriangle {
                point: site.clone(),
                triangle: triangle.id(),
            }
            .into());
        }
        Ok(self.neighbor_across(site, key))
    }

    /// Neighbor of `key` lacking `site`. Only meaningful when `site` is a
    /// vertex of `key`; the walk guarantees that.
    pub(crate) fn neighbor_across(&self, site: &VectorPoint, key: TriangleKey) -> Option<TriangleKey> {
        self.graph.neighbors(&key).ok()?.iter().copied().find(|&n| {
            self.triangles
                .get(n)
                .is_some_and(|t| !t.contains(site))
        })
    }

    /// Every triangle incident to `site`, in rotational order starting with
    /// `key`.
    ///
    /// Consecutive entries share a facet, as do the last and the first.
    ///
    /// # Errors
    ///
    /// Returns [`TriangleError::VertexNotInTriangle`] if `site` is not a
    /// vertex of `key`, [`TriangulationError::MissingTriangle`] for a stale
    /// key, and [`TriangulationError::OpenRing`] if the walk reaches the hull,
    /// which happens for bootstrap corners.
    pub fn surrounding_triangles(
        &self,
        site: &VectorPoint,
        key: TriangleKey,
    ) -> Result<Vec<TriangleKey>, TriangulationError> {
        let start = self.get(key)?;
        if !start.contains(site) {
            return Err(TriangleError::VertexNotInTriangle {
                point: site.clone(),
                triangle: start.id(),
            }
            .into());
        }

        let open_ring = || TriangulationError::OpenRing {
            site: site.clone(),
            key,
        };

        let mut ring = Vec::new();
        let mut current = key;
        let mut guide = start.vertex_but_not(&[site])?.clone();
        loop {
            ring.push(current);
            if ring.len() > self.triangles.len() {
                return Err(open_ring());
            }
            let previous = self.get(current)?;
            let next = self.neighbor_across(&guide, current).ok_or_else(open_ring)?;
            guide = previous.vertex_but_not(&[site, &guide])?.clone();
            if next == key {
                return Ok(ring);
            }
            current = next;
        }
    }
}
