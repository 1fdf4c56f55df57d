//! Bowyer–Watson incremental insertion.
//!
//! Inserting a point `p` proceeds in two halves.
//!
//! **Planning** (read-only):
//! 1. locate a triangle containing `p`;
//! 2. stop early if `p` is already one of its vertices;
//! 3. grow the *cavity* breadth-first from that triangle, taking every
//!    reachable triangle whose circumcircle does not have `p` outside it;
//! 4. extract the cavity boundary: facets that appear in exactly one cavity
//!    triangle, found by toggling each facet in a [`SimplexSet`];
//! 5. build one new triangle per boundary facet, with apex `p`, and work out
//!    which new triangles neighbor each other and which border a triangle
//!    outside the cavity.
//!
//! **Commit**: delete the cavity from the arena and graph, add the new
//! triangles, and connect them.
//!
//! Every fallible step happens while planning, so a failed insertion leaves
//! the triangulation exactly as it was.

#![forbid(unsafe_code)]

use crate::core::adjacency::GraphError;
use crate::core::algorithms::locate::{FallbackReason, LocateError, LocateStrategy};
use crate::core::collections::{CAVITY_INLINE_CAPACITY, FastHashSet, SmallBuffer};
use crate::core::facet::Facet;
use crate::core::simplex_set::SimplexSet;
use crate::core::triangle::{Triangle, TriangleError};
use crate::core::triangulation::{TriangleKey, Triangulation, TriangulationError};
use crate::geometry::point::{GeometryError, VectorPoint};
use crate::geometry::predicates::InCircle;
use std::collections::VecDeque;
use thiserror::Error;

/// Result of a successful [`Triangulation::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// The point became a vertex.
    Inserted {
        /// First triangle created; also the next walk's starting point.
        triangle: TriangleKey,
        /// Triangles removed.
        cavity_size: usize,
        /// Triangles created.
        created: usize,
        /// How the point was located.
        strategy: LocateStrategy,
    },
    /// The point was already a vertex; nothing changed.
    Duplicate {
        /// A triangle having the point as a vertex.
        triangle: TriangleKey,
    },
}

impl InsertionOutcome {
    /// Returns `true` if the triangulation changed.
    #[must_use]
    pub const fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Errors that abandon an insertion. The triangulation is unchanged.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum InsertionError {
    /// The point is not two-dimensional.
    #[error("Only 2D points can be inserted, got dimension {found}")]
    Dimension {
        /// Dimension of the rejected point.
        found: usize,
    },

    /// The point has a NaN or infinite coordinate.
    #[error("Point {point} has a non-finite coordinate")]
    NonFinite {
        /// The rejected point.
        point: VectorPoint,
    },

    /// The point is not strictly inside the bootstrap triangle.
    #[error("Point {point} is not strictly inside the bootstrap triangle")]
    OutsideBootstrap {
        /// The rejected point.
        point: VectorPoint,
    },

    /// Point location failed.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// The cavity has no boundary facets.
    #[error("Cavity around {point} has no boundary")]
    EmptyCavityBoundary {
        /// The rejected point.
        point: VectorPoint,
    },

    /// Rebuilding the cavity would create a zero-area triangle.
    #[error("Point {point} is collinear with cavity boundary facet {facet}")]
    DegenerateCavity {
        /// The rejected point.
        point: VectorPoint,
        /// The offending boundary facet.
        facet: Facet,
    },

    /// A geometric predicate failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A triangle could not be built or queried.
    #[error(transparent)]
    Triangle(#[from] TriangleError),

    /// The adjacency graph is inconsistent.
    #[error(transparent)]
    Graph(#[from] GraphError<TriangleKey>),

    /// A key reached through the graph is not in the arena.
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

type Cavity = SmallBuffer<TriangleKey, CAVITY_INLINE_CAPACITY>;

/// Everything the commit phase needs, computed without mutation.
struct InsertionPlan {
    cavity: Cavity,
    triangles: Vec<Triangle>,
    /// Pairs of indices into `triangles` sharing a facet.
    internal: Vec<(usize, usize)>,
    /// `(index into triangles, surviving neighbor)` pairs sharing a facet.
    external: Vec<(usize, TriangleKey)>,
}

impl Triangulation {
    /// Inserts `point`, restoring the Delaunay property.
    ///
    /// # Errors
    ///
    /// Returns an [`InsertionError`] if the point is not a finite 2D point
    /// strictly inside the bootstrap triangle, if it cannot be located, or if
    /// retriangulating the cavity would create a flat triangle. The
    /// triangulation is left unchanged in every error case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut dt = Triangulation::with_extent(10.0).unwrap();
    /// let outcome = dt.insert(point!(1.0, 1.0)).unwrap();
    /// assert!(outcome.is_inserted());
    /// assert_eq!(dt.number_of_triangles(), 3);
    ///
    /// let again = dt.insert(point!(1.0, 1.0)).unwrap();
    /// assert!(matches!(again, InsertionOutcome::Duplicate { .. }));
    /// assert_eq!(dt.number_of_triangles(), 3);
    /// ```
    pub fn insert(&mut self, point: VectorPoint) -> Result<InsertionOutcome, InsertionError> {
        self.check_insertable(&point)?;

        let located = match self.locate(&point) {
            Ok(located) => located,
            Err(err) => {
                self.statistics.location_failures += 1;
                if let LocateError::NotFound { reason, .. } = &err {
                    self.record_walk_failure(*reason);
                }
                return Err(err.into());
            }
        };
        if let LocateStrategy::BruteForce { reason } = located.strategy {
            self.record_walk_failure(reason);
        }

        if self.get(located.triangle)?.contains(&point) {
            self.statistics.duplicates_skipped += 1;
            tracing::debug!(%point, "skipping duplicate point");
            return Ok(InsertionOutcome::Duplicate {
                triangle: located.triangle,
            });
        }

        let plan = self.plan_insertion(&point, located.triangle)?;
        let cavity_size = plan.cavity.len();
        let created = plan.triangles.len();
        let triangle = self.commit(plan)?;

        self.statistics.points_inserted += 1;
        self.statistics.triangles_removed += cavity_size;
        self.statistics.triangles_created += created;
        tracing::debug!(%point, cavity_size, created, "inserted point");

        Ok(InsertionOutcome::Inserted {
            triangle,
            cavity_size,
            created,
            strategy: located.strategy,
        })
    }

    fn check_insertable(&mut self, point: &VectorPoint) -> Result<(), InsertionError> {
        if point.dimension() != 2 {
            return Err(InsertionError::Dimension {
                found: point.dimension(),
            });
        }
        if !point.is_finite() {
            return Err(InsertionError::NonFinite {
                point: point.clone(),
            });
        }
        let signs = point.relation_with_tolerance(&self.bootstrap, self.options.relative_tolerance)?;
        if signs.iter().any(|&s| s >= 0) {
            self.statistics.location_failures += 1;
            return Err(InsertionError::OutsideBootstrap {
                point: point.clone(),
            });
        }
        Ok(())
    }

    fn record_walk_failure(&mut self, reason: FallbackReason) {
        if matches!(reason, FallbackReason::CycleDetected { .. }) {
            self.statistics.cycles_detected += 1;
        }
        if self.options.brute_force_fallback {
            self.statistics.walk_fallbacks += 1;
        }
    }

    /// Triangles reachable from `start` whose circumcircle does not have
    /// `point` outside. `start` itself is always included.
    pub(crate) fn find_cavity(
        &self,
        point: &VectorPoint,
        start: TriangleKey,
    ) -> Result<Cavity, InsertionError> {
        let mut cavity = Cavity::new();
        let mut visited = FastHashSet::default();
        let mut queue = VecDeque::new();

        visited.insert(start);
        cavity.push(start);
        queue.push_back(start);

        while let Some(key) = queue.pop_front() {
            for &neighbor in self.graph.neighbors(&key)? {
                if !visited.insert(neighbor) {
                    continue;
                }
                let triangle = self.get(neighbor)?;
                if point.vs_circumcircle(triangle.vertices())? != InCircle::OUTSIDE {
                    cavity.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        Ok(cavity)
    }

    /// Facets belonging to exactly one triangle of `cavity`.
    pub(crate) fn cavity_boundary(&self, cavity: &[TriangleKey]) -> Result<SimplexSet<Facet>, InsertionError> {
        let mut boundary = SimplexSet::with_capacity(cavity.len() + 2);
        for &key in cavity {
            for (_, facet) in self.get(key)?.facets() {
                boundary.toggle(facet);
            }
        }
        Ok(boundary)
    }

    fn plan_insertion(
        &self,
        point: &VectorPoint,
        start: TriangleKey,
    ) -> Result<InsertionPlan, InsertionError> {
        let cavity = self.find_cavity(point, start)?;
        let boundary = self.cavity_boundary(&cavity)?;
        if boundary.is_empty() {
            return Err(InsertionError::EmptyCavityBoundary {
                point: point.clone(),
            });
        }

        let mut triangles = Vec::with_capacity(boundary.len());
        for facet in &boundary {
            let (a, b) = facet.endpoints();
            let triangle = Triangle::new(a.clone(), b.clone(), point.clone())?;
            let area = triangle.content()?;
            if !area.is_finite() || area == 0.0 {
                return Err(InsertionError::DegenerateCavity {
                    point: point.clone(),
                    facet: facet.clone(),
                });
            }
            triangles.push(triangle);
        }

        let mut internal = Vec::new();
        for i in 0..triangles.len() {
            for j in (i + 1)..triangles.len() {
                if triangles[i].is_neighbor(&triangles[j]) {
                    internal.push((i, j));
                }
            }
        }

        let mut survivors = SimplexSet::new();
        for key in &cavity {
            for &neighbor in self.graph.neighbors(key)? {
                if !cavity.contains(&neighbor) {
                    survivors.insert(neighbor);
                }
            }
        }
        let mut external = Vec::new();
        for &survivor in &survivors {
            let outside = self.get(survivor)?;
            for (i, triangle) in triangles.iter().enumerate() {
                if triangle.is_neighbor(outside) {
                    external.push((i, survivor));
                }
            }
        }

        Ok(InsertionPlan {
            cavity,
            triangles,
            internal,
            external,
        })
    }

    fn commit(&mut self, plan: InsertionPlan) -> Result<TriangleKey, InsertionError> {
        for key in &plan.cavity {
            self.graph.remove_node(key);
            self.triangles.remove(*key);
        }

        let keys: Vec<TriangleKey> = plan
            .triangles
            .into_iter()
            .map(|triangle| {
                let key = self.triangles.insert(triangle);
                self.graph.add_node(key);
                key
            })
            .collect();

        for (i, j) in plan.internal {
            self.graph.add_connection(keys[i], keys[j])?;
        }
        for (i, survivor) in plan.external {
            self.graph.add_connection(keys[i], survivor)?;
        }

        self.most_recent = keys[0];
        Ok(keys[0])
    }
}
