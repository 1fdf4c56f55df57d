//! Invariant checks for [`Triangulation`].
//!
//! | Invariant | Helper |
//! |---|---|
//! | arena and graph hold the same keys | [`Triangulation::validate_storage`] |
//! | adjacency is symmetric and matches shared facets | [`Triangulation::validate_neighbors`] |
//! | triangles are proper and tile the bootstrap triangle | [`Triangulation::validate_coverage`] |
//! | empty circumcircles | [`Triangulation::validate_delaunay`] |
//!
//! [`Triangulation::is_valid`] runs the structural checks and stops at the
//! first failure; [`Triangulation::validation_report`] runs everything and
//! collects all failures.

#![forbid(unsafe_code)]

use crate::core::collections::{FastHashMap, SmallBuffer};
use crate::core::facet::Facet;
use crate::core::triangle::TriangleError;
use crate::core::triangulation::{TriangleKey, Triangulation};
use crate::geometry::point::{GeometryError, VectorPoint};
use crate::geometry::predicates::{InCircle, content};
use std::fmt;
use thiserror::Error;

/// Relative tolerance of the area-sum comparison.
pub const COVERAGE_RELATIVE_TOLERANCE: f64 = 1e-9;

/// A violated invariant.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    /// There are no triangles at all.
    #[error("Triangulation has no triangles")]
    Empty,

    /// A key is in the arena but not the graph, or the other way round.
    #[error("Triangle {key:?} is stored inconsistently (in arena: {in_arena})")]
    StorageMismatch {
        /// The key present on one side only.
        key: TriangleKey,
        /// `true` if the key is in the arena.
        in_arena: bool,
    },

    /// A triangle is adjacent to itself.
    #[error("Triangle {key:?} is its own neighbor")]
    SelfAdjacent {
        /// The offending key.
        key: TriangleKey,
    },

    /// `b` is a neighbor of `a` but not vice versa.
    #[error("Triangle {b:?} is a neighbor of {a:?} but not the reverse")]
    AsymmetricNeighbors {
        /// Triangle listing the neighbor.
        a: TriangleKey,
        /// Triangle not listing `a` back.
        b: TriangleKey,
    },

    /// Adjacent triangles do not share exactly one facet.
    #[error("Triangles {a:?} and {b:?} are adjacent but do not share a facet")]
    NotSharingFacet {
        /// First triangle.
        a: TriangleKey,
        /// Second triangle.
        b: TriangleKey,
    },

    /// Triangles sharing a facet are not adjacent.
    #[error("Triangles {a:?} and {b:?} share facet {facet} but are not adjacent")]
    MissingAdjacency {
        /// First triangle.
        a: TriangleKey,
        /// Second triangle.
        b: TriangleKey,
        /// The shared facet.
        facet: Facet,
    },

    /// More than two triangles share a facet.
    #[error("Facet {facet} is shared by {count} triangles")]
    OverSharedFacet {
        /// The facet.
        facet: Facet,
        /// How many triangles contain it.
        count: usize,
    },

    /// A triangle has zero or non-finite area.
    #[error("Triangle {key:?} is degenerate (area {area})")]
    DegenerateTriangle {
        /// The offending key.
        key: TriangleKey,
        /// Its signed area.
        area: f64,
    },

    /// Triangle areas do not add up to the bootstrap area.
    #[error("Triangle areas sum to {found}, expected {expected}")]
    AreaMismatch {
        /// Area of the bootstrap triangle.
        expected: f64,
        /// Sum of triangle areas.
        found: f64,
    },

    /// A vertex lies strictly inside a triangle's circumcircle.
    #[error("Vertex {vertex} is inside the circumcircle of triangle {key:?}")]
    DelaunayViolation {
        /// The triangle whose circumcircle is not empty.
        key: TriangleKey,
        /// The vertex inside it.
        vertex: VectorPoint,
    },

    /// A predicate failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A triangle query failed.
    #[error(transparent)]
    Triangle(#[from] TriangleError),
}

/// Which check produced an [`InvariantViolation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvariantKind {
    /// [`Triangulation::validate_storage`].
    Storage,
    /// [`Triangulation::validate_neighbors`].
    Neighbors,
    /// [`Triangulation::validate_coverage`].
    Coverage,
    /// [`Triangulation::validate_delaunay`].
    Delaunay,
}

/// One failed check.
#[derive(Clone, Debug, PartialEq)]
pub struct InvariantViolation {
    /// The check that failed.
    pub kind: InvariantKind,
    /// The first violation it found.
    pub error: ValidationError,
}

/// All failed checks of a [`Triangulation::validation_report`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    /// Violations in check order.
    pub violations: Vec<InvariantViolation>,
}

impl ValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} invariant violation(s):", self.violations.len())?;
        for violation in &self.violations {
            writeln!(f, "  {:?}: {}", violation.kind, violation.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl Triangulation {
    /// Checks that the arena and the graph hold exactly the same keys.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] or
    /// [`ValidationError::StorageMismatch`].
    pub fn validate_storage(&self) -> Result<(), ValidationError> {
        if self.triangles.is_empty() {
            return Err(ValidationError::Empty);
        }
        if let Some(key) = self.triangles.keys().find(|k| !self.graph.contains(k)) {
            return Err(ValidationError::StorageMismatch {
                key,
                in_arena: true,
            });
        }
        if let Some(key) = self.graph.nodes().find(|&k| !self.triangles.contains_key(k)) {
            return Err(ValidationError::StorageMismatch {
                key,
                in_arena: false,
            });
        }
        Ok(())
    }

    /// Checks that adjacency is symmetric, irreflexive, and coincides with
    /// facet sharing.
    ///
    /// # Errors
    ///
    /// Returns the first neighbor violation found.
    pub fn validate_neighbors(&self) -> Result<(), ValidationError> {
        for (key, triangle) in &self.triangles {
            let Ok(neighbors) = self.graph.neighbors(&key) else {
                return Err(ValidationError::StorageMismatch {
                    key,
                    in_arena: true,
                });
            };
            for &other in neighbors {
                if other == key {
                    return Err(ValidationError::SelfAdjacent { key });
                }
                if !self.graph.is_connected(&other, &key) {
                    return Err(ValidationError::AsymmetricNeighbors { a: key, b: other });
                }
                let shares_facet = self
                    .triangles
                    .get(other)
                    .is_some_and(|t| triangle.is_neighbor(t));
                if !shares_facet {
                    return Err(ValidationError::NotSharingFacet { a: key, b: other });
                }
            }
        }

        let mut owners: FastHashMap<Facet, SmallBuffer<TriangleKey, 2>> = FastHashMap::default();
        for (key, triangle) in &self.triangles {
            for (_, facet) in triangle.facets() {
                owners.entry(facet).or_default().push(key);
            }
        }
        for (facet, keys) in owners {
            match keys.as_slice() {
                [a, b] => {
                    if !self.graph.is_connected(a, b) {
                        return Err(ValidationError::MissingAdjacency {
                            a: *a,
                            b: *b,
                            facet,
                        });
                    }
                }
                [_] => {}
                _ => {
                    return Err(ValidationError::OverSharedFacet {
                        facet,
                        count: keys.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every triangle has non-zero finite area and that the
    /// areas add up to the bootstrap triangle's.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DegenerateTriangle`] or
    /// [`ValidationError::AreaMismatch`].
    pub fn validate_coverage(&self) -> Result<(), ValidationError> {
        let expected = content(&self.bootstrap)?.abs();
        let mut found = 0.0;
        for (key, triangle) in &self.triangles {
            let area = triangle.content()?;
            if !area.is_finite() || area == 0.0 {
                return Err(ValidationError::DegenerateTriangle { key, area });
            }
            found += area.abs();
        }
        if (found - expected).abs() > COVERAGE_RELATIVE_TOLERANCE * expected {
            return Err(ValidationError::AreaMismatch { expected, found });
        }
        Ok(())
    }

    /// Checks the empty-circumcircle property.
    ///
    /// Tests, for every pair of adjacent triangles, the vertex of one that is
    /// not in the other against the other's circumcircle. For a triangulation
    /// this local test is equivalent to testing every vertex against every
    /// circumcircle.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DelaunayViolation`] for the first vertex
    /// found strictly inside a circumcircle.
    pub fn validate_delaunay(&self) -> Result<(), ValidationError> {
        for (key, triangle) in &self.triangles {
            let Ok(neighbors) = self.graph.neighbors(&key) else {
                continue;
            };
            for &other in neighbors {
                let Some(neighbor) = self.triangles.get(other) else {
                    continue;
                };
                let Some(apex) = neighbor.vertices().iter().find(|v| !triangle.contains(v)) else {
                    continue;
                };
                if apex.vs_circumcircle(triangle.vertices())? == InCircle::INSIDE {
                    return Err(ValidationError::DelaunayViolation {
                        key,
                        vertex: apex.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Runs the structural checks: storage, neighbors and coverage.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn is_valid(&self) -> Result<(), ValidationError> {
        self.validate_storage()?;
        self.validate_neighbors()?;
        self.validate_coverage()
    }

    /// Runs every check, Delaunay included, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationReport`] listing each failed check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut dt = Triangulation::with_extent(100.0).unwrap();
    /// for p in generate_random_points_seeded(20, (-10.0, 10.0), 1).unwrap() {
    ///     dt.insert(p).unwrap();
    /// }
    /// assert!(dt.validation_report().is_ok());
    /// ```
    pub fn validation_report(&self) -> Result<(), ValidationReport> {
        let checks: [(InvariantKind, fn(&Self) -> Result<(), ValidationError>); 4] = [
            (InvariantKind::Storage, Self::validate_storage),
            (InvariantKind::Neighbors, Self::validate_neighbors),
            (InvariantKind::Coverage, Self::validate_coverage),
            (InvariantKind::Delaunay, Self::validate_delaunay),
        ];

        let violations: Vec<_> = checks
            .into_iter()
            .filter_map(|(kind, check)| {
                check(self)
                    .err()
                    .map(|error| InvariantViolation { kind, error })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { violations })
        }
    }
}
