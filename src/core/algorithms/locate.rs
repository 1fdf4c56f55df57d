//! Point location: find a triangle containing a query point.
//!
//! # Algorithm
//!
//! The walk starts at the most recently created triangle and repeatedly asks
//! which vertex the query point lies beyond
//! ([`VectorPoint::is_outside`]). If there is none, the current triangle
//! contains the point. Otherwise the walk crosses the facet opposite that
//! vertex. Recently created triangles cluster around the last inserted point,
//! so spatially coherent input needs only a few steps.
//!
//! The walk gives up when it revisits a triangle (floating-point noise can
//! make the orientation tests disagree about a shared facet) or when it would
//! step off the hull. It then falls back to a linear scan unless
//! [`TriangulationOptions::brute_force_fallback`] is off. Both give-ups are
//! logged with `tracing::warn!` and reported in the [`LocateResult`].
//!
//! [`TriangulationOptions::brute_force_fallback`]: crate::core::builder::TriangulationOptions::brute_force_fallback

#![forbid(unsafe_code)]

use crate::core::collections::FastHashSet;
use crate::core::triangulation::{TriangleKey, Triangulation};
use crate::geometry::point::{GeometryError, VectorPoint};

/// Why the walk was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The walk revisited a triangle.
    CycleDetected {
        /// Steps taken before the revisit.
        steps: usize,
    },
    /// The walk reached a hull facet with the point beyond it.
    WalkExhausted {
        /// Steps taken before reaching the hull.
        steps: usize,
    },
    /// The starting triangle is no longer live.
    InvalidHint,
}

/// How a point was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStrategy {
    /// The walk succeeded.
    Walk {
        /// Facets crossed.
        steps: usize,
    },
    /// The linear scan succeeded after the walk was abandoned.
    BruteForce {
        /// Why the walk was abandoned.
        reason: FallbackReason,
    },
}

impl LocateStrategy {
    /// Returns `true` if the linear scan was needed.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::BruteForce { .. })
    }
}

/// A successful location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateResult {
    /// A triangle containing the point, boundary included.
    pub triangle: TriangleKey,
    /// How it was found.
    pub strategy: LocateStrategy,
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LocateError {
    /// Triangulation has no triangles.
    #[error("Cannot locate in an empty triangulation")]
    EmptyTriangulation,

    /// No triangle contains the point.
    #[error("No triangle contains {point} (walk abandoned: {reason:?})")]
    NotFound {
        /// The query point.
        point: VectorPoint,
        /// Why the walk was abandoned.
        reason: FallbackReason,
    },

    /// The point is unusable for the orientation test.
    #[error("Predicate error: {source}")]
    Geometry {
        /// The underlying error.
        #[from]
        source: GeometryError,
    },
}

enum WalkOutcome {
    Found { key: TriangleKey, steps: usize },
    Abandoned(FallbackReason),
}

impl Triangulation {
    /// Finds a triangle containing `point` (on its boundary counts).
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Geometry`] if `point` is not 2D, and
    /// [`LocateError::NotFound`] if neither the walk nor, when enabled, the
    /// linear scan finds a containing triangle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut dt = Triangulation::with_extent(10.0).unwrap();
    /// dt.insert(point!(0.0, 0.0)).unwrap();
    ///
    /// let found = dt.locate(&point!(1.0, -2.0)).unwrap();
    /// assert!(point!(1.0, -2.0).is_inside(dt.triangle(found.triangle).unwrap().vertices()).unwrap());
    /// assert!(!found.strategy.is_fallback());
    /// ```
    pub fn locate(&self, point: &VectorPoint) -> Result<LocateResult, LocateError> {
        if self.triangles.is_empty() {
            return Err(LocateError::EmptyTriangulation);
        }
        if point.dimension() != 2 {
            return Err(GeometryError::DimensionMismatch {
                expected: 2,
                found: point.dimension(),
            }
            .into());
        }

        let reason = if self.triangles.contains_key(self.most_recent) {
            match self.walk(point, self.most_recent)? {
                WalkOutcome::Found { key, steps } => {
                    return Ok(LocateResult {
                        triangle: key,
                        strategy: LocateStrategy::Walk { steps },
                    });
                }
                WalkOutcome::Abandoned(reason) => reason,
            }
        } else {
            FallbackReason::InvalidHint
        };

        if !self.options.brute_force_fallback {
            tracing::warn!(%point, ?reason, "walk abandoned and brute-force fallback disabled");
            return Err(LocateError::NotFound {
                point: point.clone(),
                reason,
            });
        }

        tracing::warn!(%point, ?reason, "walk abandoned; falling back to linear scan");
        match self.scan(point)? {
            Some(key) => Ok(LocateResult {
                triangle: key,
                strategy: LocateStrategy::BruteForce { reason },
            }),
            None => {
                tracing::warn!(%point, "point location failed");
                Err(LocateError::NotFound {
                    point: point.clone(),
                    reason,
                })
            }
        }
    }

    fn walk(&self, point: &VectorPoint, start: TriangleKey) -> Result<WalkOutcome, GeometryError> {
        let tolerance = self.options.relative_tolerance;
        let mut visited = FastHashSet::default();
        let mut current = start;
        let mut steps = 0;

        loop {
            if !visited.insert(current) {
                tracing::warn!(%point, steps, "cycle detected while walking");
                return Ok(WalkOutcome::Abandoned(FallbackReason::CycleDetected {
                    steps,
                }));
            }
            let Some(triangle) = self.triangles.get(current) else {
                return Ok(WalkOutcome::Abandoned(FallbackReason::InvalidHint));
            };
            let Some(corner) = point.is_outside_with_tolerance(triangle.vertices(), tolerance)?
            else {
                return Ok(WalkOutcome::Found {
                    key: current,
                    steps,
                });
            };
            let Some(next) = self.neighbor_across(corner, current) else {
                return Ok(WalkOutcome::Abandoned(FallbackReason::WalkExhausted {
                    steps,
                }));
            };
            tracing::trace!(?current, ?next, steps, "walk step");
            current = next;
            steps += 1;
        }
    }

    fn scan(&self, point: &VectorPoint) -> Result<Option<TriangleKey>, GeometryError> {
        let tolerance = self.options.relative_tolerance;
        for (key, triangle) in &self.triangles {
            if point
                .is_outside_with_tolerance(triangle.vertices(), tolerance)?
                .is_none()
            {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}
