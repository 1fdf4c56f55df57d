//! Seeded random point generation for tests, benchmarks and demos.

#![forbid(unsafe_code)]

use crate::geometry::point::VectorPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors from point generation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointGenerationError {
    /// The requested range is empty or not finite.
    #[error("Invalid coordinate range [{min}, {max})")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Generates `count` 2D points uniformly distributed in the square
/// `[min, max) × [min, max)`, reproducibly from `seed`.
///
/// # Errors
///
/// Returns [`PointGenerationError::InvalidRange`] unless `min < max` and both
/// bounds are finite.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point_generation::generate_random_points_seeded;
///
/// let a = generate_random_points_seeded(10, (-1.0, 1.0), 7).unwrap();
/// let b = generate_random_points_seeded(10, (-1.0, 1.0), 7).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|p| p.coords().iter().all(|c| (-1.0..1.0).contains(c))));
/// ```
pub fn generate_random_points_seeded(
    count: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<VectorPoint>, PointGenerationError> {
    let (min, max) = range;
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(PointGenerationError::InvalidRange { min, max });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| VectorPoint::new([rng.random_range(min..max), rng.random_range(min..max)]))
        .collect())
}

/// Generates a `side × side` grid of 2D points spaced `spacing` apart,
/// starting at `origin`.
///
/// Grids are maximally cocircular, which makes them a useful stress input for
/// the circumcircle predicate.
#[must_use]
pub fn generate_grid_points(side: usize, spacing: f64, origin: (f64, f64)) -> Vec<VectorPoint> {
    let mut points = Vec::with_capacity(side * side);
    let mut y = origin.1;
    for _ in 0..side {
        let mut x = origin.0;
        for _ in 0..side {
            points.push(VectorPoint::new([x, y]));
            x += spacing;
        }
        y += spacing;
    }
    points
}
