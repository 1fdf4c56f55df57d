//! Fluent construction of a [`Triangulation`] with non-default options.
//!
//! [`Triangulation::new`] and [`Triangulation::with_extent`] cover the common
//! case. Use [`TriangulationBuilder`] to tune the predicate tolerance or to
//! turn off the brute-force location fallback.
//!
//! # Examples
//!
//! ```rust
//! use planar_delaunay::core::builder::TriangulationBuilder;
//! use planar_delaunay::point;
//!
//! let mut dt = TriangulationBuilder::with_extent(1_000.0)
//!     .relative_tolerance(1e-9)
//!     .brute_force_fallback(false)
//!     .build()
//!     .unwrap();
//!
//! dt.insert(point!(1.0, 2.0)).unwrap();
//! assert!(!dt.options().brute_force_fallback);
//! ```

#![forbid(unsafe_code)]

use crate::core::triangle::Triangle;
use crate::core::triangulation::{Triangulation, TriangulationError};
use crate::geometry::predicates::DEFAULT_RELATIVE_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Tunables for point location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationOptions {
    /// Relative tolerance of the orientation test used while walking.
    pub relative_tolerance: f64,
    /// Scan every triangle when the walk fails.
    pub brute_force_fallback: bool,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            relative_tolerance: DEFAULT_RELATIVE_TOLERANCE,
            brute_force_fallback: true,
        }
    }
}

impl TriangulationOptions {
    /// Checks that the tolerance is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidOptions`] otherwise.
    pub fn validate(&self) -> Result<(), TriangulationError> {
        if !self.relative_tolerance.is_finite() || self.relative_tolerance < 0.0 {
            return Err(TriangulationError::InvalidOptions {
                reason: format!(
                    "relative_tolerance must be finite and non-negative, got {}",
                    self.relative_tolerance
                ),
            });
        }
        Ok(())
    }
}

enum Bootstrap {
    Seed(Triangle),
    Extent(f64),
}

/// Builder for [`Triangulation`].
pub struct TriangulationBuilder {
    bootstrap: Bootstrap,
    options: TriangulationOptions,
}

impl TriangulationBuilder {
    /// Starts from an explicit bootstrap triangle.
    #[must_use]
    pub fn new(seed: Triangle) -> Self {
        Self {
            bootstrap: Bootstrap::Seed(seed),
            options: TriangulationOptions::default(),
        }
    }

    /// Starts from [`Triangle::bounding(extent)`](Triangle::bounding).
    #[must_use]
    pub fn with_extent(extent: f64) -> Self {
        Self {
            bootstrap: Bootstrap::Extent(extent),
            options: TriangulationOptions::default(),
        }
    }

    /// Sets the orientation tolerance.
    #[must_use]
    pub const fn relative_tolerance(mut self, tolerance: f64) -> Self {
        self.options.relative_tolerance = tolerance;
        self
    }

    /// Enables or disables the linear-scan fallback.
    #[must_use]
    pub const fn brute_force_fallback(mut self, enabled: bool) -> Self {
        self.options.brute_force_fallback = enabled;
        self
    }

    /// Replaces all options at once.
    #[must_use]
    pub const fn options(mut self, options: TriangulationOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the triangulation.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::InvalidOptions`] for a negative or
    /// non-finite tolerance, and the errors of [`Triangulation::with_options`]
    /// for a bad bootstrap.
    pub fn build(self) -> Result<Triangulation, TriangulationError> {
        let seed = match self.bootstrap {
            Bootstrap::Seed(seed) => seed,
            Bootstrap::Extent(extent) => Triangle::bounding(extent)?,
        };
        Triangulation::with_options(seed, self.options)
    }
}
