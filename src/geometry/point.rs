//! Data and operations on n-dimensional points.
//!
//! A [`VectorPoint`] is an immutable tuple of `f64` coordinates whose dimension
//! is fixed per instance rather than per type. The triangulation only ever
//! works with 2D points, but the predicates lift points into homogeneous
//! coordinates (3 and 4 components), so the same type doubles as the row type
//! of the small matrices in [`crate::geometry::matrix`].
//!
//! # Equality Semantics
//!
//! Equality, ordering and hashing compare coordinates through
//! [`OrderedFloat`], so `NaN == NaN` and points can key hash maps. If you need
//! IEEE 754 semantics, compare [`VectorPoint::coords`] directly.

#![forbid(unsafe_code)]

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use thiserror::Error;

/// Inline capacity of a point's coordinate buffer.
///
/// Covers 2D points and their 3- and 4-component homogeneous liftings without
/// touching the heap.
pub const INLINE_COORDINATES: usize = 4;

/// Coordinate storage for [`VectorPoint`].
pub type CoordinateBuffer = SmallVec<[f64; INLINE_COORDINATES]>;

/// Errors produced by point arithmetic and geometric predicates.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::GeometryError;
///
/// let err = GeometryError::DimensionMismatch { expected: 2, found: 3 };
/// assert_eq!(err.to_string(), "Dimension mismatch: expected 2, found 3");
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeometryError {
    /// Two operands have different dimensions.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension of the left-hand operand.
        expected: usize,
        /// Dimension of the offending operand.
        found: usize,
    },

    /// A simplex does not have `dimension + 1` vertices.
    #[error("Simplex of dimension {dimension} needs {expected} vertices, found {found}")]
    SimplexSize {
        /// Ambient dimension of the points.
        dimension: usize,
        /// Required vertex count.
        expected: usize,
        /// Supplied vertex count.
        found: usize,
    },

    /// Determinant input is not a square matrix.
    #[error("Matrix is not square: {rows} rows of width {columns}")]
    NonSquareMatrix {
        /// Number of rows supplied.
        rows: usize,
        /// Width of the offending row.
        columns: usize,
    },

    /// Cross product input is not `n` rows of width `n + 1`.
    #[error("Cross product needs n rows of width n + 1, found {rows} rows of width {columns}")]
    CrossProductShape {
        /// Number of rows supplied.
        rows: usize,
        /// Width of the offending row.
        columns: usize,
    },

    /// The simplex is flat, so it has no circumcenter.
    #[error("Degenerate simplex: vertices are affinely dependent")]
    DegenerateSimplex,
}

/// An immutable point (or vector) in n-dimensional Euclidean space.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::point;
///
/// let a = point!(3.0, 4.0);
/// assert_eq!(a.dimension(), 2);
/// assert_eq!(a.magnitude(), 5.0);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorPoint {
    coords: CoordinateBuffer,
}

/// Builds a [`VectorPoint`] from a list of coordinates.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::point;
///
/// let p = point!(1.0, 2.0);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// ```
#[macro_export]
macro_rules! point {
    ($($coord:expr),+ $(,)?) => {
        $crate::geometry::point::VectorPoint::new([$(f64::from($coord)),+])
    };
}

impl VectorPoint {
    /// Creates a point by copying the given coordinates.
    #[must_use]
    pub fn new<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self {
            coords: coords.into_iter().collect(),
        }
    }

    /// Creates a point from a coordinate slice.
    #[must_use]
    pub fn from_slice(coords: &[f64]) -> Self {
        Self {
            coords: CoordinateBuffer::from_slice(coords),
        }
    }

    /// Number of coordinates.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Read-only view of the coordinates.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Coordinate `index`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<f64> {
        self.coords.get(index).copied()
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Fails unless `other` has the same dimension as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    #[inline]
    pub fn check_dimension(&self, other: &Self) -> Result<(), GeometryError> {
        if self.dimension() == other.dimension() {
            Ok(())
        } else {
            Err(GeometryError::DimensionMismatch {
                expected: self.dimension(),
                found: other.dimension(),
            })
        }
    }

    /// Dot product.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::point;
    ///
    /// assert_eq!(point!(1.0, 2.0).dot(&point!(3.0, 4.0)).unwrap(), 11.0);
    /// assert!(point!(1.0, 2.0).dot(&point!(1.0, 2.0, 3.0)).is_err());
    /// ```
    pub fn dot(&self, other: &Self) -> Result<f64, GeometryError> {
        self.check_dimension(other)?;
        Ok(self.dot_unchecked(other))
    }

    pub(crate) fn dot_unchecked(&self, other: &Self) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.dot_unchecked(self).sqrt()
    }

    /// Component-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    pub fn checked_add(&self, other: &Self) -> Result<Self, GeometryError> {
        self.check_dimension(other)?;
        Ok(Self::new(
            self.coords.iter().zip(other.coords.iter()).map(|(a, b)| a + b),
        ))
    }

    /// Component-wise difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, GeometryError> {
        self.check_dimension(other)?;
        Ok(Self::new(
            self.coords.iter().zip(other.coords.iter()).map(|(a, b)| a - b),
        ))
    }

    /// Angle in radians between `self` and `other` viewed as vectors.
    ///
    /// The cosine is clamped to `[-1, 1]` so rounding never produces `NaN` for
    /// parallel vectors. A zero vector yields `NaN`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use approx::assert_relative_eq;
    /// use planar_delaunay::point;
    ///
    /// let angle = point!(1.0, 0.0).angle(&point!(0.0, 2.0)).unwrap();
    /// assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2);
    /// ```
    pub fn angle(&self, other: &Self) -> Result<f64, GeometryError> {
        let cosine = self.dot(other)? / (self.magnitude() * other.magnitude());
        Ok(cosine.clamp(-1.0, 1.0).acos())
    }

    /// Returns a new point with `extra` appended as trailing coordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::point;
    ///
    /// assert_eq!(point!(1.0, 2.0).extend(&[1.0]), point!(1.0, 2.0, 1.0));
    /// ```
    #[must_use]
    pub fn extend(&self, extra: &[f64]) -> Self {
        let mut coords = CoordinateBuffer::with_capacity(self.dimension() + extra.len());
        coords.extend_from_slice(&self.coords);
        coords.extend_from_slice(extra);
        Self { coords }
    }

    /// Perpendicular bisector of `self` and `other` in homogeneous form.
    ///
    /// The result `(d, k)` with `d = self - other` and
    /// `k = -d·(self + other) / 2` describes the hyperplane `d·x + k = 0` of
    /// points equidistant from both inputs.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    pub fn bisector(&self, other: &Self) -> Result<Self, GeometryError> {
        let difference = self.checked_sub(other)?;
        let sum = self.checked_add(other)?;
        let offset = -difference.dot_unchecked(&sum) / 2.0;
        Ok(difference.extend(&[offset]))
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    pub fn distance_squared(&self, other: &Self) -> Result<f64, GeometryError> {
        let difference = self.checked_sub(other)?;
        Ok(difference.dot_unchecked(&difference))
    }

    /// Euclidean distance to `other`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DimensionMismatch`] when the dimensions differ.
    pub fn distance(&self, other: &Self) -> Result<f64, GeometryError> {
        Ok(self.distance_squared(other)?.sqrt())
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl<const N: usize> From<[f64; N]> for VectorPoint {
    fn from(coords: [f64; N]) -> Self {
        Self::new(coords)
    }
}

impl From<&[f64]> for VectorPoint {
    fn from(coords: &[f64]) -> Self {
        Self::from_slice(coords)
    }
}

impl Index<usize> for VectorPoint {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.coords[index]
    }
}

impl PartialEq for VectorPoint {
    fn eq(&self, other: &Self) -> bool {
        self.coords.len() == other.coords.len()
            && self
                .coords
                .iter()
                .zip(other.coords.iter())
                .all(|(a, b)| OrderedFloat(*a) == OrderedFloat(*b))
    }
}

impl Eq for VectorPoint {}

impl Hash for VectorPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords.len().hash(state);
        for c in &self.coords {
            OrderedFloat(*c).hash(state);
        }
    }
}

impl PartialOrd for VectorPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VectorPoint {
    /// Lexicographic by coordinate, shorter points first on a common prefix.
    fn cmp(&self, other: &Self) -> Ordering {
        self.coords
            .iter()
            .map(|c| OrderedFloat(*c))
            .cmp(other.coords.iter().map(|c| OrderedFloat(*c)))
    }
}

impl fmt::Debug for VectorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VectorPoint{:?}", self.coords.as_slice())
    }
}

impl fmt::Display for VectorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// TESTS
// =============================================================================
