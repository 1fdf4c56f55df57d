//! Determinants and generalized cross products over rows of points.
//!
//! Matrices here are slices of [`VectorPoint`] rows. The sizes that occur in
//! practice are tiny (3×3 orientation and 4×4 in-circle matrices for 2D
//! input), so the determinant is a cofactor expansion that bottoms out in
//! closed-form 2×2 and 3×3 minors. Cofactor expansion keeps the signs of the
//! cross product and of the determinant consistent with each other, which the
//! relation predicate depends on.

#![forbid(unsafe_code)]

use crate::geometry::point::{GeometryError, VectorPoint};
use smallvec::SmallVec;

/// Active column indices of a minor.
type ColumnBuffer = SmallVec<[usize; 8]>;

/// Determinant of a square matrix whose rows are `rows`.
///
/// An empty matrix has determinant `1`.
///
/// # Errors
///
/// Returns [`GeometryError::NonSquareMatrix`] if any row's width differs from
/// the number of rows.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::matrix::determinant;
/// use planar_delaunay::point;
///
/// let rows = [point!(2.0, 0.0), point!(1.0, 3.0)];
/// assert_eq!(determinant(&rows).unwrap(), 6.0);
/// ```
pub fn determinant(rows: &[VectorPoint]) -> Result<f64, GeometryError> {
    let n = rows.len();
    if let Some(bad) = rows.iter().find(|row| row.dimension() != n) {
        return Err(GeometryError::NonSquareMatrix {
            rows: n,
            columns: bad.dimension(),
        });
    }
    let columns: ColumnBuffer = (0..n).collect();
    Ok(minor(rows, 0, &columns))
}

/// Generalized cross product of `n` rows of width `n + 1`.
///
/// Component `i` is `(-1)^i` times the determinant of the matrix with column
/// `i` removed, so the result is orthogonal to every row.
///
/// # Errors
///
/// Returns [`GeometryError::CrossProductShape`] if the rows are not `n` rows
/// of width `n + 1`.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::matrix::cross;
/// use planar_delaunay::point;
///
/// let rows = [point!(1.0, 0.0, 0.0), point!(0.0, 1.0, 0.0)];
/// assert_eq!(cross(&rows).unwrap(), point!(0.0, 0.0, 1.0));
/// ```
pub fn cross(rows: &[VectorPoint]) -> Result<VectorPoint, GeometryError> {
    let width = rows.len() + 1;
    if rows.is_empty() {
        return Err(GeometryError::CrossProductShape {
            rows: 0,
            columns: 0,
        });
    }
    if let Some(bad) = rows.iter().find(|row| row.dimension() != width) {
        return Err(GeometryError::CrossProductShape {
            rows: rows.len(),
            columns: bad.dimension(),
        });
    }

    let mut columns: ColumnBuffer = ColumnBuffer::with_capacity(width - 1);
    let mut sign = 1.0;
    let components = (0..width).map(|skipped| {
        columns.clear();
        columns.extend((0..width).filter(|&c| c != skipped));
        let value = sign * minor(rows, 0, &columns);
        sign = -sign;
        value
    });
    Ok(VectorPoint::new(components))
}

/// Determinant of the minor made of rows `row..` and the given columns.
///
/// Callers guarantee `rows.len() - row == columns.len()` and that every
/// column index is in range.
fn minor(rows: &[VectorPoint], row: usize, columns: &[usize]) -> f64 {
    match *columns {
        [] => 1.0,
        [c0] => rows[row][c0],
        [c0, c1] => {
            let (r0, r1) = (&rows[row], &rows[row + 1]);
            r0[c0].mul_add(r1[c1], -(r0[c1] * r1[c0]))
        }
        [c0, c1, c2] => {
            let (r0, r1, r2) = (&rows[row], &rows[row + 1], &rows[row + 2]);
            r0[c0] * r1[c1].mul_add(r2[c2], -(r1[c2] * r2[c1]))
                - r0[c1] * r1[c0].mul_add(r2[c2], -(r1[c2] * r2[c0]))
                + r0[c2] * r1[c0].mul_add(r2[c1], -(r1[c1] * r2[c0]))
        }
        _ => {
            let mut sum = 0.0;
            let mut sign = 1.0;
            let mut remaining = ColumnBuffer::with_capacity(columns.len() - 1);
            for (position, &column) in columns.iter().enumerate() {
                let entry = rows[row][column];
                if entry != 0.0 {
                    remaining.clear();
                    remaining.extend_from_slice(&columns[..position]);
                    remaining.extend_from_slice(&columns[position + 1..]);
                    sum += sign * entry * minor(rows, row + 1, &remaining);
                }
                sign = -sign;
            }
            sum
        }
    }
}
