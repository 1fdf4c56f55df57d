//! Voronoi cells read off a Delaunay triangulation.
//!
//! The Voronoi cell of a site is the polygon whose corners are the
//! circumcenters of the triangles around that site, taken in rotational
//! order. Cells of sites near the bootstrap corners are bounded by the
//! bootstrap triangle's huge circumcircles, so callers usually discard or
//! clip them.

#![forbid(unsafe_code)]

use crate::core::collections::{FastHashMap, FastHashSet};
use crate::core::facet::Facet;
use crate::core::triangulation::{TriangleKey, Triangulation, TriangulationError};
use crate::geometry::point::VectorPoint;

/// The Voronoi cell of one site.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiCell {
    /// The site the cell belongs to.
    pub site: VectorPoint,
    /// Triangles around the site, in rotational order.
    pub triangles: Vec<TriangleKey>,
    /// Circumcenters of `triangles`, in the same order.
    pub polygon: Vec<VectorPoint>,
}

impl VoronoiCell {
    /// Area of the polygon (shoelace formula).
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.polygon.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = &self.polygon[i];
                let b = &self.polygon[(i + 1) % n];
                a[0].mul_add(b[1], -(b[0] * a[1]))
            })
            .sum();
        (twice / 2.0).abs()
    }
}

impl Triangulation {
    /// The Voronoi cell of `site`, walking around it from `start`.
    ///
    /// # Errors
    ///
    /// Returns the errors of
    /// [`surrounding_triangles`](Triangulation::surrounding_triangles), and a
    /// [`TriangulationError::Triangle`] if a surrounding triangle has no
    /// circumcenter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::prelude::*;
    ///
    /// let mut dt = Triangulation::with_extent(100.0).unwrap();
    /// let site = point!(0.0, 0.0);
    /// dt.insert(site.clone()).unwrap();
    ///
    /// let start = dt.incident_triangle(&site).unwrap();
    /// let cell = dt.voronoi_cell(&site, start).unwrap();
    /// assert_eq!(cell.polygon.len(), 3);
    /// ```
    pub fn voronoi_cell(
        &self,
        site: &VectorPoint,
        start: TriangleKey,
    ) -> Result<VoronoiCell, TriangulationError> {
        let triangles = self.surrounding_triangles(site, start)?;
        let polygon = triangles
            .iter()
            .map(|&key| -> Result<VectorPoint, TriangulationError> {
                Ok(self.get(key)?.circumcenter()?.clone())
            })
            .collect::<Result<Vec<_>, TriangulationError>>()?;
        Ok(VoronoiCell {
            site: site.clone(),
            triangles,
            polygon,
        })
    }

    /// Cells of every vertex except the bootstrap corners, in the order the
    /// vertices are first met while scanning the triangles.
    ///
    /// # Errors
    ///
    /// Propagates the first [`voronoi_cell`](Triangulation::voronoi_cell)
    /// error.
    pub fn voronoi_cells(&self) -> Result<Vec<VoronoiCell>, TriangulationError> {
        let mut order = Vec::new();
        let mut first_seen: FastHashMap<&VectorPoint, TriangleKey> = FastHashMap::default();
        for (key, triangle) in &self.triangles {
            for v in triangle.vertices() {
                if self.is_bootstrap_vertex(v) {
                    continue;
                }
                first_seen.entry(v).or_insert_with(|| {
                    order.push(v);
                    key
                });
            }
        }

        order
            .into_iter()
            .map(|site| self.voronoi_cell(site, first_seen[site]))
            .collect()
    }

    /// Distinct edges of triangles that do not touch a bootstrap corner.
    #[must_use]
    pub fn delaunay_edges(&self) -> Vec<Facet> {
        let mut seen = FastHashSet::default();
        let mut edges = Vec::new();
        for triangle in self.triangles.values() {
            if self.touches_bootstrap_triangle(triangle) {
                continue;
            }
            for (_, facet) in triangle.facets() {
                if seen.insert(facet.clone()) {
                    edges.push(facet);
                }
            }
        }
        edges
    }
}
