//! # `voronoi_cells` Example
//!
//! Builds a Delaunay triangulation of seeded random points, validates it and
//! prints the Voronoi cell of every site together with the insertion
//! statistics.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --example voronoi_cells [n_points] [seed]
//! ```

use planar_delaunay::prelude::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let n_points: usize = args.next().map_or(Ok(20), |s| s.parse())?;
    let seed: u64 = args.next().map_or(Ok(0xD1EA), |s| s.parse())?;

    let mut dt = TriangulationBuilder::with_extent(1.0e4).build()?;
    for p in generate_random_points_seeded(n_points, (-100.0, 100.0), seed)? {
        if let InsertionOutcome::Duplicate { .. } = dt.insert(p.clone())? {
            println!("skipped duplicate {p}");
        }
    }
    dt.validation_report()?;

    println!("=================================================================");
    println!(
        "{} sites, {} triangles, {} Delaunay edges",
        dt.number_of_vertices() - 3,
        dt.number_of_triangles(),
        dt.delaunay_edges().len()
    );
    println!("=================================================================");

    for cell in dt.voronoi_cells()? {
        let bounded = cell
            .triangles
            .iter()
            .map(|&key| dt.touches_bootstrap(key))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .all(|touches| !touches);
        let label = if bounded { "" } else { " (hull site, unbounded)" };
        println!(
            "site {}: {} corners, area {:.3}{label}",
            cell.site,
            cell.polygon.len(),
            cell.area()
        );
        for corner in &cell.polygon {
            println!("    {corner}");
        }
    }

    let stats = dt.statistics();
    println!();
    println!("inserted:          {}", stats.points_inserted);
    println!("duplicates:        {}", stats.duplicates_skipped);
    println!("walk fallbacks:    {}", stats.walk_fallbacks);
    println!("cycles detected:   {}", stats.cycles_detected);
    println!("mean cavity size:  {:.2}", stats.mean_cavity_size());
    Ok(())
}
