//! Random point generation functions.
//!
//! Points are sampled uniformly from the integer square
//! `[-extent / 2, extent - extent / 2)²`, the same domain the mesh builder and
//! the edge thinner draw from.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::geometry::point::Point;

/// Errors that can occur during random point generation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RandomPointGenerationError {
    /// The extent cannot hold any point.
    #[error("Invalid extent {extent}: must be at least 1")]
    InvalidExtent {
        /// The rejected extent.
        extent: i64,
    },

    /// A grid was requested with a zero-sized side or spacing.
    #[error("Invalid grid {columns}x{rows} with spacing {spacing}")]
    InvalidGrid {
        /// Requested number of columns.
        columns: usize,
        /// Requested number of rows.
        rows: usize,
        /// Requested spacing between neighbors.
        spacing: i64,
    },
}

/// Sample one point uniformly from the extent's integer square.
///
/// An `extent` below 1 samples as 1, so the only point drawn is the origin.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use sweepmesh::geometry::util::random_point_in_extent;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let p = random_point_in_extent(&mut rng, 10);
/// assert!((-5..5).contains(&p.x()));
/// assert!((-5..5).contains(&p.y()));
/// ```
pub fn random_point_in_extent<R: Rng + ?Sized>(rng: &mut R, extent: i64) -> Point {
    let extent = extent.max(1);
    let half = extent / 2;
    let x = rng.random_range(0..extent) - half;
    let y = rng.random_range(0..extent) - half;
    Point::new(x, y)
}

/// Generate `n_points` random points in the extent's square.
///
/// Duplicates are possible; the mesh rejects them on insertion.
///
/// # Errors
///
/// * `RandomPointGenerationError::InvalidExtent` if `extent < 1`
pub fn generate_random_points(
    n_points: usize,
    extent: i64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    let mut rng = rand::rng();
    sample_points(&mut rng, n_points, extent)
}

/// Generate random points with a seeded RNG for reproducible results.
///
/// # Errors
///
/// * `RandomPointGenerationError::InvalidExtent` if `extent < 1`
///
/// # Examples
///
/// ```
/// use sweepmesh::geometry::util::generate_random_points_seeded;
///
/// let points1 = generate_random_points_seeded(100, 50, 42).unwrap();
/// let points2 = generate_random_points_seeded(100, 50, 42).unwrap();
/// assert_eq!(points1, points2);
///
/// assert!(generate_random_points_seeded(10, 0, 42).is_err());
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    extent: i64,
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_points(&mut rng, n_points, extent)
}

fn sample_points<R: Rng + ?Sized>(
    rng: &mut R,
    n_points: usize,
    extent: i64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if extent < 1 {
        return Err(RandomPointGenerationError::InvalidExtent { extent });
    }
    Ok((0..n_points)
        .map(|_| random_point_in_extent(&mut *rng, extent))
        .collect())
}

/// Generate the points of a `columns x rows` lattice with the given spacing,
/// starting at the origin, row by row.
///
/// # Errors
///
/// * `RandomPointGenerationError::InvalidGrid` if a side or the spacing is zero
///
/// # Examples
///
/// ```
/// use sweepmesh::geometry::point::Point;
/// use sweepmesh::geometry::util::generate_grid_points;
///
/// let grid = generate_grid_points(3, 2, 5).unwrap();
/// assert_eq!(grid.len(), 6);
/// assert_eq!(grid[4], Point::new(5, 5));
/// ```
pub fn generate_grid_points(
    columns: usize,
    rows: usize,
    spacing: i64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if columns == 0 || rows == 0 || spacing <= 0 {
        return Err(RandomPointGenerationError::InvalidGrid {
            columns,
            rows,
            spacing,
        });
    }
    let mut points = Vec::with_capacity(columns * rows);
    let mut y = 0;
    for _ in 0..rows {
        let mut x = 0;
        for _ in 0..columns {
            points.push(Point::new(x, y));
            x += spacing;
        }
        y += spacing;
    }
    Ok(points)
}
