//! Point location and adjacency lookup.
//!
//! Location is a linear scan of the triangle table, O(triangle count) per
//! query. At the mesh sizes this crate targets that is cheaper than keeping a
//! walk structure up to date through every flip.
//!
//! # Tie-breaking
//!
//! A point on a shared side is inside the half-open region of at most one of
//! the two triangles, and the first triangle in table order whose half-open
//! region accepts the point wins. A point on the excluded far side of every
//! triangle touching it (for example on a boundary edge) falls back to the
//! first triangle whose closed region contains it.

use crate::core::mesh::{EdgeKey, Mesh, TriangleKey};
use crate::geometry::point::Point;

/// Result of a point location query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// The point is in the half-open region of the triangle.
    InsideTriangle(TriangleKey),
    /// The point is on a side the half-open test excludes.
    OnEdge(TriangleKey),
    /// No triangle contains the point.
    Outside,
}

impl LocateResult {
    /// The containing triangle, if any.
    #[must_use]
    pub const fn triangle(self) -> Option<TriangleKey> {
        match self {
            Self::InsideTriangle(key) | Self::OnEdge(key) => Some(key),
            Self::Outside => None,
        }
    }
}

/// Finds the triangle containing `point`.
///
/// Triangles are scanned in registration order; when several accept `point`
/// the earliest registered one wins.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::algorithms::locate::{LocateResult, locate};
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(100);
/// for (x, y) in [(0, 0), (10, 0), (0, 10)] {
///     mesh.add_vertex(Point::new(x, y)).unwrap();
/// }
///
/// assert!(matches!(locate(&mesh, &Point::new(2, 2)), LocateResult::InsideTriangle(_)));
/// assert!(matches!(locate(&mesh, &Point::new(5, 5)), LocateResult::OnEdge(_)));
/// assert_eq!(locate(&mesh, &Point::new(8, 8)), LocateResult::Outside);
/// ```
#[must_use]
pub fn locate(mesh: &Mesh, point: &Point) -> LocateResult {
    let table = mesh.vertex_table();
    if let Some((key, _)) = mesh
        .triangles()
        .find(|(_, t)| t.shape().contains(table, point))
    {
        return LocateResult::InsideTriangle(key);
    }
    mesh.triangles()
        .find(|(_, t)| t.shape().contains_closed(table, point))
        .map_or(LocateResult::Outside, |(key, _)| LocateResult::OnEdge(key))
}

/// The triangle across `edge` from `triangle`, if `edge` is interior.
#[must_use]
pub fn adjacent_triangle(mesh: &Mesh, triangle: TriangleKey, edge: EdgeKey) -> Option<TriangleKey> {
    mesh.edge(edge)?
        .triangles()
        .iter()
        .copied()
        .find(|t| *t != triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Mesh {
        let mut mesh = Mesh::new(10);
        for (x, y) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            mesh.add_vertex(Point::new(x, y)).unwrap();
        }
        mesh
    }

    #[test]
    fn test_locate_empty_mesh() {
        let mesh = Mesh::new(10);
        assert_eq!(locate(&mesh, &Point::new(0, 0)), LocateResult::Outside);
    }

    #[test]
    fn test_locate_interior_point() {
        let mesh = square();
        let result = locate(&mesh, &Point::new(1, 2));
        let Some(key) = result.triangle() else {
            panic!("expected a containing triangle, got {result:?}");
        };
        let table = mesh.vertex_table();
        assert!(
            mesh.triangle(key)
                .unwrap()
                .shape()
                .contains_strictly(table, &Point::new(1, 2))
        );
    }

    #[test]
    fn test_locate_on_far_side_falls_back_to_closed_test() {
        let mut mesh = Mesh::new(10);
        for (x, y) in [(0, 0), (4, 0), (0, 4)] {
            mesh.add_vertex(Point::new(x, y)).unwrap();
        }
        // (2, 2) is on the side opposite vertex 0, which the half-open test excludes.
        let result = locate(&mesh, &Point::new(2, 2));
        assert!(matches!(result, LocateResult::OnEdge(_)), "got {result:?}");
        assert_eq!(result.triangle(), mesh.triangles().next().map(|(k, _)| k));
    }

    #[test]
    fn test_locate_outside() {
        let mesh = square();
        assert_eq!(locate(&mesh, &Point::new(5, 5)), LocateResult::Outside);
        assert_eq!(locate(&mesh, &Point::new(-1, 2)), LocateResult::Outside);
    }

    #[test]
    fn test_adjacent_triangle_across_diagonal() {
        let mesh = square();
        let (first, triangle) = mesh.triangles().next().unwrap();
        let interior: Vec<EdgeKey> = triangle
            .edges()
            .into_iter()
            .filter(|e| !mesh.edge(*e).unwrap().is_boundary())
            .collect();
        assert_eq!(interior.len(), 1);

        let other = adjacent_triangle(&mesh, first, interior[0]).unwrap();
        assert_ne!(other, first);
        assert_eq!(adjacent_triangle(&mesh, other, interior[0]), Some(first));

        let boundary = mesh.boundary_edges()[0];
        let owner = mesh.edge(boundary).unwrap().triangles()[0];
        assert_eq!(adjacent_triangle(&mesh, owner, boundary), None);
    }
}
