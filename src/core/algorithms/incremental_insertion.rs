//! Incremental vertex insertion.
//!
//! [`add_vertex`] behaves differently depending on how many vertices the mesh
//! already holds:
//!
//! 1. Fewer than two: the vertex is registered and nothing else happens.
//! 2. Exactly two: the vertex completes the seed triangle, unless the three
//!    points are collinear.
//! 3. Three or more: the vertex is located. A containing triangle is split
//!    around it ([`split_triangle`]). Otherwise the vertex lies outside the
//!    triangulated region and is fanned onto every boundary edge it can see
//!    without overlapping the mesh.
//!
//! Every new triangle is legalized with
//! [`add_and_flip_triangle`](crate::core::algorithms::flips::add_and_flip_triangle),
//! and the flips are added to the mesh's running total. A failed insertion
//! leaves the mesh exactly as it was.

use crate::core::algorithms::flips::add_and_flip_triangle;
use crate::core::algorithms::locate::{adjacent_triangle, locate};
use crate::core::builder::MAX_COORDINATE;
use crate::core::collections::{RemovedTriangleBuffer, SmallBuffer, VertexKeySet};
use crate::core::mesh::{EdgeKey, Mesh, TriangleKey, VertexKey};
use crate::core::triangle::OrientedTriangle;
use crate::geometry::point::Point;
use crate::geometry::predicates::{is_collinear, segments_intersect};

/// Replacement triangles produced by one split: three, or four when the new
/// vertex lands on an interior edge.
type SplitBuffer = SmallBuffer<OrientedTriangle, 4>;

/// Error during incremental insertion.
///
/// The mesh is unchanged whenever one of these is returned; callers are
/// expected to retry with another point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InsertionError {
    /// A vertex already occupies these coordinates.
    #[error("A vertex already exists at ({x}, {y})")]
    DuplicateCoordinates {
        /// The x coordinate.
        x: i64,
        /// The y coordinate.
        y: i64,
    },

    /// A coordinate lies outside `-MAX_COORDINATE..=MAX_COORDINATE`, where the
    /// exact predicates could overflow.
    #[error("({x}, {y}) is outside the supported coordinate range")]
    CoordinateOutOfRange {
        /// The x coordinate.
        x: i64,
        /// The y coordinate.
        y: i64,
    },

    /// The point is collinear with the two existing vertices, so no seed
    /// triangle can be formed.
    #[error("({x}, {y}) is collinear with the first two vertices; cannot seed a triangle")]
    CollinearSeed {
        /// The x coordinate.
        x: i64,
        /// The y coordinate.
        y: i64,
    },

    /// The point is outside the mesh and no boundary edge can be joined to it
    /// without overlapping existing triangles.
    #[error("No boundary edge is visible from ({x}, {y})")]
    NoVisibleBoundary {
        /// The x coordinate.
        x: i64,
        /// The y coordinate.
        y: i64,
    },
}

/// Inserts `point` into the mesh.
///
/// # Errors
///
/// - [`InsertionError::CoordinateOutOfRange`] if `|x|` or `|y|` exceeds
///   [`MAX_COORDINATE`].
/// - [`InsertionError::DuplicateCoordinates`] if `(x, y)` is taken.
/// - [`InsertionError::CollinearSeed`] if this would be the third vertex and
///   it is collinear with the other two.
/// - [`InsertionError::NoVisibleBoundary`] if the point is outside the mesh
///   and cannot be attached to it.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::algorithms::incremental_insertion::{InsertionError, add_vertex};
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(100);
/// add_vertex(&mut mesh, Point::new(0, 0)).unwrap();
/// add_vertex(&mut mesh, Point::new(10, 0)).unwrap();
///
/// let collinear = add_vertex(&mut mesh, Point::new(20, 0));
/// assert_eq!(collinear, Err(InsertionError::CollinearSeed { x: 20, y: 0 }));
/// assert_eq!(mesh.number_of_vertices(), 2);
///
/// add_vertex(&mut mesh, Point::new(0, 10)).unwrap();
/// add_vertex(&mut mesh, Point::new(2, 2)).unwrap();
/// assert_eq!(mesh.number_of_triangles(), 3);
/// ```
pub fn add_vertex(mesh: &mut Mesh, point: Point) -> Result<VertexKey, InsertionError> {
    let (x, y) = point.xy();
    let range = -MAX_COORDINATE..=MAX_COORDINATE;
    if !range.contains(&x) || !range.contains(&y) {
        tracing::debug!(x, y, "rejected vertex outside the coordinate range");
        return Err(InsertionError::CoordinateOutOfRange { x, y });
    }
    if mesh.vertex_key_at(x, y).is_some() {
        tracing::debug!(x, y, "rejected duplicate vertex");
        return Err(InsertionError::DuplicateCoordinates { x, y });
    }

    match mesh.number_of_vertices() {
        0 | 1 => mesh
            .insert_vertex(point)
            .ok_or(InsertionError::DuplicateCoordinates { x, y }),
        2 => insert_seed(mesh, point),
        _ => insert_into_mesh(mesh, point),
    }
}

fn insert_seed(mesh: &mut Mesh, point: Point) -> Result<VertexKey, InsertionError> {
    let (x, y) = point.xy();
    let existing: SmallBuffer<(VertexKey, Point), 2> =
        mesh.vertices().map(|(k, v)| (k, *v.point())).collect();
    let [(a, pa), (b, pb)] = existing[..] else {
        return Err(InsertionError::CollinearSeed { x, y });
    };
    if is_collinear(&pa, &pb, &point) {
        tracing::debug!(x, y, "rejected collinear seed vertex");
        return Err(InsertionError::CollinearSeed { x, y });
    }

    let v = mesh
        .insert_vertex(point)
        .ok_or(InsertionError::DuplicateCoordinates { x, y })?;
    let seed = OrientedTriangle::new(mesh.vertex_table(), a, b, v);
    mesh.add_triangle(seed);
    Ok(v)
}

fn insert_into_mesh(mesh: &mut Mesh, point: Point) -> Result<VertexKey, InsertionError> {
    let (x, y) = point.xy();
    let v = mesh
        .insert_vertex(point)
        .ok_or(InsertionError::DuplicateCoordinates { x, y })?;

    if let Some(triangle) = locate(mesh, &point).triangle() {
        split_triangle(mesh, triangle, v);
        return Ok(v);
    }

    let candidates = visible_boundary_candidates(mesh, v);
    if candidates.is_empty() {
        mesh.remove_vertex(v);
        tracing::debug!(x, y, "rejected vertex with no visible boundary edge");
        return Err(InsertionError::NoVisibleBoundary { x, y });
    }

    let flips: usize = candidates
        .into_iter()
        .map(|shape| add_and_flip_triangle(mesh, shape))
        .sum();
    mesh.record_flips(flips);
    Ok(v)
}

/// Fan triangles from `v` onto the boundary edges it can see.
///
/// A boundary edge qualifies if `v` is not collinear with it, the candidate
/// triangle does not overlap the triangle already on that edge, neither new
/// side crosses any boundary edge, and no other boundary vertex lies in the
/// candidate's closed region.
fn visible_boundary_candidates(mesh: &Mesh, v: VertexKey) -> Vec<OrientedTriangle> {
    let table = mesh.vertex_table();
    let pv = table[v].point();
    let side_crosses_boundary = |end: &Point| {
        mesh.boundary_edges().iter().any(|&e| {
            boundary_points(mesh, e).is_some_and(|(p0, p1)| segments_intersect((pv, end), (p0, p1)))
        })
    };
    let mut frontier = VertexKeySet::default();
    for &e in mesh.boundary_edges() {
        if let Some(edge) = mesh.edge(e) {
            frontier.extend(edge.vertices());
        }
    }

    let mut candidates = Vec::new();
    for &edge_key in mesh.boundary_edges() {
        let Some(edge) = mesh.edge(edge_key) else {
            continue;
        };
        let [a, b] = edge.vertices();
        let (pa, pb) = (table[a].point(), table[b].point());
        if is_collinear(pv, pa, pb) {
            continue;
        }

        let candidate = OrientedTriangle::new(table, v, a, b);
        let overlaps = edge
            .triangles()
            .first()
            .and_then(|&t| mesh.triangle(t))
            .is_some_and(|owner| candidate.intersects(owner.shape(), (a, b), table));
        if overlaps || side_crosses_boundary(pa) || side_crosses_boundary(pb) {
            continue;
        }
        let swallows_frontier = frontier
            .iter()
            .any(|&w| w != a && w != b && candidate.contains_closed(table, table[w].point()));
        if swallows_frontier {
            continue;
        }
        candidates.push(candidate);
    }
    candidates
}

fn boundary_points(mesh: &Mesh, edge: EdgeKey) -> Option<(&Point, &Point)> {
    let [a, b] = mesh.edge(edge)?.vertices();
    Some((mesh.point(a)?, mesh.point(b)?))
}

/// Replaces `triangle` with the fan of triangles around `v`, which must lie in
/// its closed region. Returns the number of flips performed.
///
/// If `v` lies on a side, no triangle is built on that side. When that side
/// is shared, the neighboring triangle is removed too and replaced by two
/// triangles joining `v` to its far apex, giving four replacements in all.
pub fn split_triangle(mesh: &mut Mesh, triangle: TriangleKey, v: VertexKey) -> usize {
    let Some(target) = mesh.triangle(triangle).copied() else {
        return 0;
    };
    let table = mesh.vertex_table();
    let pv = table[v].point();

    let mut removed = RemovedTriangleBuffer::new();
    removed.push(triangle);
    let mut replacements = SplitBuffer::new();

    for ((a, b), edge) in target.shape().sides().into_iter().zip(target.edges()) {
        if !is_collinear(pv, table[a].point(), table[b].point()) {
            replacements.push(OrientedTriangle::new(table, v, a, b));
            continue;
        }
        let Some(neighbor) = adjacent_triangle(mesh, triangle, edge) else {
            continue;
        };
        let Some(apex) = mesh
            .triangle(neighbor)
            .and_then(|n| n.shape().apex_off(a, b))
        else {
            continue;
        };
        removed.push(neighbor);
        replacements.push(OrientedTriangle::new(table, v, a, apex));
        replacements.push(OrientedTriangle::new(table, v, b, apex));
    }

    for key in removed {
        mesh.delete_triangle(key);
    }
    let flips = replacements
        .into_iter()
        .map(|shape| add_and_flip_triangle(mesh, shape))
        .sum();
    mesh.record_flips(flips);
    flips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::flips::is_locally_legal;
    use crate::core::util::validate_mesh;

    fn mesh_with(points: &[(i64, i64)]) -> Mesh {
        let mut mesh = Mesh::new(100);
        for &(x, y) in points {
            add_vertex(&mut mesh, Point::new(x, y)).unwrap();
        }
        mesh
    }

    #[test]
    fn test_first_two_vertices_only_register() {
        let mesh = mesh_with(&[(0, 0), (5, 5)]);
        assert_eq!(mesh.number_of_vertices(), 2);
        assert_eq!(mesh.number_of_triangles(), 0);
        assert_eq!(mesh.number_of_edges(), 0);
    }

    #[test]
    fn test_seed_triangle() {
        let mesh = mesh_with(&[(0, 0), (10, 0), (0, 10)]);
        assert_eq!(mesh.number_of_triangles(), 1);
        assert_eq!(mesh.number_of_edges(), 3);
        assert_eq!(mesh.boundary_edges().len(), 3);
        assert_eq!(mesh.total_flips(), 0);
    }

    #[test]
    fn test_duplicate_is_rejected_at_every_stage() {
        let mut mesh = Mesh::new(100);
        add_vertex(&mut mesh, Point::new(1, 1)).unwrap();
        assert_eq!(
            add_vertex(&mut mesh, Point::new(1, 1)),
            Err(InsertionError::DuplicateCoordinates { x: 1, y: 1 })
        );
        add_vertex(&mut mesh, Point::new(9, 1)).unwrap();
        add_vertex(&mut mesh, Point::new(1, 9)).unwrap();
        assert_eq!(
            add_vertex(&mut mesh, Point::new_3d(9, 1, 4)),
            Err(InsertionError::DuplicateCoordinates { x: 9, y: 1 })
        );
        assert_eq!(mesh.number_of_vertices(), 3);
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let far = 1_i64 << 34;
        let mut mesh = mesh_with(&[(0, 0), (4, 0)]);
        assert_eq!(
            add_vertex(&mut mesh, Point::new(far, 0)),
            Err(InsertionError::CoordinateOutOfRange { x: far, y: 0 })
        );
        assert_eq!(
            add_vertex(&mut mesh, Point::new(0, -MAX_COORDINATE - 1)),
            Err(InsertionError::CoordinateOutOfRange {
                x: 0,
                y: -MAX_COORDINATE - 1
            })
        );
        assert_eq!(mesh.number_of_vertices(), 2);
        assert_eq!(mesh.number_of_triangles(), 0);

        // The extreme corners are still exact.
        add_vertex(&mut mesh, Point::new(-MAX_COORDINATE, MAX_COORDINATE)).unwrap();
        add_vertex(&mut mesh, Point::new(MAX_COORDINATE, MAX_COORDINATE)).unwrap();
        add_vertex(&mut mesh, Point::new(3, 3)).unwrap();
        assert_eq!(validate_mesh(&mesh), Ok(()));
    }

    #[test]
    fn test_interior_split_adds_three_edges() {
        let mut mesh = mesh_with(&[(0, 0), (10, 0), (0, 10)]);
        add_vertex(&mut mesh, Point::new(3, 3)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 3);
        assert_eq!(mesh.number_of_edges(), 6);
        assert_eq!(mesh.boundary_edges().len(), 3);
        assert!(is_locally_legal(&mesh));
    }

    #[test]
    fn test_split_on_interior_edge_replaces_both_triangles() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4), (4, 4)]);
        assert_eq!(mesh.number_of_triangles(), 2);
        // (2, 2) is on the shared diagonal.
        add_vertex(&mut mesh, Point::new(2, 2)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 4);
        assert_eq!(mesh.number_of_edges(), 8);
        assert_eq!(mesh.boundary_edges().len(), 4);
        let table = mesh.vertex_table();
        assert!(mesh.triangles().all(|(_, t)| !t.shape().is_degenerate(table)));
    }

    #[test]
    fn test_split_on_boundary_edge_builds_two_triangles() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        add_vertex(&mut mesh, Point::new(2, 0)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 2);
        assert_eq!(mesh.number_of_edges(), 5);
        assert_eq!(mesh.boundary_edges().len(), 4);
    }

    #[test]
    fn test_outside_vertex_attaches_to_visible_edges() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        add_vertex(&mut mesh, Point::new(4, 4)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 2);
        assert_eq!(mesh.number_of_edges(), 5);

        // Sees two boundary edges of the square.
        add_vertex(&mut mesh, Point::new(-2, -2)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 4);
        assert_eq!(mesh.boundary_edges().len(), 4);
        assert!(is_locally_legal(&mesh));
    }

    #[test]
    fn test_outside_vertex_collinear_with_one_edge_uses_the_other() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        // (8, 0) extends (0,0)-(4,0), so only the hypotenuse can take it.
        let v = add_vertex(&mut mesh, Point::new(8, 0)).unwrap();
        assert_eq!(mesh.number_of_triangles(), 2);
        assert_eq!(mesh.number_of_edges(), 5);
        assert_eq!(mesh.boundary_edges().len(), 4);
        assert_eq!(mesh.vertex(v).unwrap().degree(), 2);
        assert!(mesh.edge_between(v, mesh.vertex_key_at(0, 0).unwrap()).is_none());
    }

    #[test]
    fn test_removed_vertex_can_be_inserted_again() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        let v = mesh.insert_vertex(Point::new(9, 9)).unwrap();
        let before = (
            mesh.number_of_vertices(),
            mesh.number_of_edges(),
            mesh.boundary_edges().to_vec(),
        );
        mesh.remove_vertex(v);
        assert_eq!(mesh.number_of_vertices(), before.0 - 1);
        assert_eq!(mesh.number_of_edges(), before.1);
        assert_eq!(mesh.boundary_edges(), before.2.as_slice());
        assert!(add_vertex(&mut mesh, Point::new(9, 9)).is_ok());
    }

    #[test]
    fn test_flips_accumulate_on_mesh() {
        let mut mesh = mesh_with(&[(0, 0), (10, 0), (5, 1)]);
        // Below the long base, forcing the base to flip.
        add_vertex(&mut mesh, Point::new(5, -1)).unwrap();
        assert_eq!(mesh.total_flips(), 1);
        let top = mesh.vertex_key_at(5, 1).unwrap();
        let bottom = mesh.vertex_key_at(5, -1).unwrap();
        assert!(mesh.edge_between(top, bottom).is_some());
    }
}
