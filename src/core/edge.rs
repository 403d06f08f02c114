//! Mesh edges and their canonical endpoint order.
//!
//! An edge is an unordered vertex pair. To give it a single identity, both
//! construction and lookup run the pair through [`canonical_pair`], which
//! orders the endpoints lexicographically by `(x, y)`. The mesh indexes edges
//! by that canonical pair, so `(a, b)` and `(b, a)` always resolve to the same
//! [`EdgeKey`].
//!
//! Besides topology, an edge carries two pieces of thinning state:
//!
//! - `hidden`: the edge was removed from the visible graph. Hidden edges stay
//!   in the mesh (renderers still draw them faintly) but searches skip them.
//! - `remove_failed`: memo of the last connectivity-oracle answer. It is never
//!   invalidated, so an edge once found unremovable is not retried.

use crate::core::collections::EdgeTriangleBuffer;
use crate::core::mesh::{TriangleKey, VertexKey};
use crate::geometry::point::Point;

/// Orders two endpoints canonically: lexicographic on `(x, y)`.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::edge::canonical_pair;
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(10);
/// let a = mesh.add_vertex(Point::new(3, 1)).unwrap();
/// let b = mesh.add_vertex(Point::new(-2, 4)).unwrap();
/// let pa = *mesh.vertex(a).unwrap().point();
/// let pb = *mesh.vertex(b).unwrap().point();
///
/// assert_eq!(canonical_pair((a, &pa), (b, &pb)), (b, a));
/// assert_eq!(canonical_pair((b, &pb), (a, &pa)), (b, a));
/// ```
#[must_use]
pub fn canonical_pair(
    (a, pa): (VertexKey, &Point),
    (b, pb): (VertexKey, &Point),
) -> (VertexKey, VertexKey) {
    if pa.cmp_xy(pb).is_le() {
        (a, b)
    } else {
        (b, a)
    }
}

/// An undirected edge of the mesh.
#[derive(Clone, Debug)]
pub struct Edge {
    vertices: [VertexKey; 2],
    triangles: EdgeTriangleBuffer,
    hidden: bool,
    remove_failed: bool,
}

impl Edge {
    /// Creates an edge from an already canonical endpoint pair.
    pub(crate) fn new((v0, v1): (VertexKey, VertexKey)) -> Self {
        Self {
            vertices: [v0, v1],
            triangles: EdgeTriangleBuffer::new(),
            hidden: false,
            remove_failed: false,
        }
    }

    /// Both endpoints in canonical order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 2] {
        self.vertices
    }

    /// Returns `true` if `vertex` is an endpoint of this edge.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }

    /// The endpoint opposite `vertex`, or `None` if `vertex` is not an endpoint.
    #[must_use]
    pub fn other_vertex(&self, vertex: VertexKey) -> Option<VertexKey> {
        match self.vertices {
            [v0, v1] if v0 == vertex => Some(v1),
            [v0, v1] if v1 == vertex => Some(v0),
            _ => None,
        }
    }

    /// Triangles owning this edge: one on the boundary, two in the interior.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[TriangleKey] {
        &self.triangles
    }

    /// Returns `true` if exactly one triangle owns this edge.
    #[inline]
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.triangles.len() == 1
    }

    /// Returns `true` once the thinner has removed this edge from the visible graph.
    #[inline]
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The memoized result of the last failed removability check.
    #[inline]
    #[must_use]
    pub const fn remove_failed(&self) -> bool {
        self.remove_failed
    }

    pub(crate) fn attach_triangle(&mut self, triangle: TriangleKey) {
        self.triangles.push(triangle);
    }

    pub(crate) fn detach_triangle(&mut self, triangle: TriangleKey) {
        self.triangles.retain(|t| *t != triangle);
    }

    pub(crate) const fn hide(&mut self) {
        self.hidden = true;
    }

    pub(crate) const fn set_remove_failed(&mut self, failed: bool) {
        self.remove_failed = failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::StorageMap;

    fn keys() -> (VertexKey, VertexKey, VertexKey) {
        let mut table: StorageMap<VertexKey, ()> = StorageMap::with_key();
        (table.insert(()), table.insert(()), table.insert(()))
    }

    #[test]
    fn canonical_pair_is_symmetric() {
        let (a, b, _) = keys();
        let pa = Point::new(5, 0);
        let pb = Point::new(5, -1);
        assert_eq!(canonical_pair((a, &pa), (b, &pb)), (b, a));
        assert_eq!(canonical_pair((b, &pb), (a, &pa)), (b, a));
    }

    #[test]
    fn canonical_pair_orders_by_x_first() {
        let (a, b, _) = keys();
        let pa = Point::new(-1, 100);
        let pb = Point::new(0, -100);
        assert_eq!(canonical_pair((b, &pb), (a, &pa)), (a, b));
    }

    #[test]
    fn other_vertex_and_membership() {
        let (a, b, c) = keys();
        let edge = Edge::new((a, b));
        assert_eq!(edge.other_vertex(a), Some(b));
        assert_eq!(edge.other_vertex(b), Some(a));
        assert_eq!(edge.other_vertex(c), None);
        assert!(edge.contains_vertex(a));
        assert!(!edge.contains_vertex(c));
    }

    #[test]
    fn boundary_tracks_triangle_count() {
        let (a, b, _) = keys();
        let mut triangles: StorageMap<TriangleKey, ()> = StorageMap::with_key();
        let t1 = triangles.insert(());
        let t2 = triangles.insert(());

        let mut edge = Edge::new((a, b));
        assert!(!edge.is_boundary());
        edge.attach_triangle(t1);
        assert!(edge.is_boundary());
        edge.attach_triangle(t2);
        assert!(!edge.is_boundary());
        edge.detach_triangle(t1);
        assert!(edge.is_boundary());
        assert_eq!(edge.triangles(), &[t2]);
    }

    #[test]
    fn thinning_flags() {
        let (a, b, _) = keys();
        let mut edge = Edge::new((a, b));
        assert!(!edge.is_hidden());
        assert!(!edge.remove_failed());
        edge.set_remove_failed(true);
        edge.hide();
        assert!(edge.is_hidden());
        assert!(edge.remove_failed());
    }
}
