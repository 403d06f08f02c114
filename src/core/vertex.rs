//! Mesh vertices.
//!
//! A [`Vertex`] is a lattice [`Point`] plus the ordered list of edges incident
//! to it. Vertices never reference edges directly; the list holds
//! [`EdgeKey`]s into the owning [`Mesh`](crate::core::mesh::Mesh)'s edge table.
//! Incident edges start out in creation order, and a removed edge keeps the
//! relative order of the survivors. The removability search re-sorts a
//! vertex's list by turning angle when it first walks through it; the sorted
//! order stays and steers later thinning searches.

use crate::core::collections::IncidentEdgeBuffer;
use crate::core::mesh::EdgeKey;
use crate::geometry::point::Point;

/// A vertex of the mesh.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(100);
/// let a = mesh.add_vertex(Point::new(0, 0)).unwrap();
/// let vertex = mesh.vertex(a).unwrap();
/// assert_eq!(vertex.point().xy(), (0, 0));
/// assert_eq!(vertex.degree(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Vertex {
    point: Point,
    edges: IncidentEdgeBuffer,
}

impl Vertex {
    pub(crate) fn new(point: Point) -> Self {
        Self {
            point,
            edges: IncidentEdgeBuffer::new(),
        }
    }

    /// The vertex position.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Incident edges in their current order, hidden ones included.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[EdgeKey] {
        &self.edges
    }

    /// Number of incident edges, hidden ones included.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn attach_edge(&mut self, edge: EdgeKey) {
        self.edges.push(edge);
    }

    pub(crate) fn detach_edge(&mut self, edge: EdgeKey) {
        self.edges.retain(|e| *e != edge);
    }

    /// Replaces the edge order. `order` must be a permutation of the
    /// current list.
    pub(crate) fn reorder_edges(&mut self, order: IncidentEdgeBuffer) {
        debug_assert_eq!(order.len(), self.edges.len());
        debug_assert!(order.iter().all(|e| self.edges.contains(e)));
        self.edges = order;
    }

    pub(crate) const fn set_z(&mut self, z: i64) {
        self.point = self.point.with_z(z);
    }
}
