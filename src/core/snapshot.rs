//! Flat, index-based copy of a mesh for renderers and persistence.
//!
//! Keys are internal to a [`Mesh`], so a snapshot renumbers vertices densely
//! in table order and expresses edges and triangles as indices into
//! [`MeshSnapshot::vertices`].

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::core::collections::{FastHashMap, fast_hash_map_with_capacity};
use crate::core::mesh::{Mesh, VertexKey};
use crate::geometry::point::Point;

/// One edge in a [`MeshSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Endpoint indices, in canonical `(x, y)` order.
    pub vertices: [usize; 2],
    /// Whether thinning hid this edge.
    pub hidden: bool,
    /// Whether exactly one triangle owns this edge.
    pub boundary: bool,
}

/// A serializable snapshot of a [`Mesh`].
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(100);
/// for (x, y) in [(0, 0), (10, 0), (0, 10)] {
///     mesh.add_vertex(Point::new(x, y)).unwrap();
/// }
///
/// let snapshot = mesh.snapshot();
/// assert_eq!(snapshot.vertices.len(), 3);
/// assert_eq!(snapshot.edges.len(), 3);
/// assert!(snapshot.edges.iter().all(|e| e.boundary && !e.hidden));
/// assert_eq!(snapshot.triangles.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    /// Side length of the coordinate domain.
    pub extent: i64,
    /// Vertex positions, heights included.
    pub vertices: Vec<Point>,
    /// Edges as index pairs with their flags.
    pub edges: Vec<EdgeRecord>,
    /// Triangles as counter-clockwise index triples.
    pub triangles: Vec<[usize; 3]>,
    /// Flips performed over the life of the mesh.
    pub total_flips: usize,
}

impl MeshSnapshot {
    /// Number of hidden edges in the snapshot.
    #[must_use]
    pub fn hidden_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.hidden).count()
    }
}

impl Mesh {
    /// Captures the current mesh as a [`MeshSnapshot`].
    #[must_use]
    pub fn snapshot(&self) -> MeshSnapshot {
        let mut index: FastHashMap<VertexKey, usize> =
            fast_hash_map_with_capacity(self.number_of_vertices());
        let mut vertices = Vec::with_capacity(self.number_of_vertices());
        for (key, vertex) in self.vertices() {
            index.insert(key, vertices.len());
            vertices.push(*vertex.point());
        }

        let edges = self
            .edges()
            .filter_map(|(_, edge)| {
                let [a, b] = edge.vertices();
                Some(EdgeRecord {
                    vertices: [*index.get(&a)?, *index.get(&b)?],
                    hidden: edge.is_hidden(),
                    boundary: edge.is_boundary(),
                })
            })
            .collect();

        let triangles = self
            .triangles()
            .filter_map(|(_, triangle)| {
                let [a, b, c] = triangle.vertices();
                Some([*index.get(&a)?, *index.get(&b)?, *index.get(&c)?])
            })
            .collect();

        MeshSnapshot {
            extent: self.extent(),
            vertices,
            edges,
            triangles,
            total_flips: self.total_flips(),
        }
    }
}
