//! The mesh: flat vertex, edge and triangle tables plus the boundary set.
//!
//! The vertex/edge/triangle graph is cyclic (edges know their triangles,
//! triangles know their edges, vertices know their edges). Here every link is a
//! key into one of three [`StorageMap`]s, so no entity owns or borrows another.
//!
//! [`Mesh::add_triangle`] and [`Mesh::delete_triangle`] are the only operations
//! that change topology. They are exact inverses and together maintain:
//!
//! - every side of every triangle has an edge in the edge table;
//! - every edge is owned by one or two triangles;
//! - the boundary list holds exactly the edges owned by one triangle;
//! - each vertex lists exactly the edges it is an endpoint of.
//!
//! Insertion, legalization and thinning live in
//! [`core::algorithms`](crate::core::algorithms) and are exposed here as thin
//! methods.

#![forbid(unsafe_code)]

use rand::Rng;
use slotmap::new_key_type;

use crate::core::algorithms::incremental_insertion::{self, InsertionError};
use crate::core::algorithms::thinning;
use crate::core::builder::MAX_EXTENT;
use crate::core::collections::{
    Entry, FastHashMap, NeighborBuffer, StorageMap, fast_hash_map_with_capacity,
};
use crate::core::edge::{Edge, canonical_pair};
use crate::core::triangle::{OrientedTriangle, Triangle};
use crate::core::util::{MeshValidationError, validate_mesh};
use crate::core::vertex::Vertex;
use crate::geometry::point::Point;

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the mesh's vertex table.
    ///
    /// Vertices are never removed once an insertion succeeds, so a key handed
    /// out by [`Mesh::add_vertex`] stays valid for the life of the mesh.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing edges in the mesh's edge table.
    ///
    /// Edges are created and destroyed as triangles are flipped and split; a
    /// key is only stable while the edge keeps at least one owning triangle.
    pub struct EdgeKey;
}

new_key_type! {
    /// Key type for accessing triangles in the mesh's triangle table.
    ///
    /// Triangles are replaced, never mutated, so any flip or split invalidates
    /// the keys of the triangles it consumed.
    pub struct TriangleKey;
}

/// The vertex table. Triangle predicates take it to resolve keys to points.
pub type VertexTable = StorageMap<VertexKey, Vertex>;

// =============================================================================
// MESH
// =============================================================================

/// An incrementally built planar triangulation.
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
/// assert_eq!(mesh.number_of_triangles(), 1);
/// assert_eq!(mesh.number_of_edges(), 3);
/// assert_eq!(mesh.boundary_edges().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Mesh {
    extent: i64,
    vertices: VertexTable,
    vertex_index: FastHashMap<(i64, i64), VertexKey>,
    edges: StorageMap<EdgeKey, Edge>,
    edge_index: FastHashMap<(VertexKey, VertexKey), EdgeKey>,
    triangles: StorageMap<TriangleKey, Triangle>,
    triangle_order: Vec<TriangleKey>,
    boundary: Vec<EdgeKey>,
    total_flips: usize,
}

impl Mesh {
    /// Creates an empty mesh over the square coordinate domain of side `extent`.
    ///
    /// The extent only bounds random sampling in the thinner and is clamped to
    /// `1..=MAX_EXTENT`. Vertices outside it are accepted as long as both
    /// coordinates stay within [`MAX_COORDINATE`](crate::core::builder::MAX_COORDINATE).
    #[must_use]
    pub fn new(extent: i64) -> Self {
        Self::with_capacity(extent, 0)
    }

    /// Creates an empty mesh with room for about `vertices` vertices.
    #[must_use]
    pub fn with_capacity(extent: i64, vertices: usize) -> Self {
        // A planar triangulation has at most 3n edges and 2n triangles.
        Self {
            extent: extent.clamp(1, MAX_EXTENT),
            vertices: StorageMap::with_capacity_and_key(vertices),
            vertex_index: fast_hash_map_with_capacity(vertices),
            edges: StorageMap::with_capacity_and_key(3 * vertices),
            edge_index: fast_hash_map_with_capacity(3 * vertices),
            triangles: StorageMap::with_capacity_and_key(2 * vertices),
            triangle_order: Vec::with_capacity(2 * vertices),
            boundary: Vec::new(),
            total_flips: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Side length of the square coordinate domain.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> i64 {
        self.extent
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges, hidden ones included.
    #[inline]
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges hidden by the thinner.
    #[must_use]
    pub fn number_of_hidden_edges(&self) -> usize {
        self.edges.values().filter(|e| e.is_hidden()).count()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Flips performed by all insertions so far.
    #[inline]
    #[must_use]
    pub const fn total_flips(&self) -> usize {
        self.total_flips
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.vertices.iter()
    }

    /// Iterates over all edges, hidden ones included.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> {
        self.edges.iter()
    }

    /// Iterates over all triangles in the order they were registered.
    ///
    /// Point location takes the first match in this order.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangle_order
            .iter()
            .filter_map(|&key| self.triangles.get(key).map(|t| (key, t)))
    }

    /// Edges owned by exactly one triangle, in the order they joined the boundary.
    #[inline]
    #[must_use]
    pub fn boundary_edges(&self) -> &[EdgeKey] {
        &self.boundary
    }

    /// Looks up a vertex.
    #[inline]
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Looks up an edge.
    #[inline]
    #[must_use]
    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// Looks up a triangle.
    #[inline]
    #[must_use]
    pub fn triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// Position of a vertex.
    #[inline]
    #[must_use]
    pub fn point(&self, key: VertexKey) -> Option<&Point> {
        self.vertices.get(key).map(Vertex::point)
    }

    /// The vertex at lattice position `(x, y)`, if any.
    #[must_use]
    pub fn vertex_key_at(&self, x: i64, y: i64) -> Option<VertexKey> {
        self.vertex_index.get(&(x, y)).copied()
    }

    /// The edge joining `a` and `b`, in either order.
    #[must_use]
    pub fn edge_between(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        let pair = self.canonical_pair(a, b)?;
        self.edge_index.get(&pair).copied()
    }

    /// Sets the height of a vertex. Returns `false` if the key is unknown.
    ///
    /// Heights do not affect topology, but later angle computations see them.
    pub fn set_vertex_z(&mut self, key: VertexKey, z: i64) -> bool {
        let Some(vertex) = self.vertices.get_mut(key) else {
            return false;
        };
        vertex.set_z(z);
        true
    }

    pub(crate) const fn vertex_table(&self) -> &VertexTable {
        &self.vertices
    }

    /// Entry counts of the vertex index, the edge index and the triangle order.
    pub(crate) fn index_sizes(&self) -> (usize, usize, usize) {
        (
            self.vertex_index.len(),
            self.edge_index.len(),
            self.triangle_order.len(),
        )
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Inserts a vertex and repairs the triangulation around it.
    ///
    /// See [`incremental_insertion::add_vertex`].
    ///
    /// # Errors
    ///
    /// Returns an [`InsertionError`] and leaves the mesh unchanged if the point
    /// is a duplicate, completes a collinear seed, or cannot be attached.
    pub fn add_vertex(&mut self, point: Point) -> Result<VertexKey, InsertionError> {
        incremental_insertion::add_vertex(self, point)
    }

    /// Hides one removable edge near a random point. See [`thinning::hide_random_edge`].
    pub fn hide_random_edge<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<EdgeKey> {
        thinning::hide_random_edge(self, rng)
    }

    /// Decides whether `edge` can be hidden without disconnecting the visible
    /// graph, memoizing the answer. See [`thinning::can_remove_edge`].
    pub fn can_remove_edge(&mut self, edge: EdgeKey) -> bool {
        thinning::can_remove_edge(self, edge)
    }

    /// Hides edges until none is removable or `budget` edges are hidden.
    /// Returns how many were hidden.
    pub fn thin<R: Rng + ?Sized>(&mut self, rng: &mut R, budget: Option<usize>) -> usize {
        thinning::thin(self, rng, budget)
    }

    /// Returns `true` if the non-hidden edges connect every vertex.
    #[must_use]
    pub fn is_visible_connected(&self) -> bool {
        thinning::is_visible_connected(self)
    }

    /// Checks table consistency and point-location closure.
    ///
    /// # Errors
    ///
    /// Returns the first [`MeshValidationError`] found. See
    /// [`validate_mesh`](crate::core::util::validate_mesh).
    pub fn is_valid(&self) -> Result<(), MeshValidationError> {
        validate_mesh(self)
    }

    // -------------------------------------------------------------------------
    // Table maintenance (crate-internal)
    // -------------------------------------------------------------------------

    /// Orders two vertex keys canonically. `None` if either key is unknown.
    pub(crate) fn canonical_pair(&self, a: VertexKey, b: VertexKey) -> Option<(VertexKey, VertexKey)> {
        let pa = self.vertices.get(a)?.point();
        let pb = self.vertices.get(b)?.point();
        Some(canonical_pair((a, pa), (b, pb)))
    }

    /// Registers a vertex with no edges. `None` if `(x, y)` is taken.
    pub(crate) fn insert_vertex(&mut self, point: Point) -> Option<VertexKey> {
        match self.vertex_index.entry(point.xy()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let key = self.vertices.insert(Vertex::new(point));
                slot.insert(key);
                Some(key)
            }
        }
    }

    /// Unregisters a vertex that no edge references yet.
    pub(crate) fn remove_vertex(&mut self, key: VertexKey) {
        if let Some(vertex) = self.vertices.remove(key) {
            debug_assert!(vertex.edges().is_empty());
            self.vertex_index.remove(&vertex.point().xy());
        }
    }

    pub(crate) const fn record_flips(&mut self, flips: usize) {
        self.total_flips += flips;
    }

    pub(crate) fn edge_mut(&mut self, key: EdgeKey) -> Option<&mut Edge> {
        self.edges.get_mut(key)
    }

    pub(crate) fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.vertices.get_mut(key)
    }

    /// Registers a triangle, creating missing edges and updating the boundary.
    ///
    /// A new edge starts on the boundary; an existing edge gaining its second
    /// triangle leaves it. Does not flip.
    ///
    /// # Panics
    ///
    /// Panics if a vertex of `shape` is not in the mesh.
    pub(crate) fn add_triangle(&mut self, shape: OrientedTriangle) -> TriangleKey {
        let key = self
            .triangles
            .insert(Triangle::new(shape, [EdgeKey::default(); 3]));
        let edges = shape.sides().map(|(a, b)| self.attach_side(a, b, key));
        self.triangles[key] = Triangle::new(shape, edges);
        self.triangle_order.push(key);
        key
    }

    fn attach_side(&mut self, a: VertexKey, b: VertexKey, triangle: TriangleKey) -> EdgeKey {
        let pair = canonical_pair(
            (a, self.vertices[a].point()),
            (b, self.vertices[b].point()),
        );
        match self.edge_index.entry(pair) {
            Entry::Occupied(slot) => {
                let key = *slot.get();
                self.edges[key].attach_triangle(triangle);
                self.boundary.retain(|e| *e != key);
                key
            }
            Entry::Vacant(slot) => {
                let mut edge = Edge::new(pair);
                edge.attach_triangle(triangle);
                let key = self.edges.insert(edge);
                slot.insert(key);
                self.vertices[pair.0].attach_edge(key);
                self.vertices[pair.1].attach_edge(key);
                self.boundary.push(key);
                key
            }
        }
    }

    /// Unregisters a triangle.
    ///
    /// An edge this triangle owned alone is removed along with its vertex
    /// back-links; an edge shared with another triangle returns to the boundary.
    pub(crate) fn delete_triangle(&mut self, key: TriangleKey) -> Option<Triangle> {
        let triangle = self.triangles.remove(key)?;
        if let Some(position) = self.triangle_order.iter().position(|t| *t == key) {
            self.triangle_order.remove(position);
        }
        for edge_key in triangle.edges() {
            let Some(edge) = self.edges.get_mut(edge_key) else {
                continue;
            };
            edge.detach_triangle(key);
            if edge.triangles().is_empty() {
                let [v0, v1] = edge.vertices();
                self.edges.remove(edge_key);
                self.edge_index.remove(&(v0, v1));
                for v in [v0, v1] {
                    if let Some(vertex) = self.vertices.get_mut(v) {
                        vertex.detach_edge(edge_key);
                    }
                }
                self.boundary.retain(|e| *e != edge_key);
            } else {
                self.boundary.push(edge_key);
            }
        }
        Some(triangle)
    }

    /// Triangles sharing a side with `key`, side by side.
    pub(crate) fn neighbors(&self, key: TriangleKey) -> NeighborBuffer {
        let mut neighbors = NeighborBuffer::new();
        let Some(triangle) = self.triangles.get(key) else {
            return neighbors;
        };
        for edge_key in triangle.edges() {
            if let Some(edge) = self.edges.get(edge_key) {
                neighbors.extend(edge.triangles().iter().copied().filter(|t| *t != key));
            }
        }
        neighbors
    }
}
