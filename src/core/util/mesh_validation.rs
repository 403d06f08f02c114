//! Mesh invariant validation.
//!
//! Validators return the first violation they find rather than a boolean, so
//! a failing test can say exactly what broke. The checks are grouped by cost:
//!
//! - [`validate_topology`]: tables, back-links, indices and the boundary list.
//! - [`validate_point_location`]: no triangle is degenerate and no vertex lies
//!   strictly inside a triangle.
//! - [`validate_legality`]: every interior edge passes the angle test.
//! - [`validate_visible_connectivity`]: the visible edges reach every vertex.
//!
//! [`validate_mesh`] runs the first two. Legality is only guaranteed right
//! after construction, and connectivity only matters once thinning starts.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::algorithms::flips::first_illegal_edge;
use crate::core::algorithms::thinning::visible_component;
use crate::core::collections::EdgeKeySet;
use crate::core::mesh::{EdgeKey, Mesh, TriangleKey, VertexKey};

/// Errors reported by mesh validation.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::mesh::EdgeKey;
/// use sweepmesh::core::util::MeshValidationError;
///
/// let err = MeshValidationError::EdgeIncidence {
///     edge_key: EdgeKey::default(),
///     count: 3,
/// };
/// assert!(err.to_string().contains("3 triangles"));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MeshValidationError {
    /// An edge is owned by no triangle or by more than two.
    #[error("Edge {edge_key:?} is owned by {count} triangles; expected 1 or 2")]
    EdgeIncidence {
        /// The offending edge.
        edge_key: EdgeKey,
        /// How many triangles list it.
        count: usize,
    },

    /// An edge is on the boundary list but not owned by exactly one triangle,
    /// or the other way round.
    #[error("Edge {edge_key:?} boundary membership disagrees with its incidence")]
    BoundaryMismatch {
        /// The offending edge.
        edge_key: EdgeKey,
    },

    /// An edge appears on the boundary list more than once.
    #[error("Edge {edge_key:?} is listed on the boundary more than once")]
    DuplicateBoundaryEdge {
        /// The offending edge.
        edge_key: EdgeKey,
    },

    /// A triangle refers to an edge that is missing or joins the wrong vertices.
    #[error("Triangle {triangle_key:?} side {side} does not match edge {edge_key:?}")]
    TriangleEdgeMismatch {
        /// The triangle.
        triangle_key: TriangleKey,
        /// Index of the side.
        side: usize,
        /// The edge the triangle lists for that side.
        edge_key: EdgeKey,
    },

    /// An edge lists a triangle that does not list the edge back.
    #[error("Edge {edge_key:?} lists triangle {triangle_key:?}, which does not list it back")]
    StaleTriangleLink {
        /// The edge.
        edge_key: EdgeKey,
        /// The triangle named by the edge.
        triangle_key: TriangleKey,
    },

    /// A vertex's incident-edge list disagrees with the edge table.
    #[error("Vertex {vertex_key:?} and edge {edge_key:?} disagree about incidence")]
    VertexEdgeMismatch {
        /// The vertex.
        vertex_key: VertexKey,
        /// The edge.
        edge_key: EdgeKey,
    },

    /// A lookup index has an entry count or an entry that does not match the
    /// tables.
    #[error("The {index} index is out of sync with its table")]
    IndexMismatch {
        /// Which index: `"vertex"` or `"edge"`.
        index: &'static str,
    },

    /// A triangle has collinear corners.
    #[error("Triangle {triangle_key:?} is degenerate")]
    DegenerateTriangle {
        /// The degenerate triangle.
        triangle_key: TriangleKey,
    },

    /// A vertex lies strictly inside a triangle it is not a corner of.
    #[error("Vertex {vertex_key:?} lies strictly inside triangle {triangle_key:?}")]
    VertexInsideTriangle {
        /// The enclosed vertex.
        vertex_key: VertexKey,
        /// The enclosing triangle.
        triangle_key: TriangleKey,
    },

    /// Two triangles sharing an edge fail the angle-sum test.
    #[error("Triangles {first:?} and {second:?} across edge {edge_key:?} need a flip")]
    IllegalPair {
        /// The shared edge.
        edge_key: EdgeKey,
        /// One triangle.
        first: TriangleKey,
        /// The other triangle.
        second: TriangleKey,
    },

    /// The visible edges do not reach this vertex from the first vertex.
    #[error("Vertex {vertex_key:?} is not reachable over visible edges")]
    Disconnected {
        /// An unreachable vertex.
        vertex_key: VertexKey,
    },
}

/// Runs [`validate_topology`] and [`validate_point_location`].
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_mesh(mesh: &Mesh) -> Result<(), MeshValidationError> {
    validate_topology(mesh)?;
    validate_point_location(mesh)
}

/// Checks that the tables agree with one another.
///
/// - Every edge is owned by one or two triangles, each of which lists it on
///   the matching side.
/// - The boundary list holds each edge with one owner exactly once and
///   nothing else.
/// - Every vertex lists exactly the edges that end at it.
/// - The vertex and edge indices map every entity back to itself.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_topology(mesh: &Mesh) -> Result<(), MeshValidationError> {
    for (triangle_key, triangle) in mesh.triangles() {
        for (side, ((a, b), edge_key)) in triangle
            .shape()
            .sides()
            .into_iter()
            .zip(triangle.edges())
            .enumerate()
        {
            let matches = mesh.edge(edge_key).is_some_and(|edge| {
                edge.contains_vertex(a)
                    && edge.contains_vertex(b)
                    && edge.triangles().contains(&triangle_key)
            });
            if !matches {
                return Err(MeshValidationError::TriangleEdgeMismatch {
                    triangle_key,
                    side,
                    edge_key,
                });
            }
        }
    }

    let mut on_boundary = EdgeKeySet::default();
    for &edge_key in mesh.boundary_edges() {
        if !on_boundary.insert(edge_key) {
            return Err(MeshValidationError::DuplicateBoundaryEdge { edge_key });
        }
    }

    for (edge_key, edge) in mesh.edges() {
        let count = edge.triangles().len();
        if !(1..=2).contains(&count) {
            return Err(MeshValidationError::EdgeIncidence { edge_key, count });
        }
        if (count == 1) != on_boundary.contains(&edge_key) {
            return Err(MeshValidationError::BoundaryMismatch { edge_key });
        }
        for &triangle_key in edge.triangles() {
            let listed = mesh
                .triangle(triangle_key)
                .is_some_and(|t| t.edges().contains(&edge_key));
            if !listed {
                return Err(MeshValidationError::StaleTriangleLink {
                    edge_key,
                    triangle_key,
                });
            }
        }
        for vertex_key in edge.vertices() {
            let listed = mesh
                .vertex(vertex_key)
                .is_some_and(|v| v.edges().contains(&edge_key));
            if !listed {
                return Err(MeshValidationError::VertexEdgeMismatch {
                    vertex_key,
                    edge_key,
                });
            }
        }
        let [a, b] = edge.vertices();
        if mesh.edge_between(a, b) != Some(edge_key) {
            return Err(MeshValidationError::IndexMismatch { index: "edge" });
        }
    }
    if let Some(&edge_key) = mesh
        .boundary_edges()
        .iter()
        .find(|e| mesh.edge(**e).is_none())
    {
        return Err(MeshValidationError::BoundaryMismatch { edge_key });
    }

    for (vertex_key, vertex) in mesh.vertices() {
        for &edge_key in vertex.edges() {
            let links_back = mesh
                .edge(edge_key)
                .is_some_and(|e| e.contains_vertex(vertex_key));
            if !links_back {
                return Err(MeshValidationError::VertexEdgeMismatch {
                    vertex_key,
                    edge_key,
                });
            }
        }
        let (x, y) = vertex.point().xy();
        if mesh.vertex_key_at(x, y) != Some(vertex_key) {
            return Err(MeshValidationError::IndexMismatch { index: "vertex" });
        }
    }

    let (vertex_entries, edge_entries, triangle_entries) = mesh.index_sizes();
    if vertex_entries != mesh.number_of_vertices() {
        return Err(MeshValidationError::IndexMismatch { index: "vertex" });
    }
    if edge_entries != mesh.number_of_edges() {
        return Err(MeshValidationError::IndexMismatch { index: "edge" });
    }
    if triangle_entries != mesh.number_of_triangles() {
        return Err(MeshValidationError::IndexMismatch { index: "triangle" });
    }
    Ok(())
}

/// Checks that no triangle is degenerate and no vertex lies strictly inside
/// any triangle.
///
/// This is O(vertices × triangles).
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_point_location(mesh: &Mesh) -> Result<(), MeshValidationError> {
    let table = mesh.vertex_table();
    for (triangle_key, triangle) in mesh.triangles() {
        let shape = triangle.shape();
        if shape.is_degenerate(table) {
            return Err(MeshValidationError::DegenerateTriangle { triangle_key });
        }
        if let Some((vertex_key, _)) = mesh
            .vertices()
            .find(|(_, v)| shape.contains_strictly(table, v.point()))
        {
            return Err(MeshValidationError::VertexInsideTriangle {
                vertex_key,
                triangle_key,
            });
        }
    }
    Ok(())
}

/// Checks that every pair of triangles sharing an edge passes the angle test.
///
/// # Errors
///
/// Returns [`MeshValidationError::IllegalPair`] for the first failing edge.
pub fn validate_legality(mesh: &Mesh) -> Result<(), MeshValidationError> {
    match first_illegal_edge(mesh) {
        Some((edge_key, first, second)) => Err(MeshValidationError::IllegalPair {
            edge_key,
            first,
            second,
        }),
        None => Ok(()),
    }
}

/// Checks that the visible edges connect every vertex.
///
/// # Errors
///
/// Returns [`MeshValidationError::Disconnected`] naming an unreachable vertex.
pub fn validate_visible_connectivity(mesh: &Mesh) -> Result<(), MeshValidationError> {
    let reached = visible_component(mesh);
    match mesh.vertices().find(|(k, _)| !reached.contains(k)) {
        Some((vertex_key, _)) => Err(MeshValidationError::Disconnected { vertex_key }),
        None => Ok(()),
    }
}
