//! Connectivity-preserving edge thinning.
//!
//! Thinning hides edges of a finished mesh one at a time. An edge is only
//! hidden after [`can_remove_edge`] has shown that its endpoints stay joined
//! by visible edges, so the visible graph stays connected throughout.
//!
//! # Memoization
//!
//! Every oracle answer is stored on the edge as `remove_failed`, and searches
//! skip edges marked as failed. The mark is never cleared. Hiding an edge
//! only ever removes paths, so a failed answer cannot go stale while the
//! mesh topology stays fixed; thinning is meant to run on a finished mesh.

use std::collections::VecDeque;

use rand::Rng;

use crate::core::collections::{
    EdgeKeySet, IncidentEdgeBuffer, SmallBuffer, VERTEX_DEGREE_BUFFER_SIZE,
    VertexKeySet,
};
use crate::core::edge::Edge;
use crate::core::mesh::{EdgeKey, Mesh, VertexKey};
use crate::geometry::point::Point;
use crate::geometry::predicates::angle_between;
use crate::geometry::util::random_point_in_extent;

// =============================================================================
// EDGE SELECTION
// =============================================================================

/// Hides one removable edge close to a random point of the mesh extent.
///
/// The sample is drawn the same way vertices are placed:
/// `x = rand(0..extent) - extent / 2`, likewise for `y`.
///
/// Returns the hidden edge, or `None` once no visible edge can be removed.
pub fn hide_random_edge<R: Rng + ?Sized>(mesh: &mut Mesh, rng: &mut R) -> Option<EdgeKey> {
    if mesh.number_of_vertices() == 0 {
        return None;
    }
    let sample = random_point_in_extent(rng, mesh.extent());
    hide_edge_near(mesh, &sample)
}

/// Hides one removable edge close to `sample`.
///
/// 1. Pick the vertex nearest `sample` (first one on ties).
/// 2. Search outward over visible edges for the first edge not already marked
///    as failed.
/// 3. Hide it if [`can_remove_edge`] agrees. Otherwise search outward from it
///    over edges sharing a vertex, testing each untested visible edge, and
///    hide the first that passes.
///
/// Returns `None` when neither search finds a removable edge.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::core::algorithms::thinning::hide_edge_near;
/// use sweepmesh::core::mesh::Mesh;
/// use sweepmesh::geometry::point::Point;
///
/// let mut mesh = Mesh::new(10);
/// for (x, y) in [(0, 0), (4, 0), (0, 4)] {
///     mesh.add_vertex(Point::new(x, y)).unwrap();
/// }
///
/// let hidden = hide_edge_near(&mut mesh, &Point::new(0, 0)).unwrap();
/// assert!(mesh.edge(hidden).unwrap().is_hidden());
///
/// // The remaining two sides form a path; neither can go.
/// assert!(hide_edge_near(&mut mesh, &Point::new(0, 0)).is_none());
/// assert!(mesh.is_visible_connected());
/// ```
pub fn hide_edge_near(mesh: &mut Mesh, sample: &Point) -> Option<EdgeKey> {
    let start = nearest_vertex(mesh, sample)?;
    let candidate = nearest_untested_edge(mesh, start)?;

    if can_remove_edge(mesh, candidate) {
        return hide(mesh, candidate);
    }

    let mut visited = EdgeKeySet::default();
    visited.insert(candidate);
    let mut frontier = vec![candidate];

    while !frontier.is_empty() {
        let mut next_round = Vec::new();
        for current in frontier {
            let Some(endpoints) = mesh.edge(current).map(|e| e.vertices()) else {
                continue;
            };
            for v in endpoints {
                let incident: IncidentEdgeBuffer = mesh
                    .vertex(v)
                    .map(|vertex| vertex.edges().iter().copied().collect())
                    .unwrap_or_default();
                for e in incident {
                    let Some(edge) = mesh.edge(e) else {
                        continue;
                    };
                    if edge.is_hidden() || !visited.insert(e) {
                        continue;
                    }
                    next_round.push(e);
                    let untested = !edge.remove_failed();
                    if untested && can_remove_edge(mesh, e) {
                        return hide(mesh, e);
                    }
                }
            }
        }
        frontier = next_round;
    }

    tracing::debug!(
        hidden = mesh.number_of_hidden_edges(),
        "no removable edge left"
    );
    None
}

/// Hides edges until none is removable or `budget` edges are hidden.
///
/// Returns the number of edges hidden by this call.
pub fn thin<R: Rng + ?Sized>(mesh: &mut Mesh, rng: &mut R, budget: Option<usize>) -> usize {
    let limit = budget.unwrap_or(usize::MAX);
    let mut hidden = 0;
    while hidden < limit && hide_random_edge(mesh, rng).is_some() {
        hidden += 1;
    }
    tracing::debug!(
        hidden,
        visible = mesh.number_of_edges() - mesh.number_of_hidden_edges(),
        "thinning finished"
    );
    hidden
}

fn hide(mesh: &mut Mesh, edge: EdgeKey) -> Option<EdgeKey> {
    mesh.edge_mut(edge)?.hide();
    Some(edge)
}

fn nearest_vertex(mesh: &Mesh, sample: &Point) -> Option<VertexKey> {
    mesh.vertices()
        .map(|(k, v)| (k, v.point().distance(sample)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
}

/// Breadth-first search over visible edges for the first edge not marked as
/// failed. Failed edges are walked through but not returned.
fn nearest_untested_edge(mesh: &Mesh, start: VertexKey) -> Option<EdgeKey> {
    let mut visited = VertexKeySet::default();
    visited.insert(start);
    let mut frontier = vec![start];

    while !frontier.is_empty() {
        let mut next_round = Vec::new();
        for v in frontier {
            let Some(vertex) = mesh.vertex(v) else {
                continue;
            };
            for &e in vertex.edges() {
                let Some(edge) = mesh.edge(e) else {
                    continue;
                };
                if edge.is_hidden() {
                    continue;
                }
                if !edge.remove_failed() {
                    return Some(e);
                }
                if let Some(other) = edge.other_vertex(v)
                    && visited.insert(other)
                {
                    next_round.push(other);
                }
            }
        }
        frontier = next_round;
    }
    None
}

// =============================================================================
// REMOVABILITY ORACLE
// =============================================================================

/// Decides whether hiding `edge` keeps its endpoints joined by visible edges,
/// and stores the negated answer as the edge's `remove_failed` mark.
///
/// - Fast path: some triangle owning `edge` has all three sides visible, so
///   the other two sides already join the endpoints.
/// - Otherwise a depth-first search looks for a visible path between the
///   endpoints that avoids `edge`. At each newly reached vertex the incident
///   edges are ordered by their angle to the edge just walked, smallest
///   first, which favors tight loops around nearby faces. That order is
///   written back to the vertex and steers later searches. The search fails
///   when it has backtracked all the way to the far endpoint.
///
/// Returns `false` for an unknown key.
pub fn can_remove_edge(mesh: &mut Mesh, edge: EdgeKey) -> bool {
    let Some([v1, v2]) = mesh.edge(edge).map(Edge::vertices) else {
        return false;
    };
    let removable =
        closes_visible_triangle(mesh, edge) || alternate_path_exists(mesh, edge, v1, v2);
    if let Some(target) = mesh.edge_mut(edge) {
        target.set_remove_failed(!removable);
    }
    removable
}

fn closes_visible_triangle(mesh: &Mesh, edge: EdgeKey) -> bool {
    let Some(target) = mesh.edge(edge) else {
        return false;
    };
    target.triangles().iter().any(|&t| {
        mesh.triangle(t).is_some_and(|triangle| {
            triangle
                .edges()
                .iter()
                .all(|&e| mesh.edge(e).is_some_and(|side| !side.is_hidden()))
        })
    })
}

/// Depth-first search from `v2` back to `v1` that never uses `edge`.
fn alternate_path_exists(mesh: &mut Mesh, edge: EdgeKey, v1: VertexKey, v2: VertexKey) -> bool {
    let mut visited = VertexKeySet::default();
    visited.insert(v1);
    let mut path = vec![v1];
    let mut next = Some(v2);
    let mut arrival = edge;

    while let Some(current) = next {
        if current == v1 {
            return true;
        }
        if visited.insert(current) {
            sort_edges_by_turn(mesh, current, arrival);
        }
        path.push(current);

        next = mesh
            .vertex(current)
            .and_then(|vertex| {
                vertex.edges().iter().find_map(|&e| {
                    let candidate_edge = mesh.edge(e)?;
                    if e == edge || candidate_edge.is_hidden() {
                        return None;
                    }
                    let candidate = candidate_edge.other_vertex(current)?;
                    (candidate == v1 || !visited.contains(&candidate)).then_some((candidate, e))
                })
            })
            .map(|(candidate, e)| {
                arrival = e;
                candidate
            });

        if next.is_none() {
            if path.len() <= 2 {
                return false;
            }
            path.pop();
            next = path.pop();
        }
    }
    false
}

/// Re-sorts the incident edges of `at` by their angle to `arrival`, smallest
/// first. `arrival` itself sorts to the front. The order is kept on the
/// vertex.
fn sort_edges_by_turn(mesh: &mut Mesh, at: VertexKey, arrival: EdgeKey) {
    let Some(order) = edges_by_turn(mesh, at, arrival) else {
        return;
    };
    if let Some(vertex) = mesh.vertex_mut(at) {
        vertex.reorder_edges(order);
    }
}

fn edges_by_turn(mesh: &Mesh, at: VertexKey, arrival: EdgeKey) -> Option<IncidentEdgeBuffer> {
    let vertex = mesh.vertex(at)?;
    let from = mesh.point(mesh.edge(arrival)?.other_vertex(at)?)?;
    let origin = vertex.point();

    let mut by_angle: SmallBuffer<(f64, EdgeKey), VERTEX_DEGREE_BUFFER_SIZE> = vertex
        .edges()
        .iter()
        .map(|&e| {
            let other = mesh.edge(e)?.other_vertex(at)?;
            Some((angle_between(origin, from, mesh.point(other)?), e))
        })
        .collect::<Option<_>>()?;
    by_angle.sort_by(|a, b| a.0.total_cmp(&b.0));
    Some(by_angle.into_iter().map(|(_, e)| e).collect())
}

// =============================================================================
// CONNECTIVITY
// =============================================================================

/// Returns `true` if the visible edges connect every vertex of the mesh.
///
/// Empty and single-vertex meshes count as connected.
#[must_use]
pub fn is_visible_connected(mesh: &Mesh) -> bool {
    visible_component(mesh).len() == mesh.number_of_vertices()
}

/// Vertices reachable over visible edges from the first vertex in table order.
pub(crate) fn visible_component(mesh: &Mesh) -> VertexKeySet {
    let mut reached = VertexKeySet::default();
    let Some((start, _)) = mesh.vertices().next() else {
        return reached;
    };
    reached.insert(start);
    let mut queue = VecDeque::from([start]);

    while let Some(v) = queue.pop_front() {
        let Some(vertex) = mesh.vertex(v) else {
            continue;
        };
        for &e in vertex.edges() {
            let Some(edge) = mesh.edge(e) else {
                continue;
            };
            if edge.is_hidden() {
                continue;
            }
            if let Some(other) = edge.other_vertex(v)
                && reached.insert(other)
            {
                queue.push_back(other);
            }
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::util::validate_mesh;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mesh_with(points: &[(i64, i64)]) -> Mesh {
        let mut mesh = Mesh::new(10);
        for &(x, y) in points {
            mesh.add_vertex(Point::new(x, y)).unwrap();
        }
        mesh
    }

    fn visible_edges(mesh: &Mesh) -> usize {
        mesh.number_of_edges() - mesh.number_of_hidden_edges()
    }

    #[test]
    fn test_fast_path_on_fully_visible_triangle() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        let edges: Vec<EdgeKey> = mesh.edges().map(|(k, _)| k).collect();
        for e in edges {
            assert!(can_remove_edge(&mut mesh, e));
            assert!(!mesh.edge(e).unwrap().remove_failed());
        }
    }

    #[test]
    fn test_path_edge_is_not_removable_and_is_memoized() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        let hidden = hide_edge_near(&mut mesh, &Point::new(0, 0)).unwrap();
        let rest: Vec<EdgeKey> = mesh
            .edges()
            .map(|(k, _)| k)
            .filter(|k| *k != hidden)
            .collect();
        for e in rest {
            assert!(!can_remove_edge(&mut mesh, e));
            assert!(mesh.edge(e).unwrap().remove_failed());
        }
    }

    #[test]
    fn test_square_loses_exactly_one_edge_per_cycle() {
        // Two triangles: five edges, four vertices. A spanning tree keeps three.
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4), (4, 4)]);
        let mut rng = StdRng::seed_from_u64(7);
        let hidden = thin(&mut mesh, &mut rng, None);
        assert_eq!(hidden, 2);
        assert_eq!(visible_edges(&mesh), 3);
        assert!(is_visible_connected(&mesh));
    }

    #[test]
    fn test_slow_path_finds_detour_around_quad() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4), (4, 4)]);
        let a = mesh.vertex_key_at(0, 0).unwrap();
        let b = mesh.vertex_key_at(4, 0).unwrap();
        let c = mesh.vertex_key_at(0, 4).unwrap();
        let d = mesh.vertex_key_at(4, 4).unwrap();

        // Hide the diagonal; every outer side is then only removable via the
        // slow path around the quad.
        let diagonal = mesh.edge_between(b, c).unwrap();
        mesh.edge_mut(diagonal).unwrap().hide();

        let ab = mesh.edge_between(a, b).unwrap();
        assert!(!closes_visible_triangle(&mesh, ab));
        assert!(can_remove_edge(&mut mesh, ab));
        mesh.edge_mut(ab).unwrap().hide();

        let cd = mesh.edge_between(c, d).unwrap();
        assert!(!can_remove_edge(&mut mesh, cd));
        assert!(is_visible_connected(&mesh));
    }

    #[test]
    fn test_slow_path_leaves_vertex_edges_sorted_by_turn() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4), (4, 4)]);
        let a = mesh.vertex_key_at(0, 0).unwrap();
        let b = mesh.vertex_key_at(4, 0).unwrap();
        let c = mesh.vertex_key_at(0, 4).unwrap();
        let d = mesh.vertex_key_at(4, 4).unwrap();
        let ab = mesh.edge_between(a, b).unwrap();
        let bc = mesh.edge_between(b, c).unwrap();
        let bd = mesh.edge_between(b, d).unwrap();
        mesh.edge_mut(bc).unwrap().hide();

        // The search enters `b` along `ab`, heading west: `bc` turns 45
        // degrees, `bd` turns 90.
        assert!(can_remove_edge(&mut mesh, ab));
        assert_eq!(mesh.vertex(b).unwrap().edges(), &[ab, bc, bd]);
        assert_eq!(validate_mesh(&mesh), Ok(()));
    }

    #[test]
    fn test_budget_limits_thinning() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4), (4, 4), (2, -3)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(thin(&mut mesh, &mut rng, Some(1)), 1);
        assert_eq!(mesh.number_of_hidden_edges(), 1);
        assert_eq!(thin(&mut mesh, &mut rng, Some(0)), 0);
    }

    #[test]
    fn test_zero_extent_mesh_still_thins() {
        let mut mesh = Mesh::new(0);
        for (x, y) in [(0, 0), (4, 0), (0, 4)] {
            mesh.add_vertex(Point::new(x, y)).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert!(hide_random_edge(&mut mesh, &mut rng).is_some());
        assert_eq!(thin(&mut mesh, &mut rng, None), 0);
        assert!(is_visible_connected(&mesh));
    }

    #[test]
    fn test_empty_mesh_has_nothing_to_hide() {
        let mut mesh = Mesh::new(10);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(hide_random_edge(&mut mesh, &mut rng).is_none());
        assert!(is_visible_connected(&mesh));
    }

    #[test]
    fn test_disconnected_visible_graph_is_detected() {
        let mut mesh = mesh_with(&[(0, 0), (4, 0), (0, 4)]);
        let a = mesh.vertex_key_at(0, 0).unwrap();
        for e in mesh.vertex(a).unwrap().edges().to_vec() {
            mesh.edge_mut(e).unwrap().hide();
        }
        assert!(!is_visible_connected(&mesh));
    }
}
