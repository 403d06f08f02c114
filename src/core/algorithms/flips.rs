//! Flip legalization.
//!
//! A pair of triangles sharing a side is *legal* when the two angles opposite
//! that side sum to at most π (see
//! [`OrientedTriangle::check_angles`](crate::core::triangle::OrientedTriangle::check_angles)).
//! For a convex quadrilateral with all heights at zero this is the
//! empty-circumcircle test; heights skew it.
//!
//! # Worklist policy
//!
//! [`add_and_flip_triangle`] registers a triangle and seeds a worklist with
//! one `(triangle, neighbor)` pair per neighbor. Each round scans the worklist
//! in order and flips the *first* illegal pair. The worklist is then replaced
//! by the pairs of the two new triangles with their neighbors, leaving out the
//! new pair itself. Legalization ends when a round finds no illegal pair.
//!
//! The first-match order decides which flip happens under floating-point near
//! ties, so flip counts and final shapes depend on it.

use crate::core::mesh::{EdgeKey, Mesh, TriangleKey};
use crate::core::triangle::OrientedTriangle;

/// Extra flips allowed per legalization on top of four per triangle.
const FLIP_CAP_SLACK: usize = 64;

/// Registers `shape` and legalizes around it. Returns the number of flips.
///
/// Legalization stops early, with a warning, after
/// `4 * triangle_count + 64` flips.
///
/// # Panics
///
/// Panics if a vertex of `shape` is not in the mesh.
pub fn add_and_flip_triangle(mesh: &mut Mesh, shape: OrientedTriangle) -> usize {
    let key = mesh.add_triangle(shape);
    let mut worklist: Vec<(TriangleKey, TriangleKey)> =
        mesh.neighbors(key).into_iter().map(|n| (key, n)).collect();

    let cap = 4 * mesh.number_of_triangles() + FLIP_CAP_SLACK;
    let mut flips = 0;

    while let Some((t, n, replacement)) = first_illegal_pair(mesh, &worklist) {
        if flips >= cap {
            tracing::warn!(
                flips,
                cap,
                triangles = mesh.number_of_triangles(),
                "flip legalization hit its cap; leaving remaining pairs unflipped"
            );
            break;
        }
        flips += 1;

        mesh.delete_triangle(t);
        mesh.delete_triangle(n);
        let flipped = replacement.map(|shape| mesh.add_triangle(shape));

        worklist.clear();
        for k in flipped {
            worklist.extend(
                mesh.neighbors(k)
                    .into_iter()
                    .filter(|other| !flipped.contains(other))
                    .map(|other| (k, other)),
            );
        }
    }

    if flips > 0 {
        tracing::debug!(flips, "legalized new triangle");
    }
    flips
}

/// The first pair in `worklist` that fails the angle test, with its flip.
fn first_illegal_pair(
    mesh: &Mesh,
    worklist: &[(TriangleKey, TriangleKey)],
) -> Option<(TriangleKey, TriangleKey, [OrientedTriangle; 2])> {
    let table = mesh.vertex_table();
    worklist.iter().find_map(|&(t, n)| {
        let a = mesh.triangle(t)?.shape();
        let b = mesh.triangle(n)?.shape();
        if a.check_angles(b, table) {
            return None;
        }
        a.flip(b, table).map(|flipped| (t, n, flipped))
    })
}

/// Returns `true` if no interior edge of `mesh` joins an illegal pair.
#[must_use]
pub fn is_locally_legal(mesh: &Mesh) -> bool {
    first_illegal_edge(mesh).is_none()
}

/// The first interior edge, in table order, whose two triangles fail the
/// angle test.
pub(crate) fn first_illegal_edge(mesh: &Mesh) -> Option<(EdgeKey, TriangleKey, TriangleKey)> {
    let table = mesh.vertex_table();
    mesh.edges().find_map(|(key, edge)| {
        let &[t, n] = edge.triangles() else {
            return None;
        };
        let a = mesh.triangle(t)?.shape();
        let b = mesh.triangle(n)?.shape();
        (!a.check_angles(b, table)).then_some((key, t, n))
    })
}
