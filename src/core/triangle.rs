//! Triangles and their geometric predicates.
//!
//! Two types live here:
//!
//! - [`OrientedTriangle`] is a plain value: three vertex keys stored in
//!   counter-clockwise order. Candidate triangles (the fan around a new
//!   vertex, the result of a flip) are built as `OrientedTriangle`s before the
//!   mesh decides whether to register them.
//! - [`Triangle`] is a registered triangle: its shape plus the keys of its
//!   three edges, filled in by the mesh on registration.
//!
//! Triangles are never mutated. A flip or split deletes the old triangles and
//! registers new ones.
//!
//! All predicates take the vertex table explicitly, since a triangle only
//! stores keys.

use std::f64::consts::PI;

use crate::core::mesh::{EdgeKey, VertexKey, VertexTable};
use crate::geometry::point::Point;
use crate::geometry::predicates::{
    Orientation, angle_between, orientation, segments_intersect, signed_area2,
};

/// Three vertices in counter-clockwise order.
///
/// Construction computes the signed area of `(a, b, c)`; if it is not
/// positive the last two vertices are swapped. A collinear triple therefore
/// keeps the swapped order and is reported by [`Self::is_degenerate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrientedTriangle {
    vertices: [VertexKey; 3],
}

impl OrientedTriangle {
    /// Creates a counter-clockwise triangle from three vertex keys.
    ///
    /// # Panics
    ///
    /// Panics if any key is missing from `table`.
    #[must_use]
    pub fn new(table: &VertexTable, a: VertexKey, b: VertexKey, c: VertexKey) -> Self {
        let ccw = orientation(table[a].point(), table[b].point(), table[c].point())
            == Orientation::POSITIVE;
        Self {
            vertices: if ccw { [a, b, c] } else { [a, c, b] },
        }
    }

    /// Vertex keys in counter-clockwise order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 3] {
        self.vertices
    }

    /// Returns `true` if `vertex` is a corner of this triangle.
    #[inline]
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Position of `vertex` in the counter-clockwise order.
    #[inline]
    #[must_use]
    pub fn index_of(&self, vertex: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|v| *v == vertex)
    }

    /// The three sides as `(vertices[i], vertices[i + 1])` pairs.
    ///
    /// Side `i` is opposite vertex `i + 2`.
    #[must_use]
    pub const fn sides(&self) -> [(VertexKey, VertexKey); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Corner positions in counter-clockwise order.
    #[must_use]
    pub fn points(&self, table: &VertexTable) -> [Point; 3] {
        self.vertices.map(|v| *table[v].point())
    }

    /// Returns `true` if the three corners are collinear.
    #[must_use]
    pub fn is_degenerate(&self, table: &VertexTable) -> bool {
        let [p0, p1, p2] = self.points(table);
        signed_area2(&p0, &p1, &p2) == 0
    }

    /// Half-open barycentric containment test.
    ///
    /// With `u` measured along `vertices[2] - vertices[0]` and `v` along
    /// `vertices[1] - vertices[0]`, the point is inside iff `u >= 0`, `v >= 0`
    /// and `u + v < 1`. The two sides through `vertices[0]` are included; the
    /// far side `(vertices[1], vertices[2])` is excluded. Degenerate triangles
    /// contain nothing.
    ///
    /// The test is exact: both inequalities are multiplied through by the
    /// (positive) denominator and evaluated in `i128`. Exactness holds while
    /// coordinate spans stay below `2^30`.
    #[must_use]
    pub fn contains(&self, table: &VertexTable, point: &Point) -> bool {
        let [p0, p1, p2] = self.points(table);
        let v0 = delta(&p2, &p0);
        let v1 = delta(&p1, &p0);
        let v2 = delta(point, &p0);

        let dot00 = dot(v0, v0);
        let dot01 = dot(v0, v1);
        let dot02 = dot(v0, v2);
        let dot11 = dot(v1, v1);
        let dot12 = dot(v1, v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom == 0 {
            return false;
        }
        let u = dot11 * dot02 - dot01 * dot12;
        let v = dot00 * dot12 - dot01 * dot02;
        u >= 0 && v >= 0 && u + v < denom
    }

    /// Closed containment: inside or on any side. Degenerate triangles contain
    /// nothing.
    #[must_use]
    pub fn contains_closed(&self, table: &VertexTable, point: &Point) -> bool {
        self.side_areas(table, point)
            .is_some_and(|areas| areas.iter().all(|a| *a >= 0))
    }

    /// Strict containment: inside and on no side.
    #[must_use]
    pub fn contains_strictly(&self, table: &VertexTable, point: &Point) -> bool {
        self.side_areas(table, point)
            .is_some_and(|areas| areas.iter().all(|a| *a > 0))
    }

    fn side_areas(&self, table: &VertexTable, point: &Point) -> Option<[i128; 3]> {
        if self.is_degenerate(table) {
            return None;
        }
        let [p0, p1, p2] = self.points(table);
        Some([
            signed_area2(&p0, &p1, point),
            signed_area2(&p1, &p2, point),
            signed_area2(&p2, &p0, point),
        ])
    }

    /// The first corner not on the side `(a, b)`.
    #[must_use]
    pub fn apex_off(&self, a: VertexKey, b: VertexKey) -> Option<VertexKey> {
        self.vertices.into_iter().find(|v| *v != a && *v != b)
    }

    /// The first corner of `self` that is not a corner of `other`.
    ///
    /// For two triangles sharing a side this is the apex opposite that side.
    #[must_use]
    pub fn apex_opposite(&self, other: &Self) -> Option<VertexKey> {
        self.vertices
            .into_iter()
            .find(|v| !other.contains_vertex(*v))
    }

    /// Interior angle at `vertex`, in radians, computed in 3D.
    #[must_use]
    pub fn angle_at(&self, table: &VertexTable, vertex: VertexKey) -> Option<f64> {
        let i = self.index_of(vertex)?;
        let at = table[vertex].point();
        let next = table[self.vertices[(i + 1) % 3]].point();
        let prev = table[self.vertices[(i + 2) % 3]].point();
        Some(angle_between(at, next, prev))
    }

    /// Local legality of the pair `(self, other)`, which share a side.
    ///
    /// Sums the angle of `other` opposite the shared side and the angle of
    /// `self` opposite it; the pair is legal iff the sum is at most π. A
    /// missing apex contributes nothing.
    #[must_use]
    pub fn check_angles(&self, other: &Self, table: &VertexTable) -> bool {
        let opposite = |t: &Self, u: &Self| {
            t.apex_opposite(u)
                .and_then(|apex| t.angle_at(table, apex))
                .unwrap_or(0.0)
        };
        opposite(other, self) + opposite(self, other) <= PI
    }

    /// Swaps the shared side of `(self, other)` for the segment between their
    /// apexes.
    ///
    /// With `c` the apex of `self`, `d` the apex of `other` and `(a, b)` the
    /// shared side, the result is `[(d, c, a), (d, c, b)]`, where `a` and `b`
    /// follow `c` in `self`'s counter-clockwise order. Returns `None` if the
    /// triangles do not have distinct apexes.
    #[must_use]
    pub fn flip(&self, other: &Self, table: &VertexTable) -> Option<[Self; 2]> {
        let d = other.apex_opposite(self)?;
        let c = self.apex_opposite(other)?;
        let j = self.index_of(c)?;
        let a = self.vertices[(j + 1) % 3];
        let b = self.vertices[(j + 2) % 3];
        Some([Self::new(table, d, c, a), Self::new(table, d, c, b)])
    }

    /// Detects overlap between `self` and `other` beyond their shared side `(a, b)`.
    ///
    /// The triangles overlap if either apex lies inside the other triangle or
    /// if a wing of one (apex to an endpoint of the shared side) crosses the
    /// opposite wing of the other.
    #[must_use]
    pub fn intersects(&self, other: &Self, shared: (VertexKey, VertexKey), table: &VertexTable) -> bool {
        let (a, b) = shared;
        let (Some(c), Some(d)) = (self.apex_off(a, b), other.apex_off(a, b)) else {
            return false;
        };
        let pa = table[a].point();
        let pb = table[b].point();
        let pc = table[c].point();
        let pd = table[d].point();

        if other.contains(table, pc) || self.contains(table, pd) {
            return true;
        }
        segments_intersect((pc, pa), (pd, pb)) || segments_intersect((pc, pb), (pd, pa))
    }
}

fn delta(p: &Point, origin: &Point) -> [i128; 2] {
    [
        i128::from(p.x()) - i128::from(origin.x()),
        i128::from(p.y()) - i128::from(origin.y()),
    ]
}

const fn dot(u: [i128; 2], v: [i128; 2]) -> i128 {
    u[0] * v[0] + u[1] * v[1]
}

/// A triangle registered in the mesh.
///
/// `edges()[i]` is the edge on side `shape().sides()[i]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    shape: OrientedTriangle,
    edges: [EdgeKey; 3],
}

impl Triangle {
    pub(crate) const fn new(shape: OrientedTriangle, edges: [EdgeKey; 3]) -> Self {
        Self { shape, edges }
    }

    /// The counter-clockwise vertex triple.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> &OrientedTriangle {
        &self.shape
    }

    /// Vertex keys in counter-clockwise order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 3] {
        self.shape.vertices
    }

    /// Edge keys, side by side.
    #[inline]
    #[must_use]
    pub const fn edges(&self) -> [EdgeKey; 3] {
        self.edges
    }
}
