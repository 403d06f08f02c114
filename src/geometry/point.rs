//! Integer lattice points.
//!
//! Every mesh vertex sits on an integer `(x, y)` lattice position, which keeps
//! orientation, collinearity and containment tests exact. The `z` coordinate
//! plays no part in topology or identity: it is set after triangulation by
//! whatever drapes the mesh over a height field, but it does participate in
//! angle computations (see [`crate::geometry::predicates::angle_between`]).

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// A point with integer coordinates.
///
/// Equality, hashing and ordering all ignore `z`: two points are the same
/// lattice position exactly when their `(x, y)` pairs match.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::geometry::point::Point;
///
/// let p = Point::new(3, -4);
/// assert_eq!(p.xy(), (3, -4));
/// assert_eq!(p.z(), 0);
///
/// let lifted = p.with_z(10);
/// assert_eq!(lifted, p);
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    x: i64,
    y: i64,
    #[serde(default)]
    z: i64,
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl Point {
    /// Creates a point in the plane (`z = 0`).
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y, z: 0 }
    }

    /// Creates a point with an explicit height.
    #[inline]
    #[must_use]
    pub const fn new_3d(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Returns a copy of this point with `z` replaced.
    #[inline]
    #[must_use]
    pub const fn with_z(self, z: i64) -> Self {
        Self { z, ..self }
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> i64 {
        self.y
    }

    /// The z coordinate.
    #[inline]
    #[must_use]
    pub const fn z(&self) -> i64 {
        self.z
    }

    /// The `(x, y)` pair that identifies this point.
    #[inline]
    #[must_use]
    pub const fn xy(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The point as a 3D vector of `f64`.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "mesh coordinates are far below 2^53"
    )]
    pub fn to_vec3(&self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }

    /// Component-wise difference `self - other` as an `f64` vector.
    #[inline]
    #[must_use]
    pub fn sub_vec3(&self, other: &Self) -> [f64; 3] {
        let a = self.to_vec3();
        let b = other.to_vec3();
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Euclidean distance in 3D (z included).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sweepmesh::geometry::point::Point;
    ///
    /// let a = Point::new(0, 0);
    /// let b = Point::new(3, 4);
    /// assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let d = self.sub_vec3(other);
        d[2].mul_add(d[2], d[0].mul_add(d[0], d[1] * d[1])).sqrt()
    }

    /// Lexicographic comparison on `(x, y)`.
    ///
    /// This is the canonical order used to orient edge endpoints.
    #[inline]
    #[must_use]
    pub fn cmp_xy(&self, other: &Self) -> Ordering {
        self.xy().cmp(&other.xy())
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.xy() == other.xy()
    }
}

impl Eq for Point {}

impl std::hash::Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.xy().hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_xy(other)
    }
}

impl From<(i64, i64)> for Point {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i64; 2]> for Point {
    #[inline]
    fn from([x, y]: [i64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.z == 0 {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "({}, {}, {})", self.x, self.y, self.z)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
