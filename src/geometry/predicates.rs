//! Geometric predicates on integer points.
//!
//! Orientation, collinearity and segment crossing are evaluated exactly:
//! coordinates are `i64` and every intermediate product is widened to `i128`,
//! so there is no tolerance and no perturbation. Angles are the only quantity
//! computed in floating point.

use std::fmt;

use crate::geometry::point::Point;

/// Represents the orientation of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Clockwise turn (signed area < 0).
    NEGATIVE,
    /// The three points are collinear (signed area = 0).
    DEGENERATE,
    /// Counter-clockwise turn (signed area > 0).
    POSITIVE,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive for a counter-clockwise triple, negative for clockwise, zero when
/// the points are collinear.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::geometry::point::Point;
/// use sweepmesh::geometry::predicates::signed_area2;
///
/// let a = Point::new(0, 0);
/// let b = Point::new(4, 0);
/// let c = Point::new(0, 3);
/// assert_eq!(signed_area2(&a, &b, &c), 12);
/// assert_eq!(signed_area2(&a, &c, &b), -12);
/// ```
#[must_use]
pub fn signed_area2(a: &Point, b: &Point, c: &Point) -> i128 {
    let (ax, ay) = (i128::from(a.x()), i128::from(a.y()));
    let (bx, by) = (i128::from(b.x()), i128::from(b.y()));
    let (cx, cy) = (i128::from(c.x()), i128::from(c.y()));
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

/// Orientation of the ordered triple `(a, b, c)`.
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    match signed_area2(a, b, c).signum() {
        1 => Orientation::POSITIVE,
        -1 => Orientation::NEGATIVE,
        _ => Orientation::DEGENERATE,
    }
}

/// Returns `true` when the three points lie on one line.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::geometry::point::Point;
/// use sweepmesh::geometry::predicates::is_collinear;
///
/// assert!(is_collinear(&Point::new(0, 0), &Point::new(2, 2), &Point::new(-5, -5)));
/// assert!(!is_collinear(&Point::new(0, 0), &Point::new(2, 2), &Point::new(2, 3)));
/// ```
#[must_use]
pub fn is_collinear(a: &Point, b: &Point, c: &Point) -> bool {
    signed_area2(a, b, c) == 0
}

/// Returns `true` when segment `p` properly intersects segment `q`.
///
/// - Segments that share an endpoint never intersect.
/// - Non-collinear segments intersect only if each one strictly separates the
///   endpoints of the other, so an endpoint resting on the other segment's
///   interior (a T-junction) does not count.
/// - Collinear segments intersect only if they overlap over a positive length.
///
/// # Examples
///
/// ```rust
/// use sweepmesh::geometry::point::Point;
/// use sweepmesh::geometry::predicates::segments_intersect;
///
/// let cross = segments_intersect(
///     (&Point::new(0, 0), &Point::new(2, 2)),
///     (&Point::new(0, 2), &Point::new(2, 0)),
/// );
/// assert!(cross);
///
/// let shared_endpoint = segments_intersect(
///     (&Point::new(0, 0), &Point::new(2, 2)),
///     (&Point::new(2, 2), &Point::new(4, 0)),
/// );
/// assert!(!shared_endpoint);
/// ```
#[must_use]
pub fn segments_intersect(p: (&Point, &Point), q: (&Point, &Point)) -> bool {
    let (p0, p1) = p;
    let (q0, q1) = q;
    if p0 == q0 || p0 == q1 || p1 == q0 || p1 == q1 {
        return false;
    }

    let d1 = orientation(p0, p1, q0);
    let d2 = orientation(p0, p1, q1);
    if d1 == Orientation::DEGENERATE && d2 == Orientation::DEGENERATE {
        return collinear_overlap(p, q);
    }

    let d3 = orientation(q0, q1, p0);
    let d4 = orientation(q0, q1, p1);
    [d1, d2, d3, d4]
        .iter()
        .all(|&o| o != Orientation::DEGENERATE)
        && d1 != d2
        && d3 != d4
}

/// Open-interval overlap of two segments already known to be collinear.
fn collinear_overlap(p: (&Point, &Point), q: (&Point, &Point)) -> bool {
    // Project onto whichever axis the shared line is not perpendicular to.
    let project = |pt: &Point| {
        if p.0.x() == p.1.x() {
            pt.y()
        } else {
            pt.x()
        }
    };
    let (p_lo, p_hi) = min_max(project(p.0), project(p.1));
    let (q_lo, q_hi) = min_max(project(q.0), project(q.1));
    p_lo.max(q_lo) < p_hi.min(q_hi)
}

const fn min_max(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// The angle, in radians, between the rays `origin → a` and `origin → b`.
///
/// Computed in 3D, so the `z` coordinates of all three points take part.
/// The cosine is clamped to `[-1, 1]` before `acos`; a zero-length ray yields
/// an angle of `0`.
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use sweepmesh::geometry::point::Point;
/// use sweepmesh::geometry::predicates::angle_between;
///
/// let o = Point::new(0, 0);
/// let angle = angle_between(&o, &Point::new(3, 0), &Point::new(0, 7));
/// assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2);
/// ```
#[must_use]
pub fn angle_between(origin: &Point, a: &Point, b: &Point) -> f64 {
    let u = a.sub_vec3(origin);
    let v = b.sub_vec3(origin);
    let dot = u[2].mul_add(v[2], u[0].mul_add(v[0], u[1] * v[1]));
    let norm_u = u[2].mul_add(u[2], u[0].mul_add(u[0], u[1] * u[1])).sqrt();
    let norm_v = v[2].mul_add(v[2], v[0].mul_add(v[0], v[1] * v[1])).sqrt();
    let denom = norm_u * norm_v;
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn orientation_signs() {
        assert_eq!(orientation(&p(0, 0), &p(1, 0), &p(0, 1)), Orientation::POSITIVE);
        assert_eq!(orientation(&p(0, 0), &p(0, 1), &p(1, 0)), Orientation::NEGATIVE);
        assert_eq!(orientation(&p(0, 0), &p(1, 1), &p(3, 3)), Orientation::DEGENERATE);
        assert_eq!(Orientation::POSITIVE.to_string(), "POSITIVE");
    }

    #[test]
    fn orientation_is_exact_for_large_coordinates() {
        let big = 1_i64 << 40;
        let a = p(-big, -big);
        let b = p(big, big);
        let on_line = p(big - 1, big - 1);
        let off_line = p(big - 1, big);
        assert!(is_collinear(&a, &b, &on_line));
        assert_eq!(orientation(&a, &b, &off_line), Orientation::POSITIVE);
    }

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(
            (&p(0, 0), &p(4, 4)),
            (&p(0, 4), &p(4, 0))
        ));
        // vertical against horizontal
        assert!(segments_intersect(
            (&p(2, -1), &p(2, 3)),
            (&p(0, 1), &p(5, 1))
        ));
    }

    #[test]
    fn disjoint_and_touching_segments() {
        assert!(!segments_intersect(
            (&p(0, 0), &p(1, 1)),
            (&p(3, 0), &p(0, 3))
        ));
        // T-junction: q0 lies on the interior of p.
        assert!(!segments_intersect(
            (&p(0, 0), &p(4, 0)),
            (&p(2, 0), &p(2, 5))
        ));
        // shared endpoint
        assert!(!segments_intersect(
            (&p(0, 0), &p(4, 0)),
            (&p(4, 0), &p(0, 4))
        ));
    }

    #[test]
    fn collinear_segments_intersect_only_when_overlapping() {
        assert!(segments_intersect(
            (&p(0, 0), &p(4, 0)),
            (&p(2, 0), &p(6, 0))
        ));
        assert!(!segments_intersect(
            (&p(0, 0), &p(2, 0)),
            (&p(3, 0), &p(6, 0))
        ));
        assert!(segments_intersect(
            (&p(1, 0), &p(1, 5)),
            (&p(1, 4), &p(1, 2))
        ));
        assert!(!segments_intersect(
            (&p(1, 0), &p(1, 2)),
            (&p(1, 3), &p(1, 5))
        ));
    }

    #[test]
    fn angles() {
        let o = p(0, 0);
        assert_relative_eq!(angle_between(&o, &p(1, 0), &p(0, 1)), FRAC_PI_2);
        assert_relative_eq!(angle_between(&o, &p(1, 0), &p(1, 1)), FRAC_PI_4);
        assert_relative_eq!(angle_between(&o, &p(1, 0), &p(-3, 0)), PI);
        assert_relative_eq!(angle_between(&o, &p(2, 0), &p(5, 0)), 0.0);
        assert_relative_eq!(angle_between(&o, &o, &p(5, 0)), 0.0);
    }

    #[test]
    fn angles_see_height() {
        let o = p(0, 0);
        let flat = angle_between(&o, &p(1, 0), &p(0, 1));
        let lifted = angle_between(&o, &Point::new_3d(1, 0, 1), &Point::new_3d(0, 1, 1));
        assert!(lifted < flat);
        assert_relative_eq!(lifted, std::f64::consts::FRAC_PI_3, epsilon = 1e-12);
    }
}
