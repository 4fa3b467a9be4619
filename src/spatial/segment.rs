//! Segment predicates on the horizontal plane: shared endpoints, crossings,
//! collinear overlap
//!
//! All functions take points already projected onto (x, z). Degenerate
//! (zero-length) segments never intersect or overlap anything.

use glam::Vec2;

/// Cross product magnitude under which two directions count as parallel
pub const PARALLEL_EPSILON: f32 = 1e-4;

/// Perpendicular distance under which a point lies on a line
pub const COLLINEAR_EPSILON: f32 = 0.01;

/// Endpoint tolerance used by `intersects_2d` to skip touching segments
pub const TOUCH_TOLERANCE: f32 = 0.01;

/// Squared length below which a segment is treated as a point
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Tunable thresholds for the predicates below
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTolerances {
    pub touch: f32,
    pub parallel: f32,
    pub collinear: f32,
}

impl Default for SegmentTolerances {
    fn default() -> Self {
        Self {
            touch: TOUCH_TOLERANCE,
            parallel: PARALLEL_EPSILON,
            collinear: COLLINEAR_EPSILON,
        }
    }
}

/// True if any endpoint of A lies within `tolerance` of any endpoint of B
pub fn shares_endpoint(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, tolerance: f32) -> bool {
    [a1, a2]
        .iter()
        .any(|a| [b1, b2].iter().any(|b| a.distance(*b) <= tolerance))
}

/// Check whether two segments cross
///
/// Segments that share an endpoint touch but do not cross. Parallel
/// segments never cross; their overlap is `collinear_overlap`'s business.
pub fn intersects_2d(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    intersects_2d_with(a1, a2, b1, b2, &SegmentTolerances::default())
}

pub fn intersects_2d_with(
    a1: Vec2,
    a2: Vec2,
    b1: Vec2,
    b2: Vec2,
    tol: &SegmentTolerances,
) -> bool {
    if shares_endpoint(a1, a2, b1, b2, tol.touch) {
        return false;
    }

    let da = a2 - a1;
    let db = b2 - b1;
    if is_degenerate(da) || is_degenerate(db) {
        return false;
    }

    if da.perp_dot(db).abs() < tol.parallel {
        return false;
    }

    ccw(a1, b1, b2) != ccw(a2, b1, b2) && ccw(a1, a2, b1) != ccw(a1, a2, b2)
}

/// Check whether two segments lie on one line and share more than
/// `min_overlap` of their length
pub fn collinear_overlap(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, min_overlap: f32) -> bool {
    collinear_overlap_with(a1, a2, b1, b2, min_overlap, &SegmentTolerances::default())
}

pub fn collinear_overlap_with(
    a1: Vec2,
    a2: Vec2,
    b1: Vec2,
    b2: Vec2,
    min_overlap: f32,
    tol: &SegmentTolerances,
) -> bool {
    overlap_length(a1, a2, b1, b2, tol).is_some_and(|overlap| overlap > min_overlap)
}

/// Length of the shared stretch of two collinear segments
///
/// None when the segments share an endpoint, are degenerate, or do not lie
/// on the same line.
pub fn overlap_length(
    a1: Vec2,
    a2: Vec2,
    b1: Vec2,
    b2: Vec2,
    tol: &SegmentTolerances,
) -> Option<f32> {
    if shares_endpoint(a1, a2, b1, b2, tol.touch) {
        return None;
    }
    shared_run(a1, a2, b1, b2, tol.collinear)
}

/// Length two segments run along the same line, whether or not they meet
/// at an endpoint
///
/// A wall continuing straight on from another shares a run of zero; one
/// folding back over it shares the folded length.
pub fn shared_run(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2, collinear: f32) -> Option<f32> {
    let da = a2 - a1;
    if is_degenerate(da) || is_degenerate(b2 - b1) {
        return None;
    }

    let dir = da.normalize();
    let normal = dir.perp();

    // Both of B's endpoints must sit on A's line
    if normal.dot(b1 - a1).abs() > collinear || normal.dot(b2 - a1).abs() > collinear {
        return None;
    }

    let a_len = da.length();
    let t1 = dir.dot(b1 - a1);
    let t2 = dir.dot(b2 - a1);
    let (b_min, b_max) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

    let overlap = b_max.min(a_len) - b_min.max(0.0);
    Some(overlap.max(0.0))
}

/// Shortest distance from a point to a segment
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Strict counter-clockwise orientation of the triple (a, b, c)
fn ccw(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

fn is_degenerate(d: Vec2) -> bool {
    d.length_squared() < DEGENERATE_LENGTH_SQ
}
