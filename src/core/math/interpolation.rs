use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Signed edge function: twice the signed area of triangle (a, b, p).
///
/// In screen space (+Y down) the value is positive when `p` lies to the right
/// of the directed edge `a -> b`, so triangles wound clockwise as seen by the
/// camera yield three non-negative values for interior points.
#[inline(always)]
pub fn edge_function(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>) -> f32 {
    let edge = b - a;
    let to_point = p - a;
    edge.x * to_point.y - edge.y * to_point.x
}

/// Tests `p` against the three edges of triangle (v0, v1, v2) and returns the
/// barycentric weights (w0, w1, w2) if the point is inside.
///
/// Each edge is rejected as soon as its signed area is negative. The weights are
/// the three signed areas normalized by their sum, so they always add up to 1.
/// Degenerate (zero-area) triangles return `None`.
///
/// # Returns
/// A Vector3 where:
/// - x: weight for v0 (area opposite v0, edge v1 -> v2)
/// - y: weight for v1 (edge v2 -> v0)
/// - z: weight for v2 (edge v0 -> v1)
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
) -> Option<Vector3<f32>> {
    let w2 = edge_function(v0, v1, p);
    if w2 < 0.0 {
        return None;
    }
    let w0 = edge_function(v1, v2, p);
    if w0 < 0.0 {
        return None;
    }
    let w1 = edge_function(v2, v0, p);
    if w1 < 0.0 {
        return None;
    }

    let total_area = w0 + w1 + w2;
    if total_area < EPSILON {
        return None; // Degenerate triangle
    }

    let inv_total_area = 1.0 / total_area;
    Some(Vector3::new(
        w0 * inv_total_area,
        w1 * inv_total_area,
        w2 * inv_total_area,
    ))
}

/// Interpolates depth the way the depth buffer expects it:
/// `1 / (w0 / z0 + w1 / z1 + w2 / z2)` with the screen-space (NDC) z values.
#[inline]
pub fn interpolate_depth(bary: Vector3<f32>, z: [f32; 3]) -> f32 {
    // z == 0 sits exactly on the near plane; keep the reciprocal finite.
    let inv = bary.x / z[0].max(f32::EPSILON)
        + bary.y / z[1].max(f32::EPSILON)
        + bary.z / z[2].max(f32::EPSILON);
    1.0 / inv
}

/// Compute perspective-correct barycentric coordinates (alpha', beta', gamma').
///
/// The corrected barycentrics are defined as:
///   wa = alpha * (1/w1), wb = beta * (1/w2), wc = gamma * (1/w3)
///   sum = wa + wb + wc
///   alpha' = wa / sum, ...
///
/// Weighting an attribute with these is the same as interpolating `attr / w`
/// and `1 / w` separately and dividing.
///
/// Returns `None` when a vertex `w` is not positive or the sum vanishes.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    if w1 <= EPSILON || w2 <= EPSILON || w3 <= EPSILON {
        return None;
    }

    let wa = bary.x / w1;
    let wb = bary.y / w2;
    let wc = bary.z / w3;

    let sum = wa + wb + wc;
    if sum.abs() < EPSILON {
        return None;
    }
    let inv_sum = 1.0 / sum;
    Some(Vector3::new(wa * inv_sum, wb * inv_sum, wc * inv_sum))
}

/// The interpolated clip-space w: `1 / (w0 / w_0 + w1 / w_1 + w2 / w_2)`.
#[inline]
pub fn interpolate_w(bary: Vector3<f32>, w: [f32; 3]) -> f32 {
    1.0 / (bary.x / w[0] + bary.y / w[1] + bary.z / w[2])
}
