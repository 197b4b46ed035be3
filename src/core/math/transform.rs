use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

/// Below this magnitude a clip-space `w` is treated as zero.
pub const W_EPSILON: f32 = 1e-6;

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by both pipelines.
///
/// The coordinate system is left-handed: +X right, +Y up, +Z forward (into the
/// screen). Matrices follow nalgebra's column-vector convention (`M * v`), so a
/// world transform written `scale * rotation * translation` in row-vector
/// notation is built here as `translation * rotation * scale`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    /// A positive angle turns +Z towards +X.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Euler rotation: pitch about X, then yaw about Y, then roll about Z.
    pub fn rotation(pitch: f32, yaw: f32, roll: f32) -> Matrix4<f32> {
        Self::rotation_z(roll) * Self::rotation_y(yaw) * Self::rotation_x(pitch)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Creates a uniform scaling matrix.
    pub fn scaling(scale: f32) -> Matrix4<f32> {
        Self::scaling_nonuniform(&Vector3::repeat(scale))
    }

    /// Orthonormal basis matrix (camera/object to world).
    /// Columns are right, up, forward and the origin.
    pub fn onb(
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
        origin: &Point3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// Left-handed perspective projection.
    ///
    /// `fov` is the already-derived `tan(fov_angle / 2)`. View-space z is mapped
    /// into [0, 1] via `A = far / (far - near)` and `B = -(far * near) / (far - near)`,
    /// and the clip-space w carries the original view-space z.
    pub fn perspective(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let a = far / (far - near);
        let b = -(far * near) / (far - near);

        Matrix4::new(
            1.0 / (aspect_ratio * fov), 0.0,       0.0, 0.0,
            0.0,                        1.0 / fov, 0.0, 0.0,
            0.0,                        0.0,       a,   b,
            0.0,                        0.0,       1.0, 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
///
/// Returns `None` when `w` is (nearly) zero or negative, i.e. the vertex lies on
/// or behind the eye plane and has no meaningful NDC position.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Option<Point3<f32>> {
    let w = clip.w;
    if w > W_EPSILON {
        Some(Point3::new(clip.x / w, clip.y / w, clip.z / w))
    } else {
        None
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    )
}
