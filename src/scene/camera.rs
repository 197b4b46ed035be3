use crate::core::math::transform::TransformFactory;
use crate::ui::input::CameraInput;
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Pitch limit in degrees; keeps forward away from world up.
const MAX_PITCH_DEG: f32 = 89.0;

/// A free-flying perspective camera shared by the rasterizer and the ray tracer.
///
/// The basis (right, up) is re-derived from `forward` and world up every time the
/// matrices are rebuilt; only `origin`, `pitch` and `yaw` are persistent state.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,

    /// Vertical field of view in degrees.
    pub fov_angle: f32,
    /// Derived `tan(fov_angle / 2)`.
    fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    /// Accumulated rotation in radians. Positive pitch looks up.
    pub pitch: f32,
    pub yaw: f32,

    // --- Movement ---
    pub movement_speed: f32,
    pub boost_multiplier: f32,
    /// Degrees per pixel of mouse movement.
    pub rotation_speed: f32,

    // --- Cached Matrices ---
    camera_to_world: Matrix4<f32>,
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        let mut cam = Self {
            origin: Point3::origin(),
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            fov_angle: 90.0,
            fov: 1.0,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 100.0,
            pitch: 0.0,
            yaw: 0.0,
            movement_speed: 12.0,
            boost_multiplier: 4.0,
            rotation_speed: 0.6,
            camera_to_world: Matrix4::identity(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }
}

impl Camera {
    pub fn new(aspect_ratio: f32, fov_angle_deg: f32, origin: Point3<f32>) -> Self {
        let mut cam = Self::default();
        cam.initialize(aspect_ratio, fov_angle_deg, origin);
        cam
    }

    /// Resets position and lens; orientation returns to looking down +Z.
    pub fn initialize(&mut self, aspect_ratio: f32, fov_angle_deg: f32, origin: Point3<f32>) {
        self.origin = origin;
        self.aspect_ratio = aspect_ratio;
        self.fov_angle = fov_angle_deg;
        self.fov = (fov_angle_deg.to_radians() / 2.0).tan();
        self.pitch = 0.0;
        self.yaw = 0.0;
        self.update_forward();
        self.update_matrices();
    }

    pub fn set_fov(&mut self, fov_angle_deg: f32) {
        self.fov_angle = fov_angle_deg;
        self.fov = (fov_angle_deg.to_radians() / 2.0).tan();
        self.update_projection();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_projection();
    }

    /// `tan(fov_angle / 2)`.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Applies one frame of keyboard and mouse input.
    ///
    /// Translation is scaled by `movement_speed * boost * dt`. Left drag moves
    /// along forward and turns; left+right drag moves along up and does not
    /// rotate this frame; right drag alone turns and tilts.
    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        let boost = if input.boost { self.boost_multiplier } else { 1.0 };
        let step = self.movement_speed * boost * dt;
        let (dx, dy) = input.mouse_delta;

        let mut offset = Vector3::zeros();
        if input.forward {
            offset += self.forward;
        }
        if input.backward {
            offset -= self.forward;
        }
        if input.right {
            offset += self.right;
        }
        if input.left {
            offset -= self.right;
        }

        let mut can_rotate = true;
        match (input.left_button, input.right_button) {
            (true, true) => {
                offset += self.up * -dy;
                can_rotate = false;
            }
            (true, false) => offset += self.forward * -dy,
            _ => {}
        }
        self.origin += offset * step;

        if can_rotate {
            let rotation_step = self.rotation_speed.to_radians();
            if input.left_button {
                self.yaw += dx * rotation_step;
            }
            if input.right_button && !input.left_button {
                self.yaw += dx * rotation_step;
                self.pitch -= dy * rotation_step;
            }
            let limit = MAX_PITCH_DEG.to_radians();
            self.pitch = self.pitch.clamp(-limit, limit);
            self.update_forward();
        }

        self.update_matrices();
    }

    fn update_forward(&mut self) {
        let rotation = TransformFactory::rotation(-self.pitch, self.yaw, 0.0);
        self.forward = (rotation * Vector4::z()).xyz().normalize();
    }

    /// Recalculates the basis and the View matrix, then the projection.
    pub fn update_matrices(&mut self) {
        let world_up = Vector3::y();
        self.right = world_up
            .cross(&self.forward)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::x);
        self.up = self.forward.cross(&self.right).normalize();

        self.camera_to_world =
            TransformFactory::onb(&self.right, &self.up, &self.forward, &self.origin);
        self.view_matrix = self
            .camera_to_world
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection_matrix =
            TransformFactory::perspective(self.fov, self.aspect_ratio, self.near, self.far);
    }

    /// The camera's ONB in world space; transforms camera-space ray directions.
    pub fn camera_to_world(&self) -> Matrix4<f32> {
        self.camera_to_world
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn fov_is_tangent_of_half_angle() {
        let cam = Camera::new(1.0, 90.0, Point3::origin());
        assert!((cam.fov() - 1.0).abs() < EPS);
        let cam = Camera::new(1.0, 60.0, Point3::origin());
        assert!((cam.fov() - (30.0_f32).to_radians().tan()).abs() < EPS);
    }

    #[test]
    fn view_matrix_moves_point_in_front_onto_positive_z() {
        let cam = Camera::new(16.0 / 9.0, 45.0, Point3::new(0.0, 3.0, -9.0));
        let p = cam.view_matrix().transform_point(&Point3::new(0.0, 3.0, 1.0));
        assert!(p.x.abs() < EPS && p.y.abs() < EPS);
        assert!((p.z - 10.0).abs() < EPS);
    }

    #[test]
    fn basis_is_orthonormal_after_rotation() {
        let mut cam = Camera::new(1.0, 60.0, Point3::origin());
        let input = CameraInput {
            right_button: true,
            mouse_delta: (35.0, -20.0),
            ..Default::default()
        };
        cam.update(0.016, &input);

        assert!((cam.forward.norm() - 1.0).abs() < EPS);
        assert!(cam.forward.dot(&cam.right).abs() < EPS);
        assert!(cam.forward.dot(&cam.up).abs() < EPS);
        assert!(cam.right.dot(&cam.up).abs() < EPS);
        // Mouse moved up: camera looks up.
        assert!(cam.forward.y > 0.0);
    }

    #[test]
    fn pitch_is_clamped_and_basis_stays_finite() {
        let mut cam = Camera::new(1.0, 60.0, Point3::origin());
        let input = CameraInput {
            right_button: true,
            mouse_delta: (0.0, -10_000.0),
            ..Default::default()
        };
        cam.update(0.016, &input);

        assert!(cam.pitch <= MAX_PITCH_DEG.to_radians() + EPS);
        assert!(cam.right.iter().all(|c| c.is_finite()));
        assert!(cam.forward.y < 1.0);
    }

    #[test]
    fn wasd_moves_along_forward_with_boost() {
        let mut cam = Camera::new(1.0, 60.0, Point3::origin());
        let input = CameraInput {
            forward: true,
            boost: true,
            ..Default::default()
        };
        cam.update(0.5, &input);
        // 12 * 4 * 0.5
        assert!((cam.origin.z - 24.0).abs() < EPS);
    }

    #[test]
    fn both_buttons_move_up_without_rotating() {
        let mut cam = Camera::new(1.0, 60.0, Point3::origin());
        let input = CameraInput {
            left_button: true,
            right_button: true,
            mouse_delta: (50.0, -1.0),
            ..Default::default()
        };
        cam.update(1.0, &input);
        assert_eq!(cam.yaw, 0.0);
        assert!((cam.origin.y - 12.0).abs() < EPS);
    }

    #[test]
    fn aspect_ratio_rescales_projection_x() {
        let mut cam = Camera::new(1.0, 90.0, Point3::origin());
        let square = cam.projection_matrix()[(0, 0)];
        cam.set_aspect_ratio(2.0);
        assert!((cam.projection_matrix()[(0, 0)] - square * 0.5).abs() < EPS);
        assert_eq!(cam.projection_matrix()[(1, 1)], square);
    }
}
