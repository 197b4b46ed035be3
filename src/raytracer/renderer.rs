use crate::core::color::{BLACK, to_output};
use crate::raytracer::hit::HitRecord;
use crate::raytracer::ray::Ray;
use crate::raytracer::scene::Scene;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};
use rayon::prelude::*;
use serde::Deserialize;

/// Offset along the normal for shadow ray origins.
const SHADOW_BIAS: f32 = 0.001;

/// Which factors of the direct-lighting equation are accumulated per light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingMode {
    /// Lambert cosine term only.
    ObservedArea,
    /// Incident radiance only.
    Radiance,
    /// Material BRDF only.
    Brdf,
    /// radiance * BRDF * cosine
    #[default]
    Combined,
}

impl LightingMode {
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }

    /// Modes that show a factor on its own skip the facing-away test.
    fn gates_on_cosine(self) -> bool {
        !matches!(self, LightingMode::Radiance | LightingMode::Brdf)
    }
}

/// Renders a `Scene` one primary ray per pixel, rows in parallel.
pub struct RayTracer {
    pub width: usize,
    pub height: usize,
    pub lighting_mode: LightingMode,
    pub shadows_enabled: bool,
    buffer: Vec<u32>,
}

impl RayTracer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lighting_mode: LightingMode::Combined,
            shadows_enabled: true,
            buffer: vec![0; width * height],
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Packed 0RGB pixels of the last frame, row-major.
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn cycle_lighting_mode(&mut self) {
        self.lighting_mode = self.lighting_mode.next();
        debug!("Lighting mode: {:?}", self.lighting_mode);
    }

    pub fn toggle_shadows(&mut self) {
        self.shadows_enabled = !self.shadows_enabled;
        debug!("Shadows: {}", self.shadows_enabled);
    }

    fn context<'a>(&self, scene: &'a Scene) -> PixelContext<'a> {
        PixelContext {
            scene,
            camera_to_world: scene.camera.camera_to_world(),
            origin: scene.camera.origin,
            fov: scene.camera.fov(),
            aspect_ratio: self.aspect_ratio(),
            width: self.width as f32,
            height: self.height as f32,
            lighting_mode: self.lighting_mode,
            shadows_enabled: self.shadows_enabled,
        }
    }

    pub fn render(&mut self, scene: &Scene) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let ctx = self.context(scene);

        self.buffer
            .par_chunks_mut(self.width)
            .enumerate()
            .for_each(|(py, row)| {
                for (px, pixel) in row.iter_mut().enumerate() {
                    let ray = ctx.primary_ray(px, py);
                    *pixel = to_output(ctx.trace(&ray));
                }
            });
    }

    /// Color of a single pixel, before packing.
    pub fn render_pixel(&self, scene: &Scene, px: usize, py: usize) -> Vector3<f32> {
        let ctx = self.context(scene);
        ctx.trace(&ctx.primary_ray(px, py))
    }

    /// Direct lighting at the first hit of `ray`, black on a miss.
    pub fn shade(&self, scene: &Scene, ray: &Ray) -> Vector3<f32> {
        self.context(scene).trace(ray)
    }
}

/// Read-only state shared by every pixel of one frame.
struct PixelContext<'a> {
    scene: &'a Scene,
    camera_to_world: Matrix4<f32>,
    origin: Point3<f32>,
    fov: f32,
    aspect_ratio: f32,
    width: f32,
    height: f32,
    lighting_mode: LightingMode,
    shadows_enabled: bool,
}

impl PixelContext<'_> {
    fn primary_ray(&self, px: usize, py: usize) -> Ray {
        let x = (2.0 * (px as f32 + 0.5) / self.width - 1.0) * self.aspect_ratio * self.fov;
        let y = (1.0 - 2.0 * (py as f32 + 0.5) / self.height) * self.fov;
        let direction = self.camera_to_world.transform_vector(&Vector3::new(x, y, 1.0));
        Ray::new(self.origin, direction)
    }

    fn trace(&self, ray: &Ray) -> Vector3<f32> {
        let mut closest = HitRecord::default();
        self.scene.closest_hit(ray, &mut closest);
        if !closest.did_hit {
            return BLACK;
        }

        let material = self.scene.material(closest.material_index);
        let mut color = BLACK;

        for light in &self.scene.lights {
            let to_light = light.direction_to_light(&closest.origin);

            let observed_area = closest.normal.dot(&to_light);
            if observed_area < 0.0 && self.lighting_mode.gates_on_cosine() {
                continue;
            }

            if self.shadows_enabled {
                let shadow_origin = closest.origin + closest.normal * SHADOW_BIAS;
                let shadow_ray = Ray::new(shadow_origin, light.vector_to_light(&shadow_origin))
                    .with_max(light.distance(&shadow_origin));
                if self.scene.does_hit(&shadow_ray) {
                    continue;
                }
            }

            let brdf = || material.shade(&closest, &to_light, &ray.direction);
            let radiance = || light.radiance(&closest.origin);

            color += match self.lighting_mode {
                LightingMode::ObservedArea => Vector3::repeat(observed_area),
                LightingMode::Radiance => radiance(),
                LightingMode::Brdf => brdf(),
                LightingMode::Combined => radiance().component_mul(&brdf()) * observed_area,
            };
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::material::Material;
    use crate::scene::camera::Camera;

    fn lit_floor() -> Scene {
        let mut scene = Scene::new(Camera::new(1.0, 90.0, Point3::new(0.0, 1.0, -1.0)));
        let white = scene.add_material(Material::Lambert {
            color: Vector3::repeat(1.0),
            kd: 1.0,
        });
        scene.add_plane(Point3::origin(), Vector3::y(), white);
        scene.add_point_light(Point3::new(0.0, 2.0, 0.0), 4.0, Vector3::repeat(1.0));
        scene
    }

    #[test]
    fn mode_cycle_wraps() {
        let mut tracer = RayTracer::new(1, 1);
        for _ in 0..4 {
            tracer.cycle_lighting_mode();
        }
        assert_eq!(tracer.lighting_mode, LightingMode::Combined);
    }

    #[test]
    fn miss_is_black() {
        let scene = Scene::new(Camera::default());
        let tracer = RayTracer::new(4, 4);
        let ray = Ray::new(Point3::origin(), Vector3::z());
        assert_eq!(tracer.shade(&scene, &ray), BLACK);
    }

    #[test]
    fn combined_is_radiance_times_brdf_times_cosine() {
        let scene = lit_floor();
        let tracer = RayTracer::new(4, 4);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vector3::y());
        let c = tracer.shade(&scene, &ray);
        // radiance 4 / 2^2 = 1, brdf 1 / pi, cosine 1
        assert!((c.x - std::f32::consts::FRAC_1_PI).abs() < 1e-4);
    }

    #[test]
    fn radiance_mode_skips_cosine_gate() {
        let mut scene = lit_floor();
        // Light below the floor: faces away from it.
        scene.lights.clear();
        scene.add_point_light(Point3::new(0.0, -2.0, 0.0), 4.0, Vector3::repeat(1.0));
        let mut tracer = RayTracer::new(4, 4);
        tracer.shadows_enabled = false;
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vector3::y());

        assert_eq!(tracer.shade(&scene, &ray), BLACK);
        tracer.lighting_mode = LightingMode::Radiance;
        assert!((tracer.shade(&scene, &ray).x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn render_fills_every_pixel() {
        let scene = Scene::reference(1.0);
        let mut tracer = RayTracer::new(16, 16);
        tracer.render(&scene);
        assert_eq!(tracer.buffer().len(), 256);
        assert!(tracer.buffer().iter().any(|&p| p != 0));
    }

    #[test]
    fn center_pixel_ray_follows_camera_forward() {
        let scene = Scene::reference(1.0);
        let tracer = RayTracer::new(15, 15);
        let ctx = tracer.context(&scene);
        let ray = ctx.primary_ray(7, 7);
        assert!((ray.direction - scene.camera.forward).norm() < 1e-5);
    }

    #[test]
    fn render_pixel_matches_packed_buffer() {
        let scene = Scene::reference(1.0);
        let mut tracer = RayTracer::new(8, 8);
        tracer.render(&scene);
        let color = tracer.render_pixel(&scene, 3, 5);
        assert_eq!(tracer.buffer()[5 * 8 + 3], to_output(color));
    }

    #[test]
    fn toggling_shadows_flips_flag() {
        let mut tracer = RayTracer::new(1, 1);
        assert!(tracer.shadows_enabled);
        tracer.toggle_shadows();
        assert!(!tracer.shadows_enabled);
    }
}
