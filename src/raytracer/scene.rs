use crate::raytracer::geometry::{CullMode, Plane, Sphere, Triangle, TriangleMesh};
use crate::raytracer::hit::{HitRecord, Hittable, RayKind};
use crate::raytracer::material::Material;
use crate::raytracer::ray::Ray;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use log::info;
use nalgebra::{Point3, Vector3};

/// Everything the ray tracer sees: primitives, lights, materials and the camera.
///
/// Material index 0 is always present (solid red) so a primitive with an
/// unassigned material still renders.
pub struct Scene {
    pub camera: Camera,
    pub spheres: Vec<Sphere>,
    pub planes: Vec<Plane>,
    pub meshes: Vec<TriangleMesh>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,

    // --- Animation ---
    pub rotate: bool,
    /// Radians per second about each mesh's Y axis.
    pub rotation_speed: f32,
    elapsed: f32,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            spheres: Vec::new(),
            planes: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            materials: vec![Material::SolidColor {
                color: Vector3::new(1.0, 0.0, 0.0),
            }],
            rotate: true,
            rotation_speed: 1.0,
            elapsed: 0.0,
        }
    }

    // --- Building ---

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_sphere(&mut self, origin: Point3<f32>, radius: f32, material_index: usize) {
        self.spheres.push(Sphere {
            origin,
            radius,
            material_index,
        });
    }

    pub fn add_plane(&mut self, origin: Point3<f32>, normal: Vector3<f32>, material_index: usize) {
        self.planes.push(Plane {
            origin,
            normal: normal.normalize(),
            material_index,
        });
    }

    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_point_light(&mut self, position: Point3<f32>, intensity: f32, color: Vector3<f32>) {
        self.lights.push(Light::new_point(position, color, intensity));
    }

    pub fn add_directional_light(
        &mut self,
        direction: Vector3<f32>,
        intensity: f32,
        color: Vector3<f32>,
    ) {
        self.lights
            .push(Light::new_directional(direction, color, intensity));
    }

    pub fn material(&self, index: usize) -> &Material {
        self.materials.get(index).unwrap_or(&self.materials[0])
    }

    // --- Queries ---

    /// Finds the closest intersection over every primitive; `rec.t` acts as the
    /// running minimum.
    pub fn closest_hit(&self, ray: &Ray, rec: &mut HitRecord) {
        for sphere in &self.spheres {
            sphere.hit(ray, RayKind::Primary, rec);
        }
        for plane in &self.planes {
            plane.hit(ray, RayKind::Primary, rec);
        }
        for mesh in &self.meshes {
            mesh.hit(ray, RayKind::Primary, rec);
        }
    }

    /// True if anything blocks the ray within its range.
    pub fn does_hit(&self, ray: &Ray) -> bool {
        self.spheres.iter().any(|s| s.does_hit(ray))
            || self.planes.iter().any(|p| p.does_hit(ray))
            || self.meshes.iter().any(|m| m.does_hit(ray))
    }

    /// Advances animation: meshes spin about their own Y axis.
    pub fn update(&mut self, dt: f32) {
        if !self.rotate {
            return;
        }
        self.elapsed += dt;
        let angle = self.elapsed * self.rotation_speed;
        for mesh in &mut self.meshes {
            mesh.rotate_y(angle);
            mesh.update_transforms();
        }
    }

    /// The reference scene: a box of five planes, two rows of Cook-Torrance
    /// spheres (metal below, plastic above), three triangles with Back, Front
    /// and no culling, and three colored point lights.
    pub fn reference(aspect_ratio: f32) -> Self {
        let camera = Camera::new(aspect_ratio, 45.0, Point3::new(0.0, 3.0, -9.0));
        let mut scene = Self::new(camera);

        let silver = Vector3::new(0.972, 0.960, 0.915);
        let gray = Vector3::new(0.75, 0.75, 0.75);
        let metal = |roughness| Material::CookTorrance {
            albedo: silver,
            metalness: 1.0,
            roughness,
        };
        let plastic = |roughness| Material::CookTorrance {
            albedo: gray,
            metalness: 0.0,
            roughness,
        };

        let rough_metal = scene.add_material(metal(1.0));
        let medium_metal = scene.add_material(metal(0.6));
        let smooth_metal = scene.add_material(metal(0.1));
        let rough_plastic = scene.add_material(plastic(1.0));
        let medium_plastic = scene.add_material(plastic(0.6));
        let smooth_plastic = scene.add_material(plastic(0.1));

        let gray_blue = scene.add_material(Material::Lambert {
            color: Vector3::new(0.49, 0.57, 0.57),
            kd: 1.0,
        });
        let white = scene.add_material(Material::Lambert {
            color: Vector3::repeat(1.0),
            kd: 1.0,
        });

        // Planes
        scene.add_plane(Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0), gray_blue); // Back
        scene.add_plane(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0), gray_blue); // Bottom
        scene.add_plane(Point3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0), gray_blue); // Top
        scene.add_plane(Point3::new(5.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0), gray_blue); // Right
        scene.add_plane(Point3::new(-5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), gray_blue); // Left

        // Spheres
        let columns = [-1.75, 0.0, 1.75];
        for (x, material) in columns.iter().zip([rough_metal, medium_metal, smooth_metal]) {
            scene.add_sphere(Point3::new(*x, 1.0, 0.0), 0.75, material);
        }
        for (x, material) in columns.iter().zip([rough_plastic, medium_plastic, smooth_plastic]) {
            scene.add_sphere(Point3::new(*x, 3.0, 0.0), 0.75, material);
        }

        // Triangles
        let base = Triangle::new(
            Point3::new(-0.75, 1.5, 0.0),
            Point3::new(0.75, 0.0, 0.0),
            Point3::new(-0.75, 0.0, 0.0),
        );
        for (x, cull_mode) in columns.iter().zip([CullMode::Back, CullMode::Front, CullMode::None]) {
            let mut mesh = TriangleMesh::empty(cull_mode, white);
            mesh.append_triangle(&base, true);
            mesh.translate(&Vector3::new(*x, 4.5, 0.0));
            mesh.update_aabb();
            mesh.update_transforms();
            scene.add_mesh(mesh);
        }

        // Lights
        scene.add_point_light(Point3::new(0.0, 5.0, 5.0), 50.0, Vector3::new(1.0, 0.61, 0.45)); // Backlight
        scene.add_point_light(Point3::new(-2.5, 5.0, -5.0), 70.0, Vector3::new(1.0, 0.8, 0.45)); // Front left
        scene.add_point_light(Point3::new(2.5, 2.5, -5.0), 50.0, Vector3::new(0.34, 0.47, 0.68));

        info!(
            "Reference scene: {} spheres, {} planes, {} meshes, {} lights",
            scene.spheres.len(),
            scene.planes.len(),
            scene.meshes.len(),
            scene.lights.len()
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scene_contents() {
        let scene = Scene::reference(16.0 / 9.0);
        assert_eq!(scene.planes.len(), 5);
        assert_eq!(scene.spheres.len(), 6);
        assert_eq!(scene.meshes.len(), 3);
        assert_eq!(scene.lights.len(), 3);
        for s in &scene.spheres {
            assert!(matches!(scene.material(s.material_index), Material::CookTorrance { .. }));
        }
    }

    #[test]
    fn closest_hit_picks_nearest_primitive() {
        let scene = Scene::reference(1.0);
        // Straight down onto the front-middle metal sphere (top at y = 1.75).
        let ray = Ray::new(Point3::new(0.0, 2.2, 0.0), -Vector3::y());
        let mut rec = HitRecord::default();
        scene.closest_hit(&ray, &mut rec);
        assert!(rec.did_hit);
        assert!((rec.t - 0.45).abs() < 1e-4);
        assert!((rec.normal - Vector3::y()).norm() < 1e-4);
    }

    #[test]
    fn missing_material_falls_back_to_default() {
        let scene = Scene::new(Camera::default());
        assert_eq!(scene.material(42), &scene.materials[0]);
    }

    #[test]
    fn update_respects_rotation_toggle() {
        let mut scene = Scene::reference(1.0);
        let before = scene.meshes[0].transformed_aabb();
        scene.rotate = false;
        scene.update(0.5);
        assert_eq!(scene.meshes[0].transformed_aabb(), before);

        scene.rotate = true;
        scene.update(0.5);
        assert_ne!(scene.meshes[0].transformed_aabb(), before);
    }

    #[test]
    fn directional_light_is_normalized_and_unattenuated() {
        let mut scene = Scene::new(Camera::default());
        scene.add_directional_light(Vector3::new(0.0, -2.0, 0.0), 3.0, Vector3::repeat(1.0));
        let p = Point3::new(10.0, 0.0, 10.0);
        let light = &scene.lights[0];
        assert!((light.direction_to_light(&p) - Vector3::y()).norm() < 1e-6);
        assert_eq!(light.radiance(&p), Vector3::repeat(3.0));
        assert!(light.distance(&p).is_infinite());
    }
}
