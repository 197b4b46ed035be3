use crate::core::math::transform::TransformFactory;
use crate::raytracer::hit::{HitRecord, Hittable, RayKind};
use crate::raytracer::ray::Ray;
use nalgebra::{Matrix4, Point3, Vector3};

const PARALLEL_EPSILON: f32 = 1e-6;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub origin: Point3<f32>,
    pub radius: f32,
    pub material_index: usize,
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, _kind: RayKind, rec: &mut HitRecord) -> bool {
        let l = ray.origin - self.origin;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&l);
        let c = l.dot(&l) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut t = (-b - sqrtd) / (2.0 * a);
        if !ray.in_range(t) {
            t = (-b + sqrtd) / (2.0 * a);
            if !ray.in_range(t) {
                return false;
            }
        }
        if t >= rec.t {
            return false;
        }

        let normal = (ray.at(t) - self.origin) / self.radius;
        rec.set(ray, t, normal, self.material_index);
        true
    }
}

/// An infinite plane through `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub origin: Point3<f32>,
    /// Unit normal
    pub normal: Vector3<f32>,
    pub material_index: usize,
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, _kind: RayKind, rec: &mut HitRecord) -> bool {
        let denom = ray.direction.dot(&self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.origin - ray.origin).dot(&self.normal) / denom;
        if t <= ray.min || t >= ray.max || t >= rec.t {
            return false;
        }

        rec.set(ray, t, self.normal, self.material_index);
        true
    }
}

/// Which face of a triangle primary rays ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    /// Ignore faces whose normal points away from the ray origin.
    Back,
    /// Ignore faces whose normal points towards the ray origin.
    Front,
}

impl CullMode {
    /// True if a ray with `dot(normal, direction) == facing` is culled.
    /// Shadow rays use the opposite convention from primary rays.
    fn culls(self, facing: f32, kind: RayKind) -> bool {
        let facing = match kind {
            RayKind::Primary => facing,
            RayKind::Shadow => -facing,
        };
        match self {
            CullMode::None => false,
            CullMode::Back => facing > 0.0,
            CullMode::Front => facing < 0.0,
        }
    }
}

/// A single triangle; `normal` follows the winding `v0 -> v1 -> v2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f32>,
    pub v1: Point3<f32>,
    pub v2: Point3<f32>,
    pub normal: Vector3<f32>,
    pub cull_mode: CullMode,
    pub material_index: usize,
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            v0,
            v1,
            v2,
            normal: face_normal(&v0, &v1, &v2),
            cull_mode: CullMode::None,
            material_index: 0,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, kind: RayKind, rec: &mut HitRecord) -> bool {
        hit_triangle(
            [&self.v0, &self.v1, &self.v2],
            &self.normal,
            self.cull_mode,
            self.material_index,
            ray,
            kind,
            rec,
        )
    }
}

fn face_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    let n = (v1 - v0).cross(&(v2 - v0));
    n.try_normalize(f32::EPSILON).unwrap_or(n)
}

fn hit_triangle(
    [v0, v1, v2]: [&Point3<f32>; 3],
    normal: &Vector3<f32>,
    cull_mode: CullMode,
    material_index: usize,
    ray: &Ray,
    kind: RayKind,
    rec: &mut HitRecord,
) -> bool {
    // 1. Plane intersection with cull filtering
    let facing = normal.dot(&ray.direction);
    if facing.abs() < PARALLEL_EPSILON || cull_mode.culls(facing, kind) {
        return false;
    }

    let t = (v0 - ray.origin).dot(normal) / facing;
    if !ray.in_range(t) || t >= rec.t {
        return false;
    }

    // 2. Inside test against each edge
    let p = ray.at(t);
    for (a, b) in [(v0, v1), (v1, v2), (v2, v0)] {
        if (b - a).cross(&(p - a)).dot(normal) < 0.0 {
            return false;
        }
    }

    rec.set(ray, t, *normal, material_index);
    true
}

/// Ray-AABB slab test; passes if the ray's forward half-line overlaps the box.
pub fn slab_test(min: &Point3<f32>, max: &Point3<f32>, ray: &Ray) -> bool {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let t1 = (min[axis] - ray.origin[axis]) / ray.direction[axis];
        let t2 = (max[axis] - ray.origin[axis]) / ray.direction[axis];
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    t_max > 0.0 && t_max >= t_min
}

/// An indexed triangle mesh with its own transform and a cached world-space AABB.
///
/// Call `update_transforms` after changing the transform or the geometry; hits
/// are tested against the cached transformed data only.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    pub positions: Vec<Point3<f32>>,
    /// Index triples, one per triangle.
    pub indices: Vec<u32>,
    pub cull_mode: CullMode,
    pub material_index: usize,

    // --- Transform ---
    translation: Matrix4<f32>,
    rotation: Matrix4<f32>,
    scale: Matrix4<f32>,

    // --- Cached ---
    min_aabb: Point3<f32>,
    max_aabb: Point3<f32>,
    transformed_positions: Vec<Point3<f32>>,
    transformed_normals: Vec<Vector3<f32>>,
    transformed_min_aabb: Point3<f32>,
    transformed_max_aabb: Point3<f32>,
}

impl TriangleMesh {
    pub fn new(
        positions: Vec<Point3<f32>>,
        indices: Vec<u32>,
        cull_mode: CullMode,
        material_index: usize,
    ) -> Self {
        let mut mesh = Self {
            positions,
            indices,
            cull_mode,
            material_index,
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            scale: Matrix4::identity(),
            min_aabb: Point3::origin(),
            max_aabb: Point3::origin(),
            transformed_positions: Vec::new(),
            transformed_normals: Vec::new(),
            transformed_min_aabb: Point3::origin(),
            transformed_max_aabb: Point3::origin(),
        };
        mesh.update_aabb();
        mesh.update_transforms();
        mesh
    }

    /// An empty mesh to be filled with `append_triangle`.
    pub fn empty(cull_mode: CullMode, material_index: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), cull_mode, material_index)
    }

    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.translation = TransformFactory::translation(offset);
    }

    pub fn rotate_y(&mut self, angle_rad: f32) {
        self.rotation = TransformFactory::rotation_y(angle_rad);
    }

    pub fn scale(&mut self, scale: &Vector3<f32>) {
        self.scale = TransformFactory::scaling_nonuniform(scale);
    }

    /// Adds a triangle's corners as three new vertices.
    ///
    /// Set `skip_update` when appending many triangles and call
    /// `update_transforms` once afterwards.
    pub fn append_triangle(&mut self, triangle: &Triangle, skip_update: bool) {
        let start = self.positions.len() as u32;
        self.positions
            .extend_from_slice(&[triangle.v0, triangle.v1, triangle.v2]);
        self.indices.extend_from_slice(&[start, start + 1, start + 2]);

        if !skip_update {
            self.update_aabb();
            self.update_transforms();
        }
    }

    /// Recomputes the object-space AABB from `positions`.
    pub fn update_aabb(&mut self) {
        let Some(first) = self.positions.first() else {
            self.min_aabb = Point3::origin();
            self.max_aabb = Point3::origin();
            return;
        };
        let (min, max) = self.positions.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        self.min_aabb = min;
        self.max_aabb = max;
    }

    /// Recomputes world-space positions, per-triangle normals and the world AABB.
    pub fn update_transforms(&mut self) {
        let world = self.translation * self.rotation * self.scale;

        self.transformed_positions = self
            .positions
            .iter()
            .map(|p| world.transform_point(p))
            .collect();

        self.transformed_normals = self
            .indices
            .chunks_exact(3)
            .map(|tri| {
                let p = |i: u32| self.transformed_positions.get(i as usize).copied();
                match (p(tri[0]), p(tri[1]), p(tri[2])) {
                    (Some(a), Some(b), Some(c)) => face_normal(&a, &b, &c),
                    _ => Vector3::zeros(),
                }
            })
            .collect();

        self.update_transformed_aabb(&world);
    }

    fn update_transformed_aabb(&mut self, world: &Matrix4<f32>) {
        let (lo, hi) = (self.min_aabb, self.max_aabb);
        let corners = [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ];

        let first = world.transform_point(&corners[0]);
        let (min, max) = corners[1..].iter().fold((first, first), |(min, max), c| {
            let t = world.transform_point(c);
            (min.inf(&t), max.sup(&t))
        });
        self.transformed_min_aabb = min;
        self.transformed_max_aabb = max;
    }

    pub fn transformed_aabb(&self) -> (Point3<f32>, Point3<f32>) {
        (self.transformed_min_aabb, self.transformed_max_aabb)
    }
}

impl Hittable for TriangleMesh {
    fn hit(&self, ray: &Ray, kind: RayKind, rec: &mut HitRecord) -> bool {
        if !slab_test(&self.transformed_min_aabb, &self.transformed_max_aabb, ray) {
            return false;
        }

        let mut hit_anything = false;
        for (tri, normal) in self.indices.chunks_exact(3).zip(&self.transformed_normals) {
            let corner = |i: u32| self.transformed_positions.get(i as usize);
            let (Some(v0), Some(v1), Some(v2)) = (corner(tri[0]), corner(tri[1]), corner(tri[2]))
            else {
                continue;
            };

            if hit_triangle(
                [v0, v1, v2],
                normal,
                self.cull_mode,
                self.material_index,
                ray,
                kind,
                rec,
            ) {
                hit_anything = true;
                if kind == RayKind::Shadow {
                    return true;
                }
            }
        }
        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_triangle() -> Triangle {
        // Normal is -Z: faces a ray travelling along +Z.
        Triangle::new(
            Point3::new(-1.0, -1.0, 5.0),
            Point3::new(0.0, 1.0, 5.0),
            Point3::new(1.0, -1.0, 5.0),
        )
    }

    #[test]
    fn sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere {
            origin: Point3::origin(),
            radius: 2.0,
            material_index: 0,
        };
        let ray = Ray::new(Point3::origin(), Vector3::x());
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, RayKind::Primary, &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_miss_and_tangent_miss() {
        let sphere = Sphere {
            origin: Point3::new(0.0, 1.0, 10.0),
            radius: 1.0,
            material_index: 0,
        };
        let mut rec = HitRecord::default();
        // Grazes the sphere: discriminant is zero.
        assert!(!sphere.hit(&Ray::new(Point3::origin(), Vector3::z()), RayKind::Primary, &mut rec));
        assert!(!rec.did_hit);
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn farther_hit_does_not_overwrite_record() {
        let near = Sphere {
            origin: Point3::new(0.0, 0.0, 5.0),
            radius: 1.0,
            material_index: 1,
        };
        let far = Sphere {
            origin: Point3::new(0.0, 0.0, 20.0),
            radius: 1.0,
            material_index: 2,
        };
        let ray = Ray::new(Point3::origin(), Vector3::z());
        let mut rec = HitRecord::default();
        assert!(near.hit(&ray, RayKind::Primary, &mut rec));
        assert!(!far.hit(&ray, RayKind::Primary, &mut rec));
        assert_eq!(rec.material_index, 1);
    }

    #[test]
    fn plane_hit_and_parallel_miss() {
        let floor = Plane {
            origin: Point3::origin(),
            normal: Vector3::y(),
            material_index: 0,
        };
        let mut rec = HitRecord::default();
        let down = Ray::new(Point3::new(0.0, 3.0, 0.0), -Vector3::y());
        assert!(floor.hit(&down, RayKind::Primary, &mut rec));
        assert!((rec.t - 3.0).abs() < 1e-5);

        let mut rec = HitRecord::default();
        let along = Ray::new(Point3::new(0.0, 3.0, 0.0), Vector3::x());
        assert!(!floor.hit(&along, RayKind::Primary, &mut rec));
    }

    #[test]
    fn triangle_cull_modes() {
        let ray = Ray::new(Point3::origin(), Vector3::z());
        let mut tri = facing_triangle();
        assert!((tri.normal - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);

        for (mode, primary, shadow) in [
            (CullMode::None, true, true),
            (CullMode::Back, true, false),
            (CullMode::Front, false, true),
        ] {
            tri.cull_mode = mode;
            let mut rec = HitRecord::default();
            assert_eq!(tri.hit(&ray, RayKind::Primary, &mut rec), primary, "{mode:?}");
            assert_eq!(tri.does_hit(&ray), shadow, "{mode:?}");
        }
    }

    #[test]
    fn triangle_edge_test_rejects_outside_point() {
        let tri = facing_triangle();
        let ray = Ray::new(Point3::new(0.9, 0.9, 0.0), Vector3::z());
        let mut rec = HitRecord::default();
        assert!(!tri.hit(&ray, RayKind::Primary, &mut rec));
    }

    #[test]
    fn slab_rejects_box_behind_ray() {
        let min = Point3::new(-1.0, -1.0, -1.0);
        let max = Point3::new(1.0, 1.0, 1.0);
        assert!(slab_test(&min, &max, &Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::z())));
        assert!(!slab_test(&min, &max, &Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::z())));
        assert!(!slab_test(&min, &max, &Ray::new(Point3::new(0.0, 3.0, -5.0), Vector3::z())));
    }

    #[test]
    fn mesh_transform_moves_aabb_and_hits() {
        let mut mesh = TriangleMesh::empty(CullMode::Back, 3);
        mesh.append_triangle(&facing_triangle(), true);
        mesh.translate(&Vector3::new(0.0, 10.0, 0.0));
        mesh.update_aabb();
        mesh.update_transforms();

        let (min, max) = mesh.transformed_aabb();
        assert!((min.y - 9.0).abs() < 1e-5 && (max.y - 11.0).abs() < 1e-5);

        let mut rec = HitRecord::default();
        let miss = Ray::new(Point3::origin(), Vector3::z());
        assert!(!mesh.hit(&miss, RayKind::Primary, &mut rec));

        let ray = Ray::new(Point3::new(0.0, 10.0, 0.0), Vector3::z());
        assert!(mesh.hit(&ray, RayKind::Primary, &mut rec));
        assert_eq!(rec.material_index, 3);
        assert!((rec.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn mesh_rotation_keeps_triangle_facing_consistent() {
        let mut mesh = TriangleMesh::empty(CullMode::None, 0);
        mesh.append_triangle(&facing_triangle(), false);
        mesh.rotate_y(std::f32::consts::PI);
        mesh.update_transforms();
        // Turned half way round: now at z = -5 with normal +Z.
        let ray = Ray::new(Point3::origin(), -Vector3::z());
        let mut rec = HitRecord::default();
        assert!(mesh.hit(&ray, RayKind::Primary, &mut rec));
        assert!((rec.normal - Vector3::z()).norm() < 1e-5);
    }
}
