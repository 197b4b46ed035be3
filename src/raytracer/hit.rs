use crate::raytracer::ray::Ray;
use nalgebra::{Point3, Vector3};

/// Record of the closest intersection found so far.
///
/// `t` starts at +infinity and only ever decreases: a primitive updates the
/// record only when it is hit strictly closer than what is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub did_hit: bool,
    /// Point of intersection
    pub origin: Point3<f32>,
    /// Unit surface normal at the intersection
    pub normal: Vector3<f32>,
    pub t: f32,
    pub material_index: usize,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            did_hit: false,
            origin: Point3::origin(),
            normal: Vector3::zeros(),
            t: f32::INFINITY,
            material_index: 0,
        }
    }
}

impl HitRecord {
    pub fn set(&mut self, ray: &Ray, t: f32, normal: Vector3<f32>, material_index: usize) {
        self.did_hit = true;
        self.t = t;
        self.origin = ray.at(t);
        self.normal = normal;
        self.material_index = material_index;
    }
}

/// Which kind of query a ray is used for. Shadow rays cull triangles with the
/// opposite face convention from primary rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayKind {
    Primary,
    Shadow,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable {
    /// Tests the ray and, if it hits closer than `rec.t`, updates the record.
    fn hit(&self, ray: &Ray, kind: RayKind, rec: &mut HitRecord) -> bool;

    /// Any-hit query for shadow rays.
    fn does_hit(&self, ray: &Ray) -> bool {
        let mut rec = HitRecord::default();
        self.hit(ray, RayKind::Shadow, &mut rec)
    }
}
