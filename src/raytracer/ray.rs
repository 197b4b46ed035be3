use nalgebra::{Point3, Vector3};

/// Default lower bound of the accepted hit range; keeps rays from hitting the
/// surface they start on.
pub const RAY_MIN: f32 = 0.0001;

/// A ray with a normalized direction and an accepted `t` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
    pub min: f32,
    pub max: f32,
}

impl Ray {
    /// Creates a ray over `[RAY_MIN, +inf]`. `direction` is normalized.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            min: RAY_MIN,
            max: f32::INFINITY,
        }
    }

    pub fn with_max(mut self, max: f32) -> Self {
        self.max = max;
        self
    }

    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    #[inline]
    pub fn in_range(&self, t: f32) -> bool {
        t >= self.min && t <= self.max
    }
}
