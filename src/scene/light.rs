use nalgebra::{Point3, Vector3};

/// Represents a light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// A light source that is infinitely far away (e.g., Sun).
    /// `direction` is the direction the light travels.
    Directional {
        direction: Vector3<f32>,
        color: Vector3<f32>,
        intensity: f32,
    },
    /// A light source at a specific position that radiates in all directions.
    /// Falls off with the inverse square of the distance.
    Point {
        position: Point3<f32>,
        color: Vector3<f32>,
        intensity: f32,
    },
}

impl Light {
    pub fn new_directional(direction: Vector3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    pub fn new_point(position: Point3<f32>, color: Vector3<f32>, intensity: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
        }
    }

    /// Unnormalized vector FROM the surface point TO the light source.
    /// For directional lights this is `-direction`.
    pub fn vector_to_light(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        match self {
            Light::Directional { direction, .. } => -direction,
            Light::Point { position, .. } => position - surface_point,
        }
    }

    /// Normalized direction FROM the surface point TO the light source.
    pub fn direction_to_light(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        self.vector_to_light(surface_point).normalize()
    }

    /// Distance a shadow ray has to travel to reach the light.
    pub fn distance(&self, surface_point: &Point3<f32>) -> f32 {
        match self {
            Light::Directional { .. } => f32::INFINITY,
            Light::Point { position, .. } => (position - surface_point).norm(),
        }
    }

    /// Radiance arriving at the surface point.
    pub fn radiance(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        match self {
            Light::Directional {
                color, intensity, ..
            } => color * *intensity,

            Light::Point {
                position,
                color,
                intensity,
            } => {
                let distance_sq = (position - surface_point).norm_squared();
                color * (*intensity / distance_sq)
            }
        }
    }
}
