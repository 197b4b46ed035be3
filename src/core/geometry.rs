use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Represents a single vertex in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    /// Texture coordinates (UV).
    pub uv: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector (xyz) for Normal Mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            color: Vector3::repeat(1.0),
            uv,
            normal,
            tangent: Vector3::zeros(),
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    pub fn with_tangent(mut self, tangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self
    }
}

/// Output of the vertex transformation stage, one per input vertex.
///
/// `position.xyz` holds NDC after the perspective divide (screen space once the
/// rasterizer maps it) and `position.w` keeps the clip-space w, i.e. the
/// view-space depth, which perspective-correct interpolation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOut {
    pub position: Vector4<f32>,
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// Normalized direction from the camera to the world-space vertex.
    pub view_direction: Vector3<f32>,
}

impl Default for VertexOut {
    fn default() -> Self {
        Self {
            position: Vector4::zeros(),
            color: Vector3::repeat(1.0),
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
        }
    }
}

impl Add for VertexOut {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            position: self.position + other.position,
            color: self.color + other.color,
            uv: self.uv + other.uv,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_direction: self.view_direction + other.view_direction,
        }
    }
}

impl Mul<f32> for VertexOut {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            position: self.position * scalar,
            color: self.color * scalar,
            uv: self.uv * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_direction: self.view_direction * scalar,
        }
    }
}
