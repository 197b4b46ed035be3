use crate::core::geometry::VertexOut;
use nalgebra::Vector3;
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
pub trait Interpolatable: Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Interpolatable for VertexOut {}

/// Weighted sum of three interpolatable values.
#[inline]
pub fn blend<T: Interpolatable>(values: [&T; 3], weights: Vector3<f32>) -> T {
    *values[0] * weights.x + *values[1] * weights.y + *values[2] * weights.z
}

/// The pixel-shading stage of the rasterizer.
///
/// Receives a fully interpolated fragment (screen position in `position.xy`,
/// interpolated depth in `position.z`, interpolated w in `position.w`) and
/// returns its linear RGB color. Colors above 1.0 are allowed; the rasterizer
/// applies `max_to_one` before writing.
pub trait FragmentShader {
    fn shade(&self, fragment: &VertexOut) -> Vector3<f32>;
}

impl<F> FragmentShader for F
where
    F: Fn(&VertexOut) -> Vector3<f32>,
{
    fn shade(&self, fragment: &VertexOut) -> Vector3<f32> {
        self(fragment)
    }
}
