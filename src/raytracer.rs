//! Per-pixel ray tracer: primary rays against spheres, planes and triangle
//! meshes, direct lighting from point and directional lights with binary
//! shadow rays.

pub mod geometry;
pub mod hit;
pub mod material;
pub mod ray;
pub mod renderer;
pub mod scene;
