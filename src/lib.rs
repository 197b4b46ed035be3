//! CPU rendering core.
//!
//! Two independent pipelines share the math kernel, BRDFs and camera:
//! - a single-threaded software rasterizer (`pipeline::renderer::Renderer`)
//! - a data-parallel ray tracer (`raytracer::renderer::RayTracer`)

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod raytracer;
pub mod scene;
pub mod ui;
