pub mod camera;
pub mod context;
pub mod effect;
pub mod light;
pub mod loader;
pub mod mesh;
pub mod scene_object;
pub mod texture;
pub mod utils;
