use crate::scene::camera::Camera;
use crate::scene::scene_object::SceneObject;

/// Holds all scene resources required for rasterizing a frame.
pub struct RenderContext {
    pub camera: Camera,
    pub scene_objects: Vec<SceneObject>,
}

impl RenderContext {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            scene_objects: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        self.scene_objects.push(object);
    }
}
