use crate::scene::effect::Effect;
use crate::scene::mesh::Mesh;

/// A mesh paired with the effect it is shaded with.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub effect: Effect,
}

impl SceneObject {
    pub fn new(mesh: Mesh, effect: Effect) -> Self {
        Self { mesh, effect }
    }
}
