use crate::scene::texture::Texture;
use nalgebra::{Vector2, Vector3};
use std::sync::Arc;

/// Defines how the pixel shader treats a mesh's fragments.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Lit surface: diffuse with optional normal, specular and glossiness maps.
    Vehicle(VehicleMaps),
    /// Unlit overlay: the fragment color is the diffuse sample.
    Fire(FireMaps),
}

impl Effect {
    pub fn is_lit(&self) -> bool {
        matches!(self, Effect::Vehicle(_))
    }

    pub fn diffuse_map(&self) -> &Texture {
        match self {
            Effect::Vehicle(maps) => &maps.diffuse,
            Effect::Fire(maps) => &maps.diffuse,
        }
    }
}

/// Texture set for the lit effect.
#[derive(Debug, Clone)]
pub struct VehicleMaps {
    pub diffuse: Arc<Texture>,
    pub normal: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
    pub gloss: Option<Arc<Texture>>,
}

impl VehicleMaps {
    pub fn new(diffuse: Arc<Texture>) -> Self {
        Self {
            diffuse,
            normal: None,
            specular: None,
            gloss: None,
        }
    }

    pub fn with_normal(mut self, normal: Arc<Texture>) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_specular(mut self, specular: Arc<Texture>) -> Self {
        self.specular = Some(specular);
        self
    }

    pub fn with_gloss(mut self, gloss: Arc<Texture>) -> Self {
        self.gloss = Some(gloss);
        self
    }

    /// Specular reflectance (ks). Maps are grayscale; the red channel is used.
    /// Without a map the surface has no highlight.
    pub fn specular_at(&self, uv: Vector2<f32>) -> f32 {
        self.specular.as_ref().map_or(0.0, |map| map.sample(uv).x)
    }

    /// Glossiness in [0, 1], scaled by the shader's shininess. Defaults to 1.
    pub fn gloss_at(&self, uv: Vector2<f32>) -> f32 {
        self.gloss.as_ref().map_or(1.0, |map| map.sample(uv).x)
    }

    /// Tangent-space normal remapped from [0, 1] to [-1, 1], if a map is bound.
    pub fn tangent_space_normal_at(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.normal
            .as_ref()
            .map(|map| map.sample(uv) * 2.0 - Vector3::repeat(1.0))
    }
}

/// Texture set for the unlit effect.
#[derive(Debug, Clone)]
pub struct FireMaps {
    pub diffuse: Arc<Texture>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_maps_fall_back() {
        let maps = VehicleMaps::new(Arc::new(Texture::solid(Vector3::repeat(0.5))));
        let uv = Vector2::new(0.5, 0.5);
        assert_eq!(maps.specular_at(uv), 0.0);
        assert_eq!(maps.gloss_at(uv), 1.0);
        assert!(maps.tangent_space_normal_at(uv).is_none());
    }

    #[test]
    fn normal_map_is_remapped_to_signed_range() {
        // (128, 128, 255) is the "straight up" normal-map texel.
        let flat = Texture::solid(Vector3::new(0.5, 0.5, 1.0));
        let maps = VehicleMaps::new(Arc::new(flat.clone())).with_normal(Arc::new(flat));
        let n = maps.tangent_space_normal_at(Vector2::zeros()).unwrap();
        assert!(n.x.abs() < 0.01 && n.y.abs() < 0.01);
        assert!((n.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn only_vehicle_is_lit() {
        let tex = Arc::new(Texture::solid(Vector3::repeat(1.0)));
        assert!(Effect::Vehicle(VehicleMaps::new(tex.clone())).is_lit());
        assert!(!Effect::Fire(FireMaps { diffuse: tex }).is_lit());
    }
}
