use crate::core::brdf::{lambert, phong};
use crate::core::color::BLACK;
use crate::core::geometry::VertexOut;
use crate::core::pipeline::FragmentShader;
use crate::scene::effect::{Effect, VehicleMaps};
use nalgebra::Vector3;
use serde::Deserialize;

/// Which terms of the lighting equation end up in the color buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Lambert cosine term only, as grayscale.
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

impl ShadingMode {
    /// The next mode in the cycle ObservedArea -> Diffuse -> Specular -> Combined.
    pub fn next(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        }
    }
}

/// Per-frame shading state, owned by the renderer and toggled from outside.
///
/// The rasterizer is lit by this single directional light.
#[derive(Debug, Clone)]
pub struct ShadingSettings {
    pub mode: ShadingMode,
    pub use_normal_map: bool,
    /// Direction the light travels (normalized).
    pub light_direction: Vector3<f32>,
    pub light_color: Vector3<f32>,
    pub light_intensity: f32,
    /// Multiplied with the glossiness sample to get the Phong exponent.
    pub shininess: f32,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            mode: ShadingMode::Combined,
            use_normal_map: true,
            light_direction: Vector3::new(0.577, -0.577, 0.577).normalize(),
            light_color: Vector3::repeat(1.0),
            light_intensity: 7.0,
            shininess: 25.0,
        }
    }
}

impl ShadingSettings {
    pub fn radiance(&self) -> Vector3<f32> {
        self.light_color * self.light_intensity
    }
}

/// Shades interpolated fragments of one scene object.
pub struct PixelShader<'a> {
    effect: &'a Effect,
    settings: &'a ShadingSettings,
}

impl<'a> PixelShader<'a> {
    pub fn new(effect: &'a Effect, settings: &'a ShadingSettings) -> Self {
        Self { effect, settings }
    }

    /// Surface normal, perturbed by the normal map when enabled and bound.
    fn effective_normal(&self, maps: &VehicleMaps, fragment: &VertexOut) -> Vector3<f32> {
        let n = fragment.normal;
        if !self.settings.use_normal_map {
            return n;
        }
        let Some(sample) = maps.tangent_space_normal_at(fragment.uv) else {
            return n;
        };

        let t = fragment.tangent;
        let b = n.cross(&t);
        let mapped = t * sample.x + b * sample.y + n * sample.z;
        mapped.try_normalize(1e-6).unwrap_or(n)
    }

    fn shade_lit(&self, maps: &VehicleMaps, fragment: &VertexOut) -> Vector3<f32> {
        let settings = self.settings;
        let n = self.effective_normal(maps, fragment);
        let to_light = -settings.light_direction;

        let observed_area = n.dot(&to_light);
        if observed_area < 0.0 {
            return BLACK;
        }

        let radiance = settings.radiance();
        let diffuse = || {
            radiance.component_mul(&lambert(1.0, maps.diffuse.sample(fragment.uv))) * observed_area
        };
        let specular = || {
            let ks = maps.specular_at(fragment.uv);
            let exp = maps.gloss_at(fragment.uv) * settings.shininess;
            radiance.component_mul(&phong(ks, exp, &to_light, &fragment.view_direction, &n))
                * observed_area
        };

        match settings.mode {
            ShadingMode::ObservedArea => Vector3::repeat(observed_area),
            ShadingMode::Diffuse => diffuse(),
            ShadingMode::Specular => specular(),
            ShadingMode::Combined => diffuse() + specular(),
        }
    }
}

impl FragmentShader for PixelShader<'_> {
    fn shade(&self, fragment: &VertexOut) -> Vector3<f32> {
        match self.effect {
            Effect::Vehicle(maps) => self.shade_lit(maps, fragment),
            Effect::Fire(_) => self.effect.diffuse_map().sample(fragment.uv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::effect::FireMaps;
    use crate::scene::texture::Texture;
    use nalgebra::Vector2;
    use std::f32::consts::PI;
    use std::sync::Arc;

    fn fragment_facing(normal: Vector3<f32>) -> VertexOut {
        VertexOut {
            normal,
            tangent: Vector3::x(),
            uv: Vector2::new(0.5, 0.5),
            view_direction: Vector3::z(),
            ..Default::default()
        }
    }

    fn white_vehicle() -> Effect {
        Effect::Vehicle(VehicleMaps::new(Arc::new(Texture::solid(Vector3::repeat(1.0)))))
    }

    fn overhead_light(mode: ShadingMode) -> ShadingSettings {
        ShadingSettings {
            mode,
            light_direction: -Vector3::y(),
            light_intensity: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn mode_cycle_wraps() {
        let mut mode = ShadingMode::ObservedArea;
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, ShadingMode::ObservedArea);
    }

    #[test]
    fn back_facing_fragment_is_black() {
        let effect = white_vehicle();
        let settings = overhead_light(ShadingMode::Combined);
        let shader = PixelShader::new(&effect, &settings);
        assert_eq!(shader.shade(&fragment_facing(-Vector3::y())), BLACK);
    }

    #[test]
    fn observed_area_is_cosine() {
        let effect = white_vehicle();
        let settings = overhead_light(ShadingMode::ObservedArea);
        let shader = PixelShader::new(&effect, &settings);
        let n = Vector3::new(1.0, 1.0, 0.0).normalize();
        let c = shader.shade(&fragment_facing(n));
        assert!((c.x - n.y).abs() < 1e-5);
    }

    #[test]
    fn diffuse_is_radiance_times_lambert() {
        let effect = white_vehicle();
        let settings = overhead_light(ShadingMode::Diffuse);
        let shader = PixelShader::new(&effect, &settings);
        let c = shader.shade(&fragment_facing(Vector3::y()));
        assert!((c.x - 2.0 / PI).abs() < 1e-5);
    }

    #[test]
    fn combined_without_specular_map_equals_diffuse() {
        let effect = white_vehicle();
        let diffuse = overhead_light(ShadingMode::Diffuse);
        let combined = overhead_light(ShadingMode::Combined);
        let frag = fragment_facing(Vector3::y());
        let d = PixelShader::new(&effect, &diffuse).shade(&frag);
        let c = PixelShader::new(&effect, &combined).shade(&frag);
        assert!((c - d).norm() < 1e-6);
    }

    #[test]
    fn flat_normal_map_keeps_geometric_normal() {
        let flat = Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 1.0)));
        let maps = VehicleMaps::new(Arc::new(Texture::solid(Vector3::repeat(1.0)))).with_normal(flat);
        let effect = Effect::Vehicle(maps.clone());
        let settings = overhead_light(ShadingMode::ObservedArea);
        let shader = PixelShader::new(&effect, &settings);

        let n = shader.effective_normal(&maps, &fragment_facing(Vector3::y()));
        assert!((n - Vector3::y()).norm() < 0.01);
    }

    #[test]
    fn fire_is_unlit() {
        let effect = Effect::Fire(FireMaps {
            diffuse: Arc::new(Texture::solid(Vector3::new(1.0, 0.0, 0.0))),
        });
        let settings = overhead_light(ShadingMode::Diffuse);
        let shader = PixelShader::new(&effect, &settings);
        // Facing away from the light still shows the texture.
        let c = shader.shade(&fragment_facing(-Vector3::y()));
        assert_eq!(c, Vector3::new(1.0, 0.0, 0.0));
    }
}
