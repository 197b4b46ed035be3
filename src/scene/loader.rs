use crate::error::ResourceLoadError;
use crate::io::config::{CameraConfig, Config, RasterizerConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::pixel::ShadingSettings;
use crate::raytracer::renderer::RayTracer;
use crate::raytracer::scene::Scene;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::effect::{Effect, FireMaps, VehicleMaps};
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::SceneObject;
use crate::scene::texture::Texture;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Half extent of the quad used when no mesh is configured.
const FALLBACK_QUAD_HALF_SIZE: f32 = 10.0;

/// Builds the camera from its config section.
pub fn build_camera(config: &CameraConfig, aspect_ratio: f32) -> Camera {
    let mut camera = Camera::default();
    camera.near = config.near;
    camera.far = config.far;
    camera.movement_speed = config.movement_speed;
    camera.boost_multiplier = config.boost_multiplier;
    camera.rotation_speed = config.rotation_speed;
    camera.initialize(aspect_ratio, config.fov, Point3::from(config.origin));

    if config.pitch != 0.0 || config.yaw != 0.0 {
        camera.pitch = config.pitch.to_radians();
        camera.yaw = config.yaw.to_radians();
        // An idle update rebuilds forward and the matrices from pitch/yaw.
        camera.update(0.0, &Default::default());
    }
    camera
}

/// Shading state for the rasterizer from its config section.
pub fn build_shading_settings(config: &RasterizerConfig) -> ShadingSettings {
    let direction = Vector3::from(config.light.direction);
    ShadingSettings {
        mode: config.shading_mode,
        use_normal_map: config.use_normal_map,
        light_direction: direction
            .try_normalize(1e-6)
            .unwrap_or_else(|| ShadingSettings::default().light_direction),
        light_color: Vector3::from(config.light.color),
        light_intensity: config.light.intensity,
        shininess: config.shininess,
    }
}

/// Creates the rasterizer and its scene from the config.
///
/// A missing diffuse texture falls back to a flat gray; any other configured
/// resource that fails to load is an error.
pub fn build_rasterizer(config: &Config) -> Result<(Renderer, RenderContext), ResourceLoadError> {
    let render = &config.render;
    let raster = &config.rasterizer;
    let aspect_ratio = render.width as f32 / render.height as f32;

    let mut renderer = Renderer::new(render.width, render.height);
    renderer.settings = build_shading_settings(raster);
    renderer.background = Vector3::from(render.background_color);
    renderer.rotate = raster.rotate;
    renderer.rotation_speed = raster.rotation_speed;

    let mut context = RenderContext::new(build_camera(&config.camera, aspect_ratio));

    let mesh = match &raster.mesh {
        Some(path) => load_obj(path)?,
        None => {
            warn!("No mesh configured. Using a built-in quad.");
            Mesh::create_quad(FALLBACK_QUAD_HALF_SIZE)
        }
    };

    let textures = &raster.textures;
    let diffuse = match &textures.diffuse {
        Some(path) => Texture::load(path)?,
        None => Texture::solid(Vector3::repeat(0.75)),
    };
    let mut maps = VehicleMaps::new(Arc::new(diffuse));
    if let Some(path) = &textures.normal {
        maps = maps.with_normal(Arc::new(Texture::load(path)?));
    }
    if let Some(path) = &textures.specular {
        maps = maps.with_specular(Arc::new(Texture::load(path)?));
    }
    if let Some(path) = &textures.gloss {
        maps = maps.with_gloss(Arc::new(Texture::load(path)?));
    }
    context.add_object(SceneObject::new(mesh, Effect::Vehicle(maps)));

    if let Some(fire) = &raster.fire {
        let fire_mesh = load_obj(&fire.mesh)?;
        let diffuse = Arc::new(Texture::load(&fire.diffuse)?);
        context.add_object(SceneObject::new(fire_mesh, Effect::Fire(FireMaps { diffuse })));
    }

    info!(
        "Rasterizer scene ready: {} objects, {} triangles",
        context.scene_objects.len(),
        context
            .scene_objects
            .iter()
            .map(|o| o.mesh.triangle_count())
            .sum::<usize>()
    );
    Ok((renderer, context))
}

/// Creates the ray tracer and the reference scene.
///
/// The reference scene brings its own camera; only the lens is taken from config.
pub fn build_raytracer(config: &Config) -> (RayTracer, Scene) {
    let render = &config.render;
    let mut tracer = RayTracer::new(render.width, render.height);
    tracer.lighting_mode = config.raytracer.lighting_mode;
    tracer.shadows_enabled = config.raytracer.shadows;

    let mut scene = Scene::reference(tracer.aspect_ratio());
    scene.rotate = config.raytracer.rotate;
    scene.camera.set_fov(config.camera.fov);

    (tracer, scene)
}
