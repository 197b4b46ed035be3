use crate::error::ConfigError;
use crate::pipeline::shaders::pixel::ShadingMode;
use crate::raytracer::renderer::LightingMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which pipeline the binary drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Rasterizer,
    Raytracer,
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub rasterizer: RasterizerConfig,
    #[serde(default)]
    pub raytracer: RaytracerConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub mode: RenderMode,

    // --- Simulation ---
    /// Frames simulated before the last one is saved.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Seconds per simulated frame.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,

    #[serde(default = "default_background")]
    pub background_color: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            mode: RenderMode::default(),
            frames: default_frames(),
            frame_time: default_frame_time(),
            background_color: default_background(),
        }
    }
}

fn default_width() -> usize {
    640
}

fn default_height() -> usize {
    480
}

fn default_output() -> String {
    "output.png".to_string()
}

fn default_frames() -> u32 {
    1
}

fn default_frame_time() -> f32 {
    1.0 / 60.0
}

fn default_background() -> [f32; 3] {
    [0.39, 0.39, 0.39]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
    #[serde(default = "default_boost")]
    pub boost_multiplier: f32,
    /// Degrees per pixel of mouse movement.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    /// Initial orientation in degrees.
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub yaw: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            movement_speed: default_movement_speed(),
            boost_multiplier: default_boost(),
            rotation_speed: default_rotation_speed(),
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

fn default_origin() -> [f32; 3] {
    [0.0, 0.0, -50.0]
}

fn default_fov() -> f32 {
    45.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

fn default_movement_speed() -> f32 {
    12.0
}

fn default_boost() -> f32 {
    4.0
}

fn default_rotation_speed() -> f32 {
    0.6
}

#[derive(Debug, Deserialize)]
pub struct RasterizerConfig {
    #[serde(default)]
    pub shading_mode: ShadingMode,
    #[serde(default = "default_true")]
    pub use_normal_map: bool,
    #[serde(default = "default_true")]
    pub rotate: bool,
    /// Degrees per second about world Y.
    #[serde(default = "default_mesh_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default)]
    pub light: DirectionalLightConfig,

    /// OBJ file for the lit mesh; a built-in quad is used when absent.
    pub mesh: Option<String>,
    #[serde(default)]
    pub textures: VehicleTextureConfig,
    /// Optional unlit overlay drawn with the same transform.
    pub fire: Option<FireConfig>,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            shading_mode: ShadingMode::default(),
            use_normal_map: true,
            rotate: true,
            rotation_speed: default_mesh_rotation_speed(),
            shininess: default_shininess(),
            light: DirectionalLightConfig::default(),
            mesh: None,
            textures: VehicleTextureConfig::default(),
            fire: None,
        }
    }
}

fn default_mesh_rotation_speed() -> f32 {
    45.0
}

fn default_shininess() -> f32 {
    25.0
}

#[derive(Debug, Deserialize)]
pub struct DirectionalLightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_light_color(),
            intensity: default_light_intensity(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_light_intensity() -> f32 {
    7.0
}

#[derive(Debug, Default, Deserialize)]
pub struct VehicleTextureConfig {
    pub diffuse: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub gloss: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FireConfig {
    pub mesh: String,
    pub diffuse: String,
}

#[derive(Debug, Deserialize)]
pub struct RaytracerConfig {
    #[serde(default)]
    pub lighting_mode: LightingMode,
    #[serde(default = "default_true")]
    pub shadows: bool,
    #[serde(default = "default_true")]
    pub rotate: bool,
}

impl Default for RaytracerConfig {
    fn default() -> Self {
        Self {
            lighting_mode: LightingMode::default(),
            shadows: true,
            rotate: true,
        }
    }
}
