use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{Rasterizer, TriangleOutcome};
use crate::pipeline::shaders::pixel::{PixelShader, ShadingSettings};
use crate::pipeline::vertex::transform_vertices;
use crate::scene::context::RenderContext;
use log::{debug, warn};
use nalgebra::Vector3;

/// Counters for the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub culled: usize,
    pub fragments: usize,
}

/// The high-level rasterizer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub settings: ShadingSettings,
    pub background: Vector3<f32>,

    // --- Animation ---
    pub rotate: bool,
    /// Degrees per second about world Y.
    pub rotation_speed: f32,

    stats: FrameStats,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            settings: ShadingSettings::default(),
            background: Vector3::repeat(0.39),
            rotate: true,
            rotation_speed: 45.0,
            stats: FrameStats::default(),
        }
    }

    /// Advances animation state by `dt` seconds.
    pub fn update(&self, context: &mut RenderContext, dt: f32) {
        if !self.rotate {
            return;
        }
        let angle = (self.rotation_speed * dt).to_radians();
        for object in &mut context.scene_objects {
            object.mesh.rotate_y(angle);
        }
    }

    /// Renders every scene object into the framebuffer.
    ///
    /// Both buffers are reset first: color to the background, depth to +infinity.
    pub fn render(&mut self, context: &RenderContext) -> FrameStats {
        self.framebuffer.clear(self.background);
        let mut stats = FrameStats::default();

        for object in &context.scene_objects {
            let mesh = &object.mesh;
            let vertices_out = transform_vertices(mesh, &context.camera);
            let shader = PixelShader::new(&object.effect, &self.settings);

            for [i0, i1, i2] in mesh.triangles() {
                let (Some(v0), Some(v1), Some(v2)) = (
                    vertices_out.get(i0 as usize),
                    vertices_out.get(i1 as usize),
                    vertices_out.get(i2 as usize),
                ) else {
                    warn!("Skipping triangle with out-of-range index ({i0}, {i1}, {i2})");
                    continue;
                };

                stats.triangles += 1;
                match self
                    .rasterizer
                    .rasterize_triangle(&mut self.framebuffer, [v0, v1, v2], &shader)
                {
                    TriangleOutcome::Culled => stats.culled += 1,
                    TriangleOutcome::Rasterized { fragments } => stats.fragments += fragments,
                }
            }
        }

        debug!(
            "Frame: {} triangles, {} culled, {} fragments",
            stats.triangles, stats.culled, stats.fragments
        );
        self.stats = stats;
        stats
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Packed 0RGB pixels of the last frame, row-major.
    pub fn color_buffer(&self) -> &[u32] {
        &self.framebuffer.color_buffer
    }

    // --- Toggles ---

    pub fn cycle_shading_mode(&mut self) {
        self.settings.mode = self.settings.mode.next();
        debug!("Shading mode: {:?}", self.settings.mode);
    }

    pub fn toggle_normal_map(&mut self) {
        self.settings.use_normal_map = !self.settings.use_normal_map;
        debug!("Normal map: {}", self.settings.use_normal_map);
    }

    pub fn toggle_rotation(&mut self) {
        self.rotate = !self.rotate;
        debug!("Rotation: {}", self.rotate);
    }
}
