use crate::io::config::{Config, RenderMode};
use crate::io::image::save_buffer_to_image;
use crate::scene::loader::{build_rasterizer, build_raytracer};
use crate::ui::input::CameraInput;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Runs the configured pipeline headlessly and saves the last frame.
///
/// Every frame feeds an idle `CameraInput` to the camera and advances the
/// animation by `render.frame_time` seconds.
pub fn run_headless(config: &Config) -> Result<()> {
    let render = &config.render;
    let frames = render.frames.max(1);
    let dt = render.frame_time;
    let input = CameraInput::default();

    info!(
        "Rendering {} frame(s) at {}x{} with the {:?}",
        frames, render.width, render.height, render.mode
    );
    let start = Instant::now();

    let buffer = match render.mode {
        RenderMode::Rasterizer => {
            let (mut renderer, mut context) =
                build_rasterizer(config).context("Failed to build the rasterizer scene")?;

            for frame in 0..frames {
                context.camera.update(dt, &input);
                renderer.update(&mut context, dt);
                let stats = renderer.render(&context);
                debug!("Frame {}: {:?}", frame, stats);
            }
            renderer.color_buffer().to_vec()
        }
        RenderMode::Raytracer => {
            let (mut tracer, mut scene) = build_raytracer(config);

            for frame in 0..frames {
                scene.camera.update(dt, &input);
                scene.update(dt);
                tracer.render(&scene);
                debug!("Frame {} traced", frame);
            }
            tracer.buffer().to_vec()
        }
    };

    let elapsed = start.elapsed();
    info!(
        "Rendered {} frame(s) in {:.2?} ({:.2?} per frame)",
        frames,
        elapsed,
        elapsed / frames
    );

    save_buffer_to_image(&buffer, render.width, render.height, &render.output)
        .with_context(|| format!("Failed to save '{}'", render.output))?;
    Ok(())
}
