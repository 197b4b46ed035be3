use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use softrender::app::run_headless;
use softrender::io::config::{Config, RenderMode};

/// CPU software rasterizer and ray tracer.
#[derive(Parser, Debug)]
#[command(name = "softrender", version, about)]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Pipeline to run
    #[arg(short, long, value_enum)]
    mode: Option<RenderMode>,

    /// Output image path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Number of frames to simulate before saving
    #[arg(long)]
    frames: Option<u32>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config: {}", path);
            Config::load(path).with_context(|| format!("Failed to load config '{}'", path))?
        }
        None => {
            info!("No config given. Using defaults.");
            Config::default()
        }
    };

    if let Some(mode) = args.mode {
        config.render.mode = mode;
    }
    if let Some(output) = &args.output {
        config.render.output = output.clone();
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(frames) = args.frames {
        config.render.frames = frames;
    }

    anyhow::ensure!(
        config.render.width > 0 && config.render.height > 0,
        "Image size must be positive, got {}x{}",
        config.render.width,
        config.render.height
    );
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let result = load_config(&args).and_then(|config| run_headless(&config));
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
