mod app;
mod config;
mod engine;
mod logging;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use config::EngineConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    node_count: Option<usize>,
    /// Camera orbit radius in world units.
    #[arg(long)]
    distance: Option<f32>,
    /// Radians per frame.
    #[arg(long)]
    orbit_speed: Option<f32>,
    /// Comma-separated #rrggbb group colors.
    #[arg(long, value_delimiter = ',')]
    palette: Option<Vec<String>>,
    /// Disable pointer tracking and cursor attraction entirely.
    #[arg(long)]
    no_interaction: bool,
    /// JSON preset file; explicit flags win over preset values.
    #[arg(long)]
    preset: Option<PathBuf>,
    #[arg(long)]
    show_fps: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = match &args.preset {
        Some(path) => EngineConfig::load_preset(path)?,
        None => EngineConfig::default(),
    };

    if let Some(node_count) = args.node_count {
        config.node_count = node_count;
    }
    if let Some(distance) = args.distance {
        config.distance = distance;
    }
    if let Some(orbit_speed) = args.orbit_speed {
        config.orbit_speed = orbit_speed;
    }
    if let Some(palette) = args.palette {
        config.palette = palette;
    }
    if args.no_interaction {
        config.disable_interaction = true;
    }
    config.normalize();

    let palette = config.palette_colors()?;
    let show_fps = args.show_fps;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "neural-canvas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::NeuralCanvasApp::new(
                cc, config, palette, show_fps,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("failed to run neural-canvas: {error}"))
}
