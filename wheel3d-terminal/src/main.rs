//! Wheel3D Terminal Demo - Wheel Carousel
//!
//! Renders two counter-spinning rings of rounded image tiles.
//! Controls:
//!   - Mouse wheel / Arrow Keys: Spin the rings
//!   - Mouse move: Highlight the tile under the pointer
//!   - Q/ESC: Quit

use clap::Parser;
use wheel3d_core::{CachingLoader, CarouselConfig, WheelCarousel};
use wheel3d_terminal::{loader, viewport, FileLoader, LoopSettings, TerminalApp, TerminalError};

/// Terminal wheel carousel
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// PGM images, or `swatch:<seed>` for generated tiles (default: 16 swatches)
    images: Vec<String>,

    /// Ring radius in world units
    #[arg(long, default_value_t = 3.0)]
    radius: f32,

    /// Tile corner radius in world units
    #[arg(long, default_value_t = 0.05)]
    corner_radius: f32,

    /// Segments per rounded corner
    #[arg(long, default_value_t = 10)]
    segments: usize,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Wheel delta per scroll notch
    #[arg(long, default_value_t = 100.0)]
    notch: f32,
}

fn main() -> Result<(), TerminalError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = CarouselConfig {
        ring_radius: cli.radius,
        corner_radius: cli.corner_radius,
        arc_segments: cli.segments,
        ..CarouselConfig::default()
    };
    let sources = if cli.images.is_empty() {
        loader::default_sources()
    } else {
        cli.images
    };

    println!("Wheel3D Terminal Renderer - Loading {} images...", sources.len());

    let (cols, rows) = crossterm::terminal::size()?;
    let mut assets = CachingLoader::new(FileLoader::new());
    let carousel = WheelCarousel::new(config, &sources, &mut assets, viewport(cols, rows))?;
    log::info!("{} unique textures resolved", assets.cached());

    // Run the terminal app
    let settings = LoopSettings {
        fps: cli.fps,
        notch_delta: cli.notch,
    };
    let mut app = TerminalApp::new(carousel, settings)?;
    app.run()?;

    println!("Thank you for using Wheel3D Terminal Renderer!");
    Ok(())
}
