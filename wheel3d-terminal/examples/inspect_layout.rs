//! Example: Print the shared tile geometry and ring layout without opening the TUI
//!
//! Usage: cargo run --example inspect_layout -- [image.pgm | swatch:N]...

use std::env;
use wheel3d_core::{CachingLoader, CarouselConfig, RingId, WheelCarousel};
use wheel3d_terminal::{loader, FileLoader, TerminalError};

fn main() -> Result<(), TerminalError> {
    let mut sources: Vec<String> = env::args().skip(1).collect();
    if sources.is_empty() {
        eprintln!("No images provided, using default swatches...");
        sources = loader::default_sources();
    }

    let mut assets = CachingLoader::new(FileLoader::new());
    let mut app = WheelCarousel::new(CarouselConfig::default(), &sources, &mut assets, (800, 600))?;
    println!(
        "Resolved {} sources ({} unique textures)",
        sources.len(),
        assets.cached()
    );

    // Spin by one notch so the counter-rotation shows up in the numbers
    let spin = app.on_wheel(100.0)?;
    println!("Applied spin: {:+.4} rad", spin);

    if let Some(carousel) = app.carousel() {
        let geometry = carousel.geometry();
        println!(
            "Tile geometry: {} triangles, {} position floats, {} uv floats",
            geometry.triangle_count(),
            geometry.positions().len(),
            geometry.uvs().len()
        );

        for id in RingId::ALL {
            let ring = carousel.ring(id);
            println!("{:?} ring: {} elements, angle {:+.4}", id, ring.len(), ring.angle());
            for index in 0..ring.len() {
                if let Some(world) = carousel.element_world(id, index) {
                    let t = world.translation;
                    println!(
                        "  #{:<2} world ({:+.3}, {:+.3}, {:+.3}) tilt {:+.4}",
                        index,
                        t.x,
                        t.y,
                        t.z,
                        world.angle_z()
                    );
                }
            }
        }
    }

    app.dispose();
    Ok(())
}
