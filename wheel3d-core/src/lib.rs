//! Wheel3D Core Library - platform-free wheel carousel logic
//!
//! This library provides the rounded-quad geometry generator, ring layout,
//! scroll-driven ring rotation and pointer hover picking. Rendering, input
//! sources and texture decoding backends live in the frontend crates.

pub mod app;
pub mod carousel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hover;
pub mod pgm;
pub mod projection;
pub mod ray;
pub mod ring;
pub mod scroll;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use app::{Subscription, WheelCarousel};
pub use carousel::{Carousel, RingId};
pub use config::CarouselConfig;
pub use error::{AssetError, CarouselError, CarouselResult, GeometryError};
pub use geometry::QuadGeometry;
pub use hover::{HoverDetector, HoverState, PointerState};
pub use projection::{Camera, ProjectionMode};
pub use ray::{Intersection, Ray};
pub use ring::{Ring, RingElement, RingLayout};
pub use scroll::ScrollController;
pub use texture::{AssetLoader, Bitmap, CachingLoader, Material};
pub use transform::Transform;
