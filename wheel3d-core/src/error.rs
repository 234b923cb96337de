//! Error types shared across the carousel core
use std::path::PathBuf;

use thiserror::Error;

/// Rejected parameters for the rounded-rectangle generator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("corner arcs need at least one segment")]
    NoArcSegments,
    #[error("quad extents must be positive, got {width} x {height}")]
    NonPositiveExtent { width: f32, height: f32 },
    #[error("corner radius {radius} must lie in [0, {limit})")]
    RadiusOutOfRange { radius: f32, limit: f32 },
}

/// Failures reported by an asset loader
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("texture source not found: {0}")]
    NotFound(String),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {source_id}: {reason}")]
    Decode { source_id: String, reason: String },
    #[error("loader returned {actual} textures for {expected} sources")]
    CountMismatch { expected: usize, actual: usize },
}

/// Errors raised while building or driving a carousel
#[derive(Debug, Error)]
pub enum CarouselError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("a ring needs at least one element")]
    EmptyRing,
    #[error("ring expects {expected} textures, got {actual}")]
    TextureCount { expected: usize, actual: usize },
    #[error("carousel has been disposed")]
    Disposed,
}

pub type CarouselResult<T> = Result<T, CarouselError>;
