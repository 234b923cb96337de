//! Tunable carousel constants

use crate::error::GeometryError;
use crate::geometry::validate_rounded_rect;
use crate::ring::RingLayout;

/// Every tuned value of the carousel in one place.
///
/// The ring offsets are asymmetric on purpose; they were picked by eye and no
/// relation between them is assumed anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub quad_width: f32,
    pub quad_height: f32,
    pub corner_radius: f32,
    pub arc_segments: usize,
    pub ring_radius: f32,
    /// Z coordinate of every element inside its ring
    pub element_depth: f32,
    pub top_offset: f32,
    pub bottom_offset: f32,
    /// Raw wheel units per normalized step
    pub scroll_divisor: f32,
    pub scroll_scale: f32,
    pub hover_opacity: f32,
    pub camera_z: f32,
    /// Vertical field of view in degrees
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub background: [u8; 3],
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            quad_width: 1.0,
            quad_height: 1.0,
            corner_radius: 0.05,
            arc_segments: 10,
            ring_radius: 3.0,
            element_depth: -1.0,
            top_offset: 3.85,
            bottom_offset: -3.45,
            scroll_divisor: 360.0,
            scroll_scale: 0.5,
            hover_opacity: 0.1,
            camera_z: 2.0,
            camera_fov: 50.0,
            camera_near: 0.1,
            camera_far: 100.0,
            background: [0x00, 0x11, 0x22],
        }
    }
}

impl CarouselConfig {
    /// Reject geometry parameters before anything gets built
    pub fn validate(&self) -> Result<(), GeometryError> {
        validate_rounded_rect(
            self.quad_width,
            self.quad_height,
            self.corner_radius,
            self.arc_segments,
        )
    }

    pub fn top_layout(&self) -> RingLayout {
        RingLayout {
            radius: self.ring_radius,
            depth: self.element_depth,
            y_offset: self.top_offset,
        }
    }

    pub fn bottom_layout(&self) -> RingLayout {
        RingLayout {
            radius: self.ring_radius,
            depth: self.element_depth,
            y_offset: self.bottom_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CarouselConfig::default().validate().is_ok());
    }

    #[test]
    fn test_layouts_share_radius() {
        let config = CarouselConfig::default();
        let top = config.top_layout();
        let bottom = config.bottom_layout();
        assert_eq!(top.radius, bottom.radius);
        assert_eq!(top.y_offset, 3.85);
        assert_eq!(bottom.y_offset, -3.45);
    }

    #[test]
    fn test_validate_catches_zero_segments() {
        let config = CarouselConfig {
            arc_segments: 0,
            ..CarouselConfig::default()
        };
        assert_eq!(config.validate(), Err(GeometryError::NoArcSegments));
    }
}
