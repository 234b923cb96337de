//! Wheel input to ring rotation
use crate::carousel::Carousel;
use crate::config::CarouselConfig;

/// Turns raw wheel deltas into ring spin.
///
/// Each event spins both ring groups by `-increment` and every element by
/// `+increment`, so images orbit with their ring while staying level.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollController {
    divisor: f32,
    scale: f32,
    last_increment: f32,
}

impl ScrollController {
    pub fn new(divisor: f32, scale: f32) -> Self {
        Self {
            divisor,
            scale,
            last_increment: 0.0,
        }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.scroll_divisor, config.scroll_scale)
    }

    /// Angular increment (radians) for a raw vertical wheel delta
    pub fn increment_for(&self, delta_y: f32) -> f32 {
        delta_y / self.divisor * self.scale
    }

    /// Increment computed by the most recent event
    pub fn last_increment(&self) -> f32 {
        self.last_increment
    }

    /// Handle one wheel event. Returns the applied increment.
    pub fn on_wheel<T>(&mut self, delta_y: f32, carousel: &mut Carousel<T>) -> f32 {
        let increment = self.increment_for(delta_y);
        self.last_increment = increment;
        apply_increment(carousel, increment);
        log::debug!("wheel delta {} -> spin {:.4} rad", delta_y, increment);
        increment
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

/// Spin both rings by `-increment` and counter-rotate each element by `+increment`
pub fn apply_increment<T>(carousel: &mut Carousel<T>, increment: f32) {
    for ring in carousel.rings_mut() {
        ring.group_mut().rotate_z(-increment);
    }
    for ring in carousel.rings_mut() {
        for element in ring.elements_mut() {
            element.transform.rotate_z(increment);
        }
    }
}
