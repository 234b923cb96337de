//! Per-frame pointer hover highlighting
use nalgebra::Point2;

use crate::carousel::{Carousel, RingId};
use crate::config::CarouselConfig;
use crate::projection::Camera;
use crate::ray::{intersect_all, Ray};
use crate::ring::Ring;

/// Normalized pointer position, `[-1, 1]` on both axes with +Y up
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    ndc: Option<Point2<f32>>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a pixel position (origin top-left) within a `width` x `height` viewport
    pub fn from_screen(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut pointer = Self::new();
        if width > 0.0 && height > 0.0 {
            pointer.set(Point2::new(x / width * 2.0 - 1.0, 1.0 - y / height * 2.0));
        }
        pointer
    }

    pub fn set(&mut self, ndc: Point2<f32>) {
        self.ndc = Some(Point2::new(ndc.x.clamp(-1.0, 1.0), ndc.y.clamp(-1.0, 1.0)));
    }

    /// Pointer left the viewport
    pub fn clear(&mut self) {
        self.ndc = None;
    }

    pub fn ndc(&self) -> Option<Point2<f32>> {
        self.ndc
    }
}

/// Hovered element per ring after one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    pub top: Option<usize>,
    pub bottom: Option<usize>,
}

impl HoverState {
    pub fn get(&self, id: RingId) -> Option<usize> {
        match id {
            RingId::Top => self.top,
            RingId::Bottom => self.bottom,
        }
    }
}

/// Recomputes every element's highlight from scratch each frame.
///
/// Each ring is tested on its own: the nearest element of that ring under the
/// ray turns transparent, every other element of the ring is opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverDetector {
    opacity: f32,
}

impl HoverDetector {
    pub fn new(opacity: f32) -> Self {
        Self { opacity }
    }

    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.hover_opacity)
    }

    /// Run one frame: cast from the pointer through `camera` and update both rings
    pub fn update<T>(
        &self,
        camera: &Camera,
        pointer: &PointerState,
        carousel: &mut Carousel<T>,
    ) -> HoverState {
        let ray = pointer.ndc().and_then(|ndc| camera.ray_from_ndc(ndc));
        self.update_with_ray(ray.as_ref(), carousel)
    }

    /// Same as [`Self::update`] with an explicit ray; `None` counts as a miss
    pub fn update_with_ray<T>(&self, ray: Option<&Ray>, carousel: &mut Carousel<T>) -> HoverState {
        let mut state = HoverState::default();
        for id in RingId::ALL {
            let hit = ray.and_then(|ray| {
                let hits = intersect_all(ray, carousel.geometry(), carousel.world_matrices(id));
                hits.first().map(|hit| hit.element)
            });
            apply(self.opacity, carousel.ring_mut(id), hit);
            match id {
                RingId::Top => state.top = hit,
                RingId::Bottom => state.bottom = hit,
            }
        }
        state
    }
}

impl Default for HoverDetector {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

fn apply<T>(opacity: f32, ring: &mut Ring<T>, hit: Option<usize>) {
    for (index, element) in ring.elements_mut().iter_mut().enumerate() {
        if Some(index) == hit {
            element.highlight(opacity);
        } else {
            element.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    /// Three elements on a ring centred at the origin, no vertical offsets
    fn flat_carousel() -> Carousel<char> {
        let config = CarouselConfig {
            top_offset: 0.0,
            bottom_offset: 0.0,
            ..CarouselConfig::default()
        };
        Carousel::build(&config, vec!['a', 'b', 'c']).unwrap()
    }

    fn ray_at(carousel: &Carousel<char>, id: RingId, index: usize) -> Ray {
        let target = carousel.element_world(id, index).unwrap().translation;
        Ray::new(Point3::new(target.x, target.y, 5.0), -Vector3::z()).unwrap()
    }

    fn opaque(carousel: &Carousel<char>, id: RingId) -> Vec<bool> {
        carousel
            .ring(id)
            .elements()
            .iter()
            .map(|e| e.material.is_opaque())
            .collect()
    }

    #[test]
    fn test_hit_highlights_only_that_element() {
        let mut carousel = flat_carousel();
        let detector = HoverDetector::default();
        let ray = ray_at(&carousel, RingId::Top, 1);

        let state = detector.update_with_ray(Some(&ray), &mut carousel);
        assert_eq!(state.top, Some(1));
        assert_eq!(opaque(&carousel, RingId::Top), vec![true, false, true]);
        let b = &carousel.ring(RingId::Top).elements()[1];
        assert!((b.material.opacity - 0.1).abs() < 1e-6);
        assert!(b.hovered);

        let state = detector.update_with_ray(None, &mut carousel);
        assert_eq!(state, HoverState::default());
        assert_eq!(opaque(&carousel, RingId::Top), vec![true, true, true]);
        assert_eq!(carousel.ring(RingId::Top).hovered(), None);
    }

    #[test]
    fn test_moving_between_elements_leaves_nothing_stale() {
        let mut carousel = flat_carousel();
        let detector = HoverDetector::default();

        let first = ray_at(&carousel, RingId::Top, 0);
        detector.update_with_ray(Some(&first), &mut carousel);
        let second = ray_at(&carousel, RingId::Top, 2);
        detector.update_with_ray(Some(&second), &mut carousel);

        assert_eq!(opaque(&carousel, RingId::Top), vec![true, true, false]);
    }

    #[test]
    fn test_rings_are_tested_independently() {
        let mut config = CarouselConfig::default();
        config.top_offset = 0.0;
        config.bottom_offset = 20.0;
        let mut carousel = Carousel::build(&config, vec!['a', 'b', 'c']).unwrap();
        let detector = HoverDetector::default();

        let ray = ray_at(&carousel, RingId::Bottom, 2);
        let state = detector.update_with_ray(Some(&ray), &mut carousel);
        assert_eq!(state.top, None);
        assert_eq!(state.bottom, Some(2));
        assert_eq!(opaque(&carousel, RingId::Top), vec![true, true, true]);
        assert_eq!(opaque(&carousel, RingId::Bottom), vec![true, true, false]);
    }

    #[test]
    fn test_overlapping_rings_each_pick_their_own() {
        // identical placement: the same ray hits element 1 of both rings
        let mut carousel = flat_carousel();
        let detector = HoverDetector::default();
        let ray = ray_at(&carousel, RingId::Top, 1);
        let state = detector.update_with_ray(Some(&ray), &mut carousel);
        assert_eq!(state.get(RingId::Top), Some(1));
        assert_eq!(state.get(RingId::Bottom), Some(1));
    }

    #[test]
    fn test_camera_pointer_over_element() {
        let config = CarouselConfig {
            top_offset: -3.0,
            bottom_offset: 30.0,
            ..CarouselConfig::default()
        };
        // top element 1 sits at (0, 3, -1) in ring space, i.e. straight ahead
        let mut carousel = Carousel::build(&config, vec!['a', 'b', 'c', 'd']).unwrap();
        let mut camera = Camera::new(800, 600);
        camera.look_down_z(config.camera_z);

        let mut pointer = PointerState::new();
        pointer.set(Point2::new(0.0, 0.0));
        let state = HoverDetector::default().update(&camera, &pointer, &mut carousel);
        assert_eq!(state.top, Some(1));

        pointer.clear();
        let state = HoverDetector::default().update(&camera, &pointer, &mut carousel);
        assert_eq!(state.top, None);
    }

    #[test]
    fn test_pointer_from_screen() {
        let pointer = PointerState::from_screen(0.0, 0.0, 200.0, 100.0);
        assert_eq!(pointer.ndc(), Some(Point2::new(-1.0, 1.0)));
        let pointer = PointerState::from_screen(150.0, 75.0, 200.0, 100.0);
        assert_eq!(pointer.ndc(), Some(Point2::new(0.5, -0.5)));
        assert_eq!(PointerState::from_screen(1.0, 1.0, 0.0, 0.0).ndc(), None);
    }
}
