//! Two vertically offset rings sharing one quad geometry
use std::sync::Arc;

use nalgebra::Matrix4;

use crate::config::CarouselConfig;
use crate::error::CarouselResult;
use crate::geometry::QuadGeometry;
use crate::ring::Ring;
use crate::transform::Transform;

/// Which of the two rings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingId {
    Top,
    Bottom,
}

impl RingId {
    pub const ALL: [RingId; 2] = [RingId::Top, RingId::Bottom];
}

/// The wheel carousel scene: one group owning the top and bottom rings
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    geometry: Arc<QuadGeometry>,
    group: Transform,
    top: Ring<T>,
    bottom: Ring<T>,
}

impl<T: Clone> Carousel<T> {
    /// Build the geometry once, then both rings from it.
    ///
    /// Each texture is bound to one element of each ring; the two elements get
    /// separate materials so their hover state never leaks across rings.
    pub fn build(config: &CarouselConfig, textures: Vec<T>) -> CarouselResult<Self> {
        let geometry = Arc::new(QuadGeometry::rounded_rect(
            config.quad_width,
            config.quad_height,
            config.corner_radius,
            config.arc_segments,
        )?);

        let count = textures.len();
        let top = Ring::build(textures.clone(), count, &geometry, &config.top_layout())?;
        let bottom = Ring::build(textures, count, &geometry, &config.bottom_layout())?;

        log::info!(
            "carousel built: {} elements per ring, {} vertices shared",
            count,
            geometry.vertex_count()
        );

        Ok(Self {
            geometry,
            group: Transform::identity(),
            top,
            bottom,
        })
    }
}

impl<T> Carousel<T> {
    pub fn geometry(&self) -> &Arc<QuadGeometry> {
        &self.geometry
    }

    pub fn group(&self) -> &Transform {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut Transform {
        &mut self.group
    }

    pub fn ring(&self, id: RingId) -> &Ring<T> {
        match id {
            RingId::Top => &self.top,
            RingId::Bottom => &self.bottom,
        }
    }

    pub fn ring_mut(&mut self, id: RingId) -> &mut Ring<T> {
        match id {
            RingId::Top => &mut self.top,
            RingId::Bottom => &mut self.bottom,
        }
    }

    /// Both rings, top first
    pub fn rings_mut(&mut self) -> [&mut Ring<T>; 2] {
        [&mut self.top, &mut self.bottom]
    }

    /// Ring group placed in world space
    pub fn ring_world(&self, id: RingId) -> Transform {
        self.group.compose(self.ring(id).group())
    }

    /// World transform of one element: carousel, then ring, then element
    pub fn element_world(&self, id: RingId, index: usize) -> Option<Transform> {
        let element = self.ring(id).elements().get(index)?;
        Some(self.ring_world(id).compose(&element.transform))
    }

    /// World matrices of every element in one ring, in element order
    pub fn world_matrices(&self, id: RingId) -> Vec<Matrix4<f32>> {
        let ring_world = self.ring_world(id);
        self.ring(id)
            .elements()
            .iter()
            .map(|element| ring_world.compose(&element.transform).matrix())
            .collect()
    }

    pub fn element_count(&self) -> usize {
        self.top.len() + self.bottom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_build_shares_one_geometry() {
        let carousel = Carousel::build(&CarouselConfig::default(), vec![0u8; 16]).unwrap();
        assert_eq!(carousel.element_count(), 32);
        assert_eq!(carousel.geometry().vertex_count(), 138);
        // one handle held by the carousel, one per element
        assert_eq!(Arc::strong_count(carousel.geometry()), 33);
        for id in RingId::ALL {
            assert!(carousel
                .ring(id)
                .elements()
                .iter()
                .all(|e| e.shares_geometry(carousel.geometry())));
        }
    }

    #[test]
    fn test_rings_are_offset() {
        let carousel = Carousel::build(&CarouselConfig::default(), vec![(); 4]).unwrap();
        let top = carousel.ring_world(RingId::Top).translation;
        let bottom = carousel.ring_world(RingId::Bottom).translation;
        assert!((top.y - 3.85).abs() < 1e-6);
        assert!((bottom.y + 3.45).abs() < 1e-6);
    }

    #[test]
    fn test_element_world_includes_offset() {
        let carousel = Carousel::build(&CarouselConfig::default(), vec![(); 4]).unwrap();
        // element 1 sits at 90 degrees: (0, 3, -1) in ring space
        let world = carousel.element_world(RingId::Bottom, 1).unwrap();
        assert!(world.translation.x.abs() < 1e-5);
        assert!((world.translation.y - (3.0 - 3.45)).abs() < 1e-5);
        assert!((world.translation.z + 1.0).abs() < 1e-6);
        assert!(carousel.element_world(RingId::Bottom, 4).is_none());
    }

    #[test]
    fn test_moving_the_group_moves_every_element() {
        let mut carousel = Carousel::build(&CarouselConfig::default(), vec![(); 4]).unwrap();
        let before = carousel.element_world(RingId::Top, 2).unwrap().translation;

        carousel.group_mut().translation.z -= 5.0;
        assert!((carousel.group().translation.z + 5.0).abs() < 1e-6);

        let after = carousel.element_world(RingId::Top, 2).unwrap().translation;
        assert!((after - before - Vector3::new(0.0, 0.0, -5.0)).norm() < 1e-5);
        let matrix = carousel.world_matrices(RingId::Top)[2];
        assert!((matrix[(2, 3)] - after.z).abs() < 1e-5);
    }

    #[test]
    fn test_materials_are_independent() {
        let mut carousel = Carousel::build(&CarouselConfig::default(), vec![(); 3]).unwrap();
        carousel.ring_mut(RingId::Top).elements_mut()[0].highlight(0.1);
        assert!(carousel.ring(RingId::Bottom).elements()[0].material.is_opaque());
    }

    #[test]
    fn test_invalid_geometry_aborts() {
        let config = CarouselConfig {
            corner_radius: 0.6,
            ..CarouselConfig::default()
        };
        assert!(Carousel::build(&config, vec![(); 3]).is_err());
    }
}
