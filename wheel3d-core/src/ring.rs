//! Evenly spaced rings of textured quads
use std::f32::consts::TAU;
use std::sync::Arc;

use nalgebra::Vector3;

use crate::error::{CarouselError, CarouselResult};
use crate::geometry::QuadGeometry;
use crate::texture::Material;
use crate::transform::Transform;

/// Placement parameters for one ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub radius: f32,
    /// Z of every element in ring space
    pub depth: f32,
    /// Rigid vertical move of the whole ring group
    pub y_offset: f32,
}

/// One textured quad placed on a ring
#[derive(Debug, Clone)]
pub struct RingElement<T> {
    geometry: Arc<QuadGeometry>,
    pub material: Material<T>,
    pub transform: Transform,
    /// Whether the last hover pass picked this element
    pub hovered: bool,
}

impl<T> RingElement<T> {
    pub fn geometry(&self) -> &QuadGeometry {
        &self.geometry
    }

    /// True when this element points at the given geometry instance
    pub fn shares_geometry(&self, geometry: &Arc<QuadGeometry>) -> bool {
        Arc::ptr_eq(&self.geometry, geometry)
    }

    pub fn highlight(&mut self, opacity: f32) {
        self.material.highlight(opacity);
        self.hovered = true;
    }

    pub fn reset(&mut self) {
        self.material.reset();
        self.hovered = false;
    }
}

/// Elements distributed around a circle under one rotatable group transform
#[derive(Debug, Clone)]
pub struct Ring<T> {
    group: Transform,
    elements: Vec<RingElement<T>>,
}

impl<T> Ring<T> {
    /// Place one element per texture at `i * 2pi / n` around the ring.
    ///
    /// `expected` is the number of sources the textures were loaded for; a
    /// short or long texture list aborts construction.
    pub fn build(
        textures: Vec<T>,
        expected: usize,
        geometry: &Arc<QuadGeometry>,
        layout: &RingLayout,
    ) -> CarouselResult<Self> {
        if textures.len() != expected {
            return Err(CarouselError::TextureCount {
                expected,
                actual: textures.len(),
            });
        }
        if expected == 0 {
            return Err(CarouselError::EmptyRing);
        }

        let interval = TAU / expected as f32;
        let elements = textures
            .into_iter()
            .enumerate()
            .map(|(i, texture)| {
                let (sin, cos) = (interval * i as f32).sin_cos();
                RingElement {
                    geometry: Arc::clone(geometry),
                    material: Material::new(texture),
                    transform: Transform::from_translation(
                        layout.radius * cos,
                        layout.radius * sin,
                        layout.depth,
                    ),
                    hovered: false,
                }
            })
            .collect();

        let mut group = Transform::identity();
        group.translate_y(layout.y_offset);

        Ok(Self { group, elements })
    }

    pub fn group(&self) -> &Transform {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut Transform {
        &mut self.group
    }

    /// Move the whole ring vertically without touching its elements
    pub fn set_offset(&mut self, y_offset: f32) {
        self.group.translation = Vector3::new(0.0, y_offset, 0.0);
    }

    /// Accumulated spin of the ring group
    pub fn angle(&self) -> f32 {
        self.group.angle_z()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[RingElement<T>] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [RingElement<T>] {
        &mut self.elements
    }

    /// Index of the element currently marked hovered, if any
    pub fn hovered(&self) -> Option<usize> {
        self.elements.iter().position(|e| e.hovered)
    }
}
