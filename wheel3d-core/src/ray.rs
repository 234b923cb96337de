//! Ray casting against shared quad geometry
use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::geometry::QuadGeometry;

const EPSILON: f32 = 1e-7;

/// A half-line with a unit direction; distances along it are world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

/// One element hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index of the element within the tested set
    pub element: usize,
    pub distance: f32,
}

impl Ray {
    /// Returns `None` for a zero-length direction
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        Some(Self {
            origin,
            direction: Unit::try_new(direction, EPSILON)?,
        })
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * distance
    }

    /// Möller-Trumbore test, double sided. Returns the hit distance.
    pub fn intersect_triangle(&self, triangle: &[Point3<f32>; 3]) -> Option<f32> {
        let edge1 = triangle[1] - triangle[0];
        let edge2 = triangle[2] - triangle[0];
        let p = self.direction.cross(&edge2);
        let det = edge1.dot(&p);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - triangle[0];
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = self.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&q) * inv_det;
        (t > EPSILON).then_some(t)
    }

    /// Nearest hit against every triangle of `geometry` placed by `world`
    pub fn intersect_geometry(&self, geometry: &QuadGeometry, world: &Matrix4<f32>) -> Option<f32> {
        geometry
            .triangles()
            .filter_map(|tri| {
                let placed = [
                    world.transform_point(&tri[0]),
                    world.transform_point(&tri[1]),
                    world.transform_point(&tri[2]),
                ];
                self.intersect_triangle(&placed)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Test one ray against a set of placements sharing `geometry`.
///
/// Hits come back sorted nearest first, one entry per element.
pub fn intersect_all<I>(ray: &Ray, geometry: &QuadGeometry, worlds: I) -> Vec<Intersection>
where
    I: IntoIterator<Item = Matrix4<f32>>,
{
    let mut hits: Vec<Intersection> = worlds
        .into_iter()
        .enumerate()
        .filter_map(|(element, world)| {
            ray.intersect_geometry(geometry, &world)
                .map(|distance| Intersection { element, distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
