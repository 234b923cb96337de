//! Rounded-corner quad geometry shared by every carousel element
use nalgebra::{Point2, Point3};
use std::f32::consts::TAU;

use crate::error::GeometryError;

/// Triangles covering the cross-shaped body between the four corners
pub const BODY_TRIANGLES: usize = 6;

/// Flat, triangle-list buffers for one rounded rectangle centered at the origin.
///
/// `positions` holds xyz triples and `uvs` holds uv pairs; entry `k` of one
/// buffer always describes the same vertex as entry `k` of the other, and
/// every three consecutive vertices form one counter-clockwise triangle
/// facing +Z.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    positions: Vec<f32>,
    uvs: Vec<f32>,
}

/// Check the preconditions of [`QuadGeometry::rounded_rect`] without building anything.
pub fn validate_rounded_rect(
    width: f32,
    height: f32,
    radius: f32,
    segments: usize,
) -> Result<(), GeometryError> {
    if segments == 0 {
        return Err(GeometryError::NoArcSegments);
    }
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(GeometryError::NonPositiveExtent { width, height });
    }
    let limit = width.min(height) / 2.0;
    if !(radius >= 0.0 && radius < limit) {
        return Err(GeometryError::RadiusOutOfRange { radius, limit });
    }
    Ok(())
}

impl QuadGeometry {
    /// Tessellate a `width` x `height` rectangle whose corners are quarter
    /// circles of `radius`, each swept in `segments` wedges.
    ///
    /// The body is the rectangle minus its corner squares, split into three
    /// axis-aligned strips of two triangles each. Each corner is a fan around
    /// its inner anchor point. Texture coordinates are the positions mapped
    /// linearly onto `[0, 1]`, so the image is not distorted at the corners.
    pub fn rounded_rect(
        width: f32,
        height: f32,
        radius: f32,
        segments: usize,
    ) -> Result<Self, GeometryError> {
        validate_rounded_rect(width, height, radius, segments)?;

        let r = radius;
        let wi = width / 2.0 - r;
        let hi = height / 2.0 - r;
        let w2 = width / 2.0;
        let h2 = height / 2.0;
        let ul = r / width;
        let ur = (width - r) / width;
        let vl = r / height;
        let vh = (height - r) / height;

        let vertices = (BODY_TRIANGLES + 4 * segments) * 3;
        let mut positions = Vec::with_capacity(vertices * 3);
        let mut uvs = Vec::with_capacity(vertices * 2);

        // Centre strip spanning the full height
        positions.extend_from_slice(&[
            -wi, -h2, 0.0, wi, -h2, 0.0, wi, h2, 0.0, //
            -wi, -h2, 0.0, wi, h2, 0.0, -wi, h2, 0.0,
        ]);
        uvs.extend_from_slice(&[ul, 0.0, ur, 0.0, ur, 1.0, ul, 0.0, ur, 1.0, ul, 1.0]);

        // Left strip
        positions.extend_from_slice(&[
            -w2, -hi, 0.0, -wi, -hi, 0.0, -wi, hi, 0.0, //
            -w2, -hi, 0.0, -wi, hi, 0.0, -w2, hi, 0.0,
        ]);
        uvs.extend_from_slice(&[0.0, vl, ul, vl, ul, vh, 0.0, vl, ul, vh, 0.0, vh]);

        // Right strip
        positions.extend_from_slice(&[
            wi, -hi, 0.0, w2, -hi, 0.0, w2, hi, 0.0, //
            wi, -hi, 0.0, w2, hi, 0.0, wi, hi, 0.0,
        ]);
        uvs.extend_from_slice(&[ur, vl, 1.0, vl, 1.0, vh, ur, vl, 1.0, vh, ur, vh]);

        // Corner fans, swept counter-clockwise starting at the top-right corner
        let wedges = 4 * segments;
        let mut phi_a = 0.0_f32;
        for i in 0..wedges {
            let phi_b = TAU * (i + 1) as f32 / wedges as f32;
            let (sin_a, cos_a) = phi_a.sin_cos();
            let (sin_b, cos_b) = phi_b.sin_cos();

            let right = i < segments || i >= 3 * segments;
            let upper = i < 2 * segments;

            let xc = if right { wi } else { -wi };
            let yc = if upper { hi } else { -hi };
            positions.extend_from_slice(&[
                xc,
                yc,
                0.0,
                xc + r * cos_a,
                yc + r * sin_a,
                0.0,
                xc + r * cos_b,
                yc + r * sin_b,
                0.0,
            ]);

            let uc = if right { ur } else { ul };
            let vc = if upper { vh } else { vl };
            uvs.extend_from_slice(&[
                uc,
                vc,
                uc + ul * cos_a,
                vc + vl * sin_a,
                uc + ul * cos_b,
                vc + vl * sin_b,
            ]);

            phi_a = phi_b;
        }

        log::debug!(
            "built rounded quad {}x{} r={} segments={} ({} vertices)",
            width,
            height,
            radius,
            segments,
            positions.len() / 3
        );

        Ok(Self { positions, uvs })
    }

    /// Interleaved xyz positions, ready for upload
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Interleaved uv pairs, ready for upload
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Iterate triangles as position triples in local space
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.positions.chunks_exact(9).map(|t| {
            [
                Point3::new(t[0], t[1], t[2]),
                Point3::new(t[3], t[4], t[5]),
                Point3::new(t[6], t[7], t[8]),
            ]
        })
    }

    /// Iterate triangles as uv triples, matched with [`Self::triangles`]
    pub fn uv_triangles(&self) -> impl Iterator<Item = [Point2<f32>; 3]> + '_ {
        self.uvs.chunks_exact(6).map(|t| {
            [
                Point2::new(t[0], t[1]),
                Point2::new(t[2], t[3]),
                Point2::new(t[4], t[5]),
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn signed_area(t: &[Point3<f32>; 3]) -> f32 {
        let e1 = t[1] - t[0];
        let e2 = t[2] - t[0];
        0.5 * (e1.x * e2.y - e1.y * e2.x)
    }

    #[test]
    fn test_reference_quad_counts() {
        let quad = QuadGeometry::rounded_rect(1.0, 1.0, 0.05, 10).unwrap();
        // 6 body triangles + 40 corner wedges, 3 vertices each
        assert_eq!(quad.vertex_count(), 138);
        assert_eq!(quad.positions().len(), 138 * 3);
        assert_eq!(quad.uvs().len(), 138 * 2);
        assert_eq!(quad.triangle_count(), 46);
    }

    #[test]
    fn test_buffers_stay_matched() {
        for &(w, h, r) in &[(1.0, 1.0, 0.05), (2.0, 0.5, 0.2), (0.3, 4.0, 0.0)] {
            for s in 1..6 {
                let quad = QuadGeometry::rounded_rect(w, h, r, s).unwrap();
                let vertices = quad.positions().len() / 3;
                assert_eq!(vertices, quad.uvs().len() / 2);
                assert!(vertices > 0);
                assert_eq!(vertices % 3, 0);
            }
        }
    }

    #[test]
    fn test_each_segment_adds_twelve_vertices() {
        let mut previous = QuadGeometry::rounded_rect(1.0, 0.8, 0.1, 1)
            .unwrap()
            .vertex_count();
        for s in 2..20 {
            let count = QuadGeometry::rounded_rect(1.0, 0.8, 0.1, s)
                .unwrap()
                .vertex_count();
            assert_eq!(count, previous + 12);
            previous = count;
        }
    }

    #[test]
    fn test_uvs_are_linear_in_position() {
        let (w, h) = (1.6, 0.9);
        let quad = QuadGeometry::rounded_rect(w, h, 0.15, 7).unwrap();
        for (p, uv) in quad.positions().chunks(3).zip(quad.uvs().chunks(2)) {
            assert!((uv[0] - (p[0] / w + 0.5)).abs() < 1e-5);
            assert!((uv[1] - (p[1] / h + 0.5)).abs() < 1e-5);
            assert!((-1e-6..=1.0 + 1e-6).contains(&uv[0]));
            assert!((-1e-6..=1.0 + 1e-6).contains(&uv[1]));
        }
    }

    #[test]
    fn test_triangles_face_forward() {
        let quad = QuadGeometry::rounded_rect(1.0, 1.0, 0.25, 4).unwrap();
        for tri in quad.triangles() {
            assert!(signed_area(&tri) > 0.0);
            assert!(tri.iter().all(|p| p.z == 0.0));
        }
    }

    #[test]
    fn test_area_approaches_rounded_rectangle() {
        let (w, h, r) = (2.0, 1.0, 0.3);
        let quad = QuadGeometry::rounded_rect(w, h, r, 128).unwrap();
        let area: f32 = quad.triangles().map(|t| signed_area(&t)).sum();
        let expected = w * h - (4.0 - PI) * r * r;
        assert!((area - expected).abs() < 1e-3);
    }

    #[test]
    fn test_zero_segments_rejected() {
        assert_eq!(
            QuadGeometry::rounded_rect(1.0, 1.0, 0.05, 0),
            Err(GeometryError::NoArcSegments)
        );
    }

    #[test]
    fn test_radius_limit() {
        assert!(matches!(
            QuadGeometry::rounded_rect(1.0, 2.0, 0.5, 4),
            Err(GeometryError::RadiusOutOfRange { .. })
        ));
        assert!(matches!(
            QuadGeometry::rounded_rect(1.0, 1.0, -0.1, 4),
            Err(GeometryError::RadiusOutOfRange { .. })
        ));
        assert!(QuadGeometry::rounded_rect(1.0, 2.0, 0.49, 4).is_ok());
    }

    #[test]
    fn test_non_positive_extent_rejected() {
        assert!(matches!(
            QuadGeometry::rounded_rect(0.0, 1.0, 0.0, 1),
            Err(GeometryError::NonPositiveExtent { .. })
        ));
        assert!(matches!(
            QuadGeometry::rounded_rect(1.0, f32::NAN, 0.0, 1),
            Err(GeometryError::NonPositiveExtent { .. })
        ));
    }
}
