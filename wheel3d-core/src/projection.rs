//! Camera, projection and pointer ray utilities
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::ray::Ray;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 50f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Place the camera on the Z axis looking towards -Z
    pub fn look_down_z(&mut self, z: f32) {
        self.position = Point3::new(0.0, 0.0, z);
        self.target = Point3::new(0.0, 0.0, z - 1.0);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Cast a ray from the camera through a normalized device coordinate.
    ///
    /// `ndc` is in `[-1, 1]` on both axes with +Y up. Returns `None` when the
    /// view-projection matrix is singular.
    pub fn ray_from_ndc(&self, ndc: Point2<f32>) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 1.0));

        let origin = match self.mode {
            ProjectionMode::Perspective => self.position,
            ProjectionMode::Orthographic => near,
        };
        Ray::new(origin, far - near)
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        self.project_with(&self.view_projection(), point, model_matrix, width, height)
    }

    /// Same as [`Self::project_to_screen`] with a precomputed view-projection
    pub fn project_with(
        &self,
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let world = model_matrix.transform_point(point);
        let clip = view_projection * world.to_homogeneous();

        // Behind the eye or degenerate
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let mut camera = Camera::new(800, 600);
        camera.look_down_z(2.0);
        let ray = camera.ray_from_ndc(Point2::new(0.0, 0.0)).unwrap();
        assert!((ray.origin - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-5);
        assert!((ray.direction.into_inner() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_ray_hits_projected_point() {
        let mut camera = Camera::new(640, 480);
        camera.look_down_z(2.0);
        let point = Point3::new(0.4, -0.3, -1.0);
        let (sx, sy, _) = camera
            .project_to_screen(&point, &Matrix4::identity(), 640, 480)
            .unwrap();

        let ndc = Point2::new(sx / 640.0 * 2.0 - 1.0, 1.0 - sy / 480.0 * 2.0);
        let ray = camera.ray_from_ndc(ndc).unwrap();
        let t = (point.z - ray.origin.z) / ray.direction.z;
        let hit = ray.origin + ray.direction.into_inner() * t;
        assert!((hit - point).norm() < 1e-3);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let mut camera = Camera::new(800, 800);
        camera.mode = ProjectionMode::Orthographic;
        let a = camera.ray_from_ndc(Point2::new(-0.5, 0.5)).unwrap();
        let b = camera.ray_from_ndc(Point2::new(0.7, -0.2)).unwrap();
        assert!((a.direction.into_inner() - b.direction.into_inner()).norm() < 1e-4);
        assert!((a.origin - b.origin).norm() > 0.1);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let mut camera = Camera::new(800, 600);
        camera.look_down_z(2.0);
        let behind = Point3::new(0.0, 0.0, 4.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }
}
