//! ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point2};
use std::io::Write;
use std::sync::Arc;
use wheel3d_core::{Bitmap, Camera, Carousel, QuadGeometry, RingId};

/// Character luminosity ramp for texture shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph drawn where an element covers a cell but its texel is black
const FLOOR_GLYPH: char = '.';

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: u32 = 2;

/// Screen-space vertex: position, depth and texture coordinate
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    uv: Point2<f32>,
}

/// ASCII renderer that converts carousel elements to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Character at a cell, for inspection
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn render_carousel(&mut self, carousel: &Carousel<Arc<Bitmap>>, camera: &Camera) {
        let view_projection = camera.view_projection();
        for id in RingId::ALL {
            let worlds = carousel.world_matrices(id);
            for (element, world) in carousel.ring(id).elements().iter().zip(worlds) {
                self.render_quad(
                    carousel.geometry(),
                    &world,
                    camera,
                    &view_projection,
                    &element.material.texture,
                    element.material.opacity,
                );
            }
        }
    }

    fn render_quad(
        &mut self,
        geometry: &QuadGeometry,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        view_projection: &Matrix4<f32>,
        texture: &Bitmap,
        opacity: f32,
    ) {
        'triangles: for (triangle, uvs) in geometry.triangles().zip(geometry.uv_triangles()) {
            let mut screen = [ScreenVertex {
                x: 0.0,
                y: 0.0,
                depth: 0.0,
                uv: Point2::origin(),
            }; 3];
            for (slot, (position, uv)) in screen.iter_mut().zip(triangle.iter().zip(uvs)) {
                match camera.project_with(
                    view_projection,
                    position,
                    model_matrix,
                    self.width as u32,
                    self.height as u32,
                ) {
                    Some((x, y, depth)) => {
                        *slot = ScreenVertex { x, y, depth, uv };
                    }
                    None => continue 'triangles, // Triangle is clipped
                }
            }
            self.rasterize_triangle(&screen, texture, opacity);
        }
    }

    fn rasterize_triangle(&mut self, v: &[ScreenVertex; 3], texture: &Bitmap, opacity: f32) {
        let (v0, v1, v2) = (v[0], v[1], v[2]);

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // Interpolate depth
                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let u = w0 * v0.uv.x + w1 * v1.uv.x + w2 * v2.uv.x;
                let tv = w0 * v0.uv.y + w1 * v1.uv.y + w2 * v2.uv.y;
                let brightness = texture.sample(u, tv) * opacity;

                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = shade(brightness);
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map `[0, 1]` brightness onto the ramp; covered cells never render blank
fn shade(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    match LUMINOSITY_RAMP[index.min(last)] {
        ' ' => FLOOR_GLYPH,
        c => c,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheel3d_core::CarouselConfig;

    fn centred_carousel(texel: u8) -> Carousel<Arc<Bitmap>> {
        // top element 1 lands straight in front of the camera
        let config = CarouselConfig {
            top_offset: -3.0,
            bottom_offset: 40.0,
            ..CarouselConfig::default()
        };
        let bitmap = Arc::new(Bitmap::new(1, 1, vec![texel]).unwrap());
        Carousel::build(&config, vec![bitmap; 4]).unwrap()
    }

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(width, height * CELL_ASPECT);
        camera.look_down_z(2.0);
        camera
    }

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-5);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }

    #[test]
    fn test_shade_never_blank() {
        assert_eq!(shade(0.0), FLOOR_GLYPH);
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(7.0), '@');
    }

    #[test]
    fn test_element_covers_screen_centre() {
        let carousel = centred_carousel(255);
        let mut renderer = AsciiRenderer::new(80, 24);
        renderer.render_carousel(&carousel, &camera(80, 24));
        assert_eq!(renderer.glyph(40, 12), Some('@'));
        assert_eq!(renderer.glyph(0, 0), Some(' '));
    }

    #[test]
    fn test_highlight_dims_element() {
        let mut carousel = centred_carousel(255);
        carousel.ring_mut(RingId::Top).elements_mut()[1].highlight(0.1);
        let mut renderer = AsciiRenderer::new(80, 24);
        renderer.render_carousel(&carousel, &camera(80, 24));
        assert_eq!(renderer.glyph(40, 12), Some('.'));
    }

    #[test]
    fn test_clear_resets_buffers() {
        let carousel = centred_carousel(255);
        let mut renderer = AsciiRenderer::new(40, 12);
        renderer.render_carousel(&carousel, &camera(40, 12));
        renderer.clear();
        assert!((0..12).all(|y| (0..40).all(|x| renderer.glyph(x, y) == Some(' '))));
    }
}
