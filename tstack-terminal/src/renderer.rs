/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use tstack_core::{Channel, MatrixSink, Mesh, Transform, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Width over height of one terminal cell
const CELL_ASPECT: f32 = 0.5;

/// ASCII renderer that converts 3D meshes to terminal characters.
///
/// The renderer plays the part of a shader program: matrices arrive through
/// [`MatrixSink`] under the `model`, `view` and `projection` uniform names and
/// stay in effect until replaced.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    color: Color,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::White; size],
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            color: Color::White,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Viewport aspect ratio, corrected for tall terminal cells
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 * CELL_ASPECT / self.height as f32
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        debug!("renderer resized to {}x{}", width, height);
        *self = Self {
            model: self.model,
            view: self.view,
            projection: self.projection,
            color: self.color,
            ..Self::new(width, height)
        };
    }

    /// Color used for everything drawn until the next call
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::White);
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        let mvp = Transform::mvp_matrix(&self.model, &self.view, &self.projection);
        // Faces of a collapsed object have no usable orientation; draw them mid-tone.
        let normals = Transform::normal_matrix(&self.view, &self.model);

        for triangle in &mesh.triangles {
            let brightness = normals.map_or(0.5, |normals| {
                let normal = (normals * triangle.calculate_normal())
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                // Headlight: the light sits at the eye, looking down -z.
                normal.dot(&Vector3::z()).abs()
            });
            self.render_triangle(triangle, &mvp, brightness);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, mvp: &Matrix4<f32>, brightness: f32) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project_to_screen(mvp, &vertex.position) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        // Skip the blank first ramp entry so lit faces never vanish.
        let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
        let char_index = 1 + (brightness.clamp(0.0, 1.0) * steps).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, character);
    }

    /// Project an object-space point to screen space, keeping NDC depth.
    ///
    /// Points behind the eye or outside the depth range are rejected; x and y
    /// may fall off screen and are clipped during rasterization.
    fn project_to_screen(&self, mvp: &Matrix4<f32>, point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;

        Some((screen_x, screen_y, ndc.z))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = self.color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl MatrixSink for AsciiRenderer {
    fn upload_matrix(&mut self, name: &str, matrix: &Matrix4<f32>) {
        let slot = match name {
            n if n == Channel::Model.uniform_name() => &mut self.model,
            n if n == Channel::View.uniform_name() => &mut self.view,
            n if n == Channel::Projection.uniform_name() => &mut self.projection,
            other => {
                debug!("ignoring upload to unknown uniform `{}`", other);
                return;
            }
        };
        *slot = *matrix;
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
    use tstack_core::{OrbitCamera, ProjectionSettings, TransformStack};

    fn lit_cells(renderer: &AsciiRenderer) -> usize {
        (0..renderer.height())
            .flat_map(|y| (0..renderer.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.cell(x, y) != Some(' '))
            .count()
    }

    fn camera_ready(renderer: &mut AsciiRenderer) {
        let mut view = TransformStack::new();
        let mut projection = TransformStack::new();
        OrbitCamera::default().apply(&mut view, renderer).unwrap();
        let aspect = renderer.aspect();
        ProjectionSettings::default()
            .apply(&mut projection, aspect, 5.0, renderer)
            .unwrap();
    }

    #[test]
    fn test_uploads_set_uniforms() {
        let mut renderer = AsciiRenderer::new(8, 4);
        let matrix = Transform::translation(&Vector3::new(1.0, 2.0, 3.0));
        renderer.upload_matrix("model", &matrix);
        renderer.upload_matrix("globalColor", &Matrix4::zeros());
        assert_eq!(renderer.model, matrix);
        assert_eq!(renderer.view, Matrix4::identity());
    }

    #[test]
    fn test_cube_is_visible_in_front_of_camera() {
        let mut renderer = AsciiRenderer::new(60, 30);
        camera_ready(&mut renderer);
        renderer.draw_mesh(&Mesh::cube(2.0));
        assert!(lit_cells(&renderer) > 0);
        assert_ne!(renderer.cell(30, 15), Some(' '));
    }

    #[test]
    fn test_model_translation_moves_object_off_screen() {
        let mut renderer = AsciiRenderer::new(60, 30);
        camera_ready(&mut renderer);

        let mut model = TransformStack::new();
        model.push_identity();
        model.translate(&Vector3::new(0.0, 0.0, 10.0));
        renderer.upload_matrix("model", &model.top());
        model.pop().unwrap();

        renderer.draw_mesh(&Mesh::cube(0.5));
        assert_eq!(lit_cells(&renderer), 0);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut renderer = AsciiRenderer::new(20, 10);
        camera_ready(&mut renderer);
        renderer.draw_mesh(&Mesh::cube(2.0));
        renderer.clear();
        assert_eq!(lit_cells(&renderer), 0);

        let view = renderer.view;
        renderer.resize(40, 12);
        assert_eq!((renderer.width(), renderer.height()), (40, 12));
        assert_eq!(renderer.view, view);
        assert!((renderer.aspect() - 40.0 * 0.5 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_draw_emits_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("   \r\n   "));
    }
}
