//! CPU raster surface for procedural textures.
//!
//! Shapes are tessellated with lyon, the resulting triangles are scan-converted
//! into a coverage mask, and each covered pixel is blended once (source-over).
//! Blending once per shape keeps translucent fills from darkening where
//! tessellated triangles share an edge.
//!
//! ```ignore
//! let mut canvas = Canvas::new(256, 256);
//! canvas.fill_rect(Vec2::ZERO, 256.0, 256.0, Paint::Solid(Color::BLACK));
//! canvas.fill_circle(Vec2::new(128.0, 128.0), 20.0, Paint::Solid(Color::WHITE.with_alpha(0.3)));
//! let texture = canvas.into_texture();
//! ```

use glam::Vec2;
use image::{Rgba, RgbaImage};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use super::image::TextureImage;

/// Straight (non-premultiplied) RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a 0xRRGGBB literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Color from 8-bit channels and a fractional alpha.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Radial gradient from `inner` at `center` to `outer` at `radius` and beyond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub inner: Color,
    pub outer: Color,
}

impl RadialGradient {
    pub fn color_at(&self, p: Vec2) -> Color {
        if self.radius <= 0.0 {
            return self.outer;
        }
        self.inner.lerp(self.outer, p.distance(self.center) / self.radius)
    }
}

/// How a covered pixel is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Radial(RadialGradient),
}

impl Paint {
    fn color_at(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial(g) => g.color_at(p),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

/// Inclusive pixel bounds of the pending coverage.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Bounds {
    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Vertex constructor keeping only positions.
struct PositionCtor;

impl FillVertexConstructor<[f32; 2]> for PositionCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> [f32; 2] {
        vertex.position().to_array()
    }
}

impl StrokeVertexConstructor<[f32; 2]> for PositionCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> [f32; 2] {
        vertex.position().to_array()
    }
}

const EDGE_EPSILON: f32 = 1e-3;

/// Twice the signed area of (a, b, p).
#[inline]
fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Offscreen RGBA raster with 2D-canvas style drawing calls.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: RgbaImage,
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<[f32; 2], u32>,
    mask: Vec<bool>,
    global_alpha: f32,
}

impl Canvas {
    /// A transparent canvas. Zero dimensions are bumped to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: RgbaImage::new(width, height),
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            mask: vec![false; width as usize * height as usize],
            global_alpha: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Multiplier applied to every subsequent draw's alpha.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Fill an axis-aligned rectangle. Pixels whose centres fall inside are covered.
    pub fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, paint: impl Into<Paint>) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let x0 = (pos.x - 0.5).ceil().max(0.0);
        let y0 = (pos.y - 0.5).ceil().max(0.0);
        let x1 = (pos.x + width - 0.5).ceil().min(self.width as f32);
        let y1 = (pos.y + height - 0.5).ceil().min(self.height as f32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let bounds = Bounds {
            min_x: x0 as u32,
            min_y: y0 as u32,
            max_x: x1 as u32 - 1,
            max_y: y1 as u32 - 1,
        };
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                self.mask[y as usize * self.width as usize + x as usize] = true;
            }
        }
        self.composite(bounds, paint.into());
    }

    /// Fill the whole canvas.
    pub fn fill_all(&mut self, paint: impl Into<Paint>) {
        let size = self.size();
        self.fill_rect(Vec2::ZERO, size.x, size.y, paint);
    }

    /// Fill a closed polygon (non-zero winding).
    pub fn fill_polygon(&mut self, points: &[Vec2], paint: impl Into<Paint>) {
        if points.len() < 3 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
        let path = builder.build();
        self.fill_path(&path, paint.into());
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.fill_path(&path, paint.into());
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.stroke_path(&path, line_width, color);
    }

    /// Stroke an open polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], line_width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        let path = builder.build();
        self.stroke_path(&path, line_width, color);
    }

    pub fn fill_path(&mut self, path: &Path, paint: Paint) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(0.25),
            &mut BuffersBuilder::new(&mut self.geometry, PositionCtor),
        );
        if result.is_ok() {
            self.flush_geometry(paint);
        } else {
            self.discard_geometry();
        }
    }

    pub fn stroke_path(&mut self, path: &Path, line_width: f32, color: Color) {
        if line_width <= 0.0 {
            return;
        }
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.25).with_line_width(line_width),
            &mut BuffersBuilder::new(&mut self.geometry, PositionCtor),
        );
        if result.is_ok() {
            self.flush_geometry(Paint::Solid(color));
        } else {
            self.discard_geometry();
        }
    }

    /// Finish painting and hand the raster over as a texture.
    pub fn into_texture(self) -> TextureImage {
        TextureImage::from_rgba(self.pixels)
    }

    fn discard_geometry(&mut self) {
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Scan-convert pending triangles into the mask, then blend them in one pass.
    fn flush_geometry(&mut self, paint: Paint) {
        let mut covered: Option<Bounds> = None;
        for tri in self.geometry.indices.chunks_exact(3) {
            let a = self.geometry.vertices[tri[0] as usize];
            let b = self.geometry.vertices[tri[1] as usize];
            let c = self.geometry.vertices[tri[2] as usize];
            if let Some(bounds) = rasterize_triangle(&mut self.mask, self.width, self.height, a, b, c) {
                covered = Some(match covered {
                    Some(prev) => prev.union(bounds),
                    None => bounds,
                });
            }
        }
        self.discard_geometry();
        if let Some(bounds) = covered {
            self.composite(bounds, paint);
        }
    }

    fn composite(&mut self, bounds: Bounds, paint: Paint) {
        let alpha_scale = self.global_alpha;
        for y in bounds.min_y..=bounds.max_y {
            for x in bounds.min_x..=bounds.max_x {
                let idx = y as usize * self.width as usize + x as usize;
                if !self.mask[idx] {
                    continue;
                }
                self.mask[idx] = false;
                let src = paint.color_at(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                blend(self.pixels.get_pixel_mut(x, y), src, alpha_scale);
            }
        }
    }
}

fn rasterize_triangle(
    mask: &mut [bool],
    width: u32,
    height: u32,
    a: [f32; 2],
    b: [f32; 2],
    c: [f32; 2],
) -> Option<Bounds> {
    let area = edge(a, b, c);
    if area.abs() < 1e-9 || !area.is_finite() {
        return None;
    }
    let min_x = (a[0].min(b[0]).min(c[0]) - 0.5).floor().max(0.0);
    let min_y = (a[1].min(b[1]).min(c[1]) - 0.5).floor().max(0.0);
    let max_x = (a[0].max(b[0]).max(c[0]) - 0.5).ceil().min(width as f32 - 1.0);
    let max_y = (a[1].max(b[1]).max(c[1]) - 0.5).ceil().min(height as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return None;
    }
    let bounds = Bounds {
        min_x: min_x as u32,
        min_y: min_y as u32,
        max_x: max_x as u32,
        max_y: max_y as u32,
    };
    let sign = area.signum();
    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];
            let w0 = edge(b, c, p) * sign;
            let w1 = edge(c, a, p) * sign;
            let w2 = edge(a, b, p) * sign;
            // Small slack so centres on a shared edge are never missed by both sides.
            if w0 >= -EDGE_EPSILON && w1 >= -EDGE_EPSILON && w2 >= -EDGE_EPSILON {
                mask[y as usize * width as usize + x as usize] = true;
            }
        }
    }
    Some(bounds)
}

/// Source-over blend of a straight-alpha color onto an RGBA8 pixel.
fn blend(dst: &mut Rgba<u8>, src: Color, alpha_scale: f32) {
    let sa = (src.a * alpha_scale).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channels = [src.r, src.g, src.b];
    for (i, s) in channels.iter().enumerate() {
        let d = dst.0[i] as f32 / 255.0;
        let c = (s.clamp(0.0, 1.0) * sa + d * da * (1.0 - sa)) / out_a;
        dst.0[i] = (c * 255.0).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode() {
        let c = Color::hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn fill_rect_covers_only_inside() {
        let mut canvas = Canvas::new(16, 16);
        canvas.fill_rect(Vec2::new(4.0, 4.0), 4.0, 4.0, Color::WHITE);
        assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(8, 8), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(3, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_rect(Vec2::new(-10.0, -10.0), 100.0, 100.0, Color::BLACK);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(7, 7), Some([0, 0, 0, 255]));
        canvas.fill_rect(Vec2::new(50.0, 50.0), 5.0, 5.0, Color::WHITE);
    }

    #[test]
    fn circle_fills_centre_not_corner() {
        let mut canvas = Canvas::new(64, 64);
        canvas.fill_circle(Vec2::new(32.0, 32.0), 10.0, Color::hex(0x00ff00));
        assert_eq!(canvas.pixel(32, 32), Some([0, 255, 0, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(32, 50), Some([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_polygon_blends_once() {
        let mut canvas = Canvas::new(32, 32);
        canvas.fill_all(Color::BLACK);
        // Concave shape: tessellates into several triangles sharing edges.
        let shape = [
            Vec2::new(2.0, 2.0),
            Vec2::new(30.0, 2.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(16.0, 12.0),
            Vec2::new(2.0, 30.0),
        ];
        canvas.fill_polygon(&shape, Color::WHITE.with_alpha(0.5));
        let expected = (0.5f32 * 255.0).round() as u8;
        for x in 3..29 {
            let p = canvas.pixel(x, 5).unwrap();
            assert_eq!(p[0], expected, "pixel {} double-blended: {:?}", x, p);
        }
    }

    #[test]
    fn global_alpha_scales_draws() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_all(Color::BLACK);
        canvas.set_global_alpha(0.2);
        canvas.fill_all(Color::WHITE.with_alpha(0.5));
        let v = canvas.pixel(1, 1).unwrap()[0];
        assert!((v as i32 - 26).abs() <= 1, "got {}", v);
    }

    #[test]
    fn radial_gradient_runs_inner_to_outer() {
        let mut canvas = Canvas::new(64, 64);
        canvas.fill_all(Paint::Radial(RadialGradient {
            center: Vec2::new(32.0, 32.0),
            radius: 32.0,
            inner: Color::WHITE,
            outer: Color::BLACK,
        }));
        let centre = canvas.pixel(32, 32).unwrap();
        let corner = canvas.pixel(0, 0).unwrap();
        assert!(centre[0] > 240, "centre {:?}", centre);
        assert_eq!(corner, [0, 0, 0, 255]);
    }

    #[test]
    fn stroke_polyline_marks_its_path() {
        let mut canvas = Canvas::new(32, 32);
        canvas.stroke_polyline(&[Vec2::new(2.0, 16.0), Vec2::new(30.0, 16.0)], 2.0, Color::WHITE);
        assert_eq!(canvas.pixel(16, 16).unwrap()[3], 255);
        assert_eq!(canvas.pixel(16, 4).unwrap()[3], 0);
    }

    #[test]
    fn stroke_circle_leaves_centre_empty() {
        let mut canvas = Canvas::new(64, 64);
        canvas.stroke_circle(Vec2::new(32.0, 32.0), 20.0, 2.0, Color::WHITE);
        assert_eq!(canvas.pixel(32, 32).unwrap()[3], 0);
        assert_eq!(canvas.pixel(52, 32).unwrap()[3], 255);
    }

    #[test]
    fn degenerate_shapes_are_ignored() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Color::WHITE);
        canvas.fill_circle(Vec2::ZERO, 0.0, Color::WHITE);
        canvas.stroke_polyline(&[Vec2::ZERO], 1.0, Color::WHITE);
        assert!(canvas.into_texture().as_bytes().iter().all(|&b| b == 0));
    }
}
