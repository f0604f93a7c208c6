//! Immediate-mode canvas recording triangles in screen pixels
//!
//! Shapes and images are tessellated on the CPU into one vertex list. Runs
//! of vertices sharing a texture form a [`Batch`]; the GPU pipeline draws
//! the batches in order, so recording order is paint order.

use std::ops::Range;

use glam::{Affine2, Mat3, Vec2, Vec3};

use super::font;
use super::shapes;
use super::vertex::{Color, Vertex, colors};
use crate::assets::{AssetCache, AssetKey};
use crate::Rect;

/// Color transform applied to everything drawn while active
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorFilter {
    #[default]
    None,
    /// Icy look for frozen birds: hue rotated half a turn, then desaturated
    Frozen,
}

impl ColorFilter {
    pub fn apply(self, color: Color) -> Color {
        match self {
            ColorFilter::None => color,
            ColorFilter::Frozen => {
                let rgb = Vec3::new(color[0], color[1], color[2]);
                let rotated = (hue_rotate(180.0) * rgb).clamp(Vec3::ZERO, Vec3::ONE);
                let out = (saturate(0.5) * rotated).clamp(Vec3::ZERO, Vec3::ONE);
                [out.x, out.y, out.z, color[3]]
            }
        }
    }
}

fn from_rows(rows: [[f32; 3]; 3]) -> Mat3 {
    Mat3::from_cols_array_2d(&rows).transpose()
}

/// CSS `hue-rotate()` matrix
fn hue_rotate(degrees: f32) -> Mat3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    from_rows([
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ])
}

/// CSS `saturate()` matrix
fn saturate(s: f32) -> Mat3 {
    from_rows([
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ])
}

/// Vertical anchor for text; text is always centered horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

/// Vertices drawn with one texture; `None` is the built-in white texel
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: Option<AssetKey>,
    pub range: Range<u32>,
}

#[derive(Debug, Clone, Copy)]
struct State {
    transform: Affine2,
    alpha: f32,
    filter: ColorFilter,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            filter: ColorFilter::None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    vertices: Vec<Vertex>,
    batches: Vec<Batch>,
    layers: Vec<(&'static str, usize)>,
    state: State,
    stack: Vec<State>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Layer names with the vertex index each one starts at
    pub fn layers(&self) -> &[(&'static str, usize)] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Record where a named group of draws starts
    pub fn begin_layer(&mut self, name: &'static str) {
        self.layers.push((name, self.vertices.len()));
    }

    // --- State ---

    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    pub fn scale(&mut self, factor: f32) {
        self.state.transform = self.state.transform * Affine2::from_scale(Vec2::splat(factor));
    }

    /// Opacity for everything drawn until the next `restore`
    pub fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_filter(&mut self, filter: ColorFilter) {
        self.state.filter = filter;
    }

    fn to_screen(&self, p: Vec2) -> Vec2 {
        self.state.transform.transform_point2(p)
    }

    /// Uniform scale of the current transform, for line widths and tessellation
    fn scale_factor(&self) -> f32 {
        self.state.transform.matrix2.determinant().abs().sqrt()
    }

    fn paint(&self, color: Color) -> Color {
        let mut c = self.state.filter.apply(color);
        c[3] *= self.state.alpha;
        c
    }

    fn push(&mut self, texture: Option<AssetKey>, vertices: impl IntoIterator<Item = Vertex>) {
        let start = self.vertices.len() as u32;
        self.vertices.extend(vertices);
        let end = self.vertices.len() as u32;
        if end == start {
            return;
        }
        match self.batches.last_mut() {
            Some(last) if last.texture == texture && last.range.end == start => last.range.end = end,
            _ => self.batches.push(Batch {
                texture,
                range: start..end,
            }),
        }
    }

    /// Push already-transformed shape vertices, applying alpha and filter
    fn push_shape(&mut self, vertices: Vec<Vertex>) {
        let painted: Vec<Vertex> = vertices
            .into_iter()
            .map(|v| Vertex {
                color: self.paint(v.color),
                ..v
            })
            .collect();
        self.push(None, painted);
    }

    fn transformed(&self, points: impl IntoIterator<Item = Vec2>) -> Vec<Vec2> {
        points.into_iter().map(|p| self.to_screen(p)).collect()
    }

    fn segments(&self, radius: f32) -> u32 {
        shapes::segments_for_radius(radius * self.scale_factor())
    }

    // --- Fills ---

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rect_gradient(rect, color, color);
    }

    /// Linear gradient from the top edge to the bottom edge
    pub fn fill_rect_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let corners = rect_corners(rect);
        let pts = self.transformed(corners);
        let (top, bottom) = (self.paint(top), self.paint(bottom));
        let v = |i: usize, c: Color| Vertex::new(pts[i].x, pts[i].y, c);
        self.push(
            None,
            [
                v(0, top),
                v(1, top),
                v(2, bottom),
                v(0, top),
                v(2, bottom),
                v(3, bottom),
            ],
        );
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_ellipse(center, radius, radius, 0.0, color);
    }

    pub fn fill_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, rotation: f32, color: Color) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let segments = self.segments(rx.max(ry));
        let pts = self.transformed(shapes::ellipse_points(center, rx, ry, rotation, segments));
        let c = self.to_screen(center);
        self.push_shape(shapes::fan(c, color, &pts, color));
    }

    /// Soft halo: a solid ellipse fading to transparent over `blur` pixels
    pub fn glow_ellipse(&mut self, center: Vec2, rx: f32, ry: f32, blur: f32, color: Color) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.fill_ellipse(center, rx, ry, 0.0, color);
        let segments = self.segments(rx.max(ry) + blur);
        let inner = self.transformed(shapes::ellipse_points(center, rx, ry, 0.0, segments));
        let outer = self.transformed(shapes::ellipse_points(
            center,
            rx + blur,
            ry + blur,
            0.0,
            segments,
        ));
        self.push_shape(shapes::band(
            &inner,
            color,
            &outer,
            colors::with_alpha(color, 0.0),
        ));
    }

    /// Radial gradient from `focus` out to the circle edge; stops are
    /// (offset in [0, 1], color) in increasing order
    pub fn fill_radial_gradient(
        &mut self,
        focus: Vec2,
        center: Vec2,
        radius: f32,
        stops: &[(f32, Color)],
    ) {
        let Some(&(_, first)) = stops.first() else {
            return;
        };
        let segments = self.segments(radius);
        let edge = shapes::circle_points(center, radius, segments);
        let transform = self.state.transform;
        let ring_at = |t: f32| -> Vec<Vec2> {
            edge.iter()
                .map(|p| transform.transform_point2(focus + (*p - focus) * t))
                .collect()
        };
        let f = self.to_screen(focus);

        let (t0, _) = stops[0];
        let mut inner = ring_at(t0);
        if t0 > 0.0 {
            self.push_shape(shapes::fan(f, first, &inner, first));
        }
        for pair in stops.windows(2) {
            let (t_in, c_in) = pair[0];
            let (t_out, c_out) = pair[1];
            let outer = ring_at(t_out);
            if t_in <= 0.0 {
                self.push_shape(shapes::fan(f, c_in, &outer, c_out));
            } else {
                self.push_shape(shapes::band(&inner, c_in, &outer, c_out));
            }
            inner = outer;
        }
    }

    /// Convex polygon in local coordinates
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let pts = self.transformed(points.iter().copied());
        self.push_shape(shapes::fill_convex(&pts, color));
    }

    /// Outline that is star-shaped around `center`, e.g. a five-pointed star
    pub fn fill_fan(&mut self, center: Vec2, points: &[Vec2], color: Color) {
        let pts = self.transformed(points.iter().copied());
        let c = self.to_screen(center);
        self.push_shape(shapes::fan(c, color, &pts, color));
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.fill_rounded_rect_gradient(rect, radius, color, color);
    }

    pub fn fill_rounded_rect_gradient(&mut self, rect: Rect, radius: f32, top: Color, bottom: Color) {
        let local = rounded_rect(rect, radius);
        let pts = self.transformed(local.iter().copied());
        let colors: Vec<Color> = local
            .iter()
            .map(|p| {
                let t = if rect.height > 0.0 {
                    ((p.y - rect.y) / rect.height).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                lerp(top, bottom, t)
            })
            .collect();

        let mut vertices = Vec::with_capacity(pts.len() * 3);
        for i in 1..pts.len().saturating_sub(1) {
            for j in [0, i, i + 1] {
                vertices.push(Vertex::new(pts[j].x, pts[j].y, colors[j]));
            }
        }
        self.push_shape(vertices);
    }

    // --- Strokes ---

    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color, closed: bool) {
        let pts = self.transformed(points.iter().copied());
        let w = width * self.scale_factor();
        self.push_shape(shapes::polyline(&pts, w, color, closed));
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.stroke_polyline(&[from, to], width, color, false);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        let segments = self.segments(radius);
        let pts = shapes::circle_points(center, radius, segments);
        self.stroke_polyline(&pts, width, color, true);
    }

    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Color) {
        let pts = rounded_rect(rect, radius);
        self.stroke_polyline(&pts, width, color, true);
    }

    pub fn stroke_quadratic(&mut self, from: Vec2, ctrl: Vec2, to: Vec2, width: f32, color: Color) {
        let pts = shapes::quadratic_points(from, ctrl, to, 16);
        self.stroke_polyline(&pts, width, color, false);
    }

    // --- Text ---

    pub fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, baseline: TextBaseline) {
        let origin = text_origin(text, pos, size, baseline);
        for (min, extent) in font::runs(text, size) {
            self.fill_rect(rect_at(origin + min, extent), color);
        }
    }

    /// Text with an outline `outline` pixels wide on every side
    #[allow(clippy::too_many_arguments)]
    pub fn text_outlined(
        &mut self,
        text: &str,
        pos: Vec2,
        size: f32,
        color: Color,
        outline_color: Color,
        outline: f32,
        baseline: TextBaseline,
    ) {
        let origin = text_origin(text, pos, size, baseline);
        let runs = font::runs(text, size);
        for (min, extent) in &runs {
            let grown = rect_at(
                origin + *min - Vec2::splat(outline),
                *extent + Vec2::splat(outline * 2.0),
            );
            self.fill_rect(grown, outline_color);
        }
        for (min, extent) in runs {
            self.fill_rect(rect_at(origin + min, extent), color);
        }
    }

    // --- Images ---

    /// Draw `key` stretched over `rect`; skipped unless the image is usable
    pub fn image(&mut self, assets: &AssetCache, key: AssetKey, rect: Rect) -> bool {
        if !assets.usable(key) {
            return false;
        }
        let pts = self.transformed(rect_corners(rect));
        let tint = self.paint(colors::WHITE);
        let uv = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let v = |i: usize| Vertex::textured(pts[i].x, pts[i].y, uv[i][0], uv[i][1], tint);
        self.push(Some(key), [v(0), v(1), v(2), v(0), v(2), v(3)]);
        true
    }

    /// Draw `key` centered on `center`, its longer side scaled to `target`
    pub fn image_fit(&mut self, assets: &AssetCache, key: AssetKey, center: Vec2, target: f32) -> bool {
        let Some(info) = assets.info(key) else {
            return false;
        };
        let size = info.size() * (target / info.max_side());
        self.image(assets, key, Rect::centered(center, size.x, size.y))
    }
}

fn rect_corners(rect: Rect) -> [Vec2; 4] {
    [
        Vec2::new(rect.x, rect.y),
        Vec2::new(rect.x + rect.width, rect.y),
        Vec2::new(rect.x + rect.width, rect.y + rect.height),
        Vec2::new(rect.x, rect.y + rect.height),
    ]
}

fn rect_at(min: Vec2, size: Vec2) -> Rect {
    Rect::new(min.x, min.y, size.x, size.y)
}

fn rounded_rect(rect: Rect, radius: f32) -> Vec<Vec2> {
    shapes::rounded_rect_points(
        Vec2::new(rect.x, rect.y),
        Vec2::new(rect.width, rect.height),
        radius,
        6,
    )
}

fn text_origin(text: &str, pos: Vec2, size: f32, baseline: TextBaseline) -> Vec2 {
    let x = pos.x - font::text_width(text, size) / 2.0;
    let y = match baseline {
        TextBaseline::Top => pos.y,
        TextBaseline::Middle => pos.y - font::text_height(size) / 2.0,
    };
    Vec2::new(x, y)
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageInfo;

    const RED: Color = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_images_skipped_unless_usable() {
        let mut assets = AssetCache::new();
        let mut list = DrawList::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        // Pending
        assert!(!list.image(&assets, AssetKey::PumpBody, rect));
        // Failed
        assets.mark_failed(AssetKey::PumpBody);
        assert!(!list.image(&assets, AssetKey::PumpBody, rect));
        // Loaded but zero-sized
        assets.mark_ready(AssetKey::Digit(0), ImageInfo { width: 0, height: 0 });
        assert!(!list.image_fit(&assets, AssetKey::Digit(0), Vec2::ZERO, 20.0));
        assert!(list.is_empty());

        assets.mark_ready(AssetKey::Digit(1), ImageInfo { width: 10, height: 20 });
        assert!(list.image_fit(&assets, AssetKey::Digit(1), Vec2::new(50.0, 50.0), 40.0));
        assert_eq!(list.vertices().len(), 6);
        // 10x20 fit to 40 on the long side: 20 wide, 40 tall
        assert_eq!(list.vertices()[0].position, [40.0, 30.0]);
        assert_eq!(list.vertices()[2].position, [60.0, 70.0]);
        assert_eq!(
            list.batches(),
            &[Batch {
                texture: Some(AssetKey::Digit(1)),
                range: 0..6
            }]
        );
    }

    #[test]
    fn test_batches_split_on_texture_change() {
        let mut assets = AssetCache::new();
        assets.mark_ready(AssetKey::PumpBody, ImageInfo { width: 4, height: 4 });
        let mut list = DrawList::new();
        let rect = Rect::new(0.0, 0.0, 4.0, 4.0);

        list.fill_rect(rect, RED);
        list.fill_rect(rect, RED);
        list.image(&assets, AssetKey::PumpBody, rect);
        list.fill_rect(rect, RED);

        let textures: Vec<_> = list.batches().iter().map(|b| b.texture).collect();
        assert_eq!(textures, vec![None, Some(AssetKey::PumpBody), None]);
        assert_eq!(list.batches()[0].range, 0..12);
    }

    #[test]
    fn test_transform_stack() {
        let mut list = DrawList::new();
        list.save();
        list.translate(Vec2::new(100.0, 50.0));
        list.scale(2.0);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED);
        list.restore();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED);

        let v = list.vertices();
        assert_eq!(v[0].position, [100.0, 50.0]);
        assert_eq!(v[2].position, [102.0, 52.0]);
        assert_eq!(v[6].position, [0.0, 0.0]);
    }

    #[test]
    fn test_restore_without_save_is_harmless() {
        let mut list = DrawList::new();
        list.restore();
        list.fill_circle(Vec2::ZERO, 5.0, RED);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_alpha_multiplies_color() {
        let mut list = DrawList::new();
        list.set_alpha(0.5);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(list.vertices()[0].color[3], 0.25);
    }

    #[test]
    fn test_frozen_filter() {
        // Grays are unchanged by hue rotation and saturation
        let white = ColorFilter::Frozen.apply([1.0, 1.0, 1.0, 1.0]);
        for c in &white[..3] {
            assert!((c - 1.0).abs() < 1e-3);
        }
        // Red swings toward cyan
        let red = ColorFilter::Frozen.apply(RED);
        assert!(red[1] > red[0] && red[2] > red[0]);
        assert_eq!(red[3], 1.0);
    }

    #[test]
    fn test_text_centered() {
        let mut list = DrawList::new();
        list.text("-", Vec2::new(100.0, 100.0), 10.0, RED, TextBaseline::Middle);
        // One 5x1 run, centered horizontally, row 3 of a 7-row cell
        assert_eq!(list.vertices().len(), 6);
        assert_eq!(list.vertices()[0].position, [97.5, 99.5]);
    }

    #[test]
    fn test_layers_record_vertex_offsets() {
        let mut list = DrawList::new();
        list.begin_layer("a");
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED);
        list.begin_layer("b");
        assert_eq!(list.layers(), &[("a", 0), ("b", 6)]);
    }
}
