//! Shape generation for 2D primitives
//!
//! Outline functions return points; triangulation functions turn points into
//! triangle-list vertices. Callers transform outlines before triangulating,
//! so everything here works in one coordinate space.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{Color, Vertex};

/// Enough segments for a smooth edge at `radius` pixels
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius.max(0.0).sqrt() * 4.0) as u32).clamp(12, 64)
}

/// Points on an ellipse rotated by `rotation` radians
pub fn ellipse_points(center: Vec2, rx: f32, ry: f32, rotation: f32, segments: u32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            center + rot.rotate(Vec2::new(rx * theta.cos(), ry * theta.sin()))
        })
        .collect()
}

pub fn circle_points(center: Vec2, radius: f32, segments: u32) -> Vec<Vec2> {
    ellipse_points(center, radius, radius, 0.0, segments)
}

/// Outline of a rectangle with rounded corners, clockwise on screen
pub fn rounded_rect_points(min: Vec2, size: Vec2, radius: f32, corner_segments: u32) -> Vec<Vec2> {
    let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    let max = min + size;
    // Corner centers with the angle each quarter arc starts at
    let corners = [
        (Vec2::new(max.x - r, min.y + r), -TAU / 4.0),
        (Vec2::new(max.x - r, max.y - r), 0.0),
        (Vec2::new(min.x + r, max.y - r), TAU / 4.0),
        (Vec2::new(min.x + r, min.y + r), TAU / 2.0),
    ];
    let steps = corner_segments.max(1);
    let mut points = Vec::with_capacity(corners.len() * (steps as usize + 1));
    for (center, start) in corners {
        for i in 0..=steps {
            let theta = start + (i as f32 / steps as f32) * (TAU / 4.0);
            points.push(center + Vec2::from_angle(theta) * r);
        }
    }
    points
}

/// Quadratic Bezier from `p0` to `p1` bent toward `ctrl`
pub fn quadratic_points(p0: Vec2, ctrl: Vec2, p1: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u) + ctrl * (2.0 * u * t) + p1 * (t * t)
        })
        .collect()
}

/// Fill a convex outline as a fan from its first point
pub fn fill_convex(points: &[Vec2], color: Color) -> Vec<Vertex> {
    fill_convex_shaded(points, |_| color)
}

/// Fill a convex outline with a per-point color
pub fn fill_convex_shaded(points: &[Vec2], shade: impl Fn(Vec2) -> Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let first = points[0];
    for pair in points[1..].windows(2) {
        for p in [first, pair[0], pair[1]] {
            vertices.push(Vertex::new(p.x, p.y, shade(p)));
        }
    }
    vertices
}

/// Fill a closed outline as a fan from `center` (outline must be star-shaped
/// around it)
pub fn fan(center: Vec2, center_color: Color, points: &[Vec2], edge_color: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(center.x, center.y, center_color));
        vertices.push(Vertex::new(p1.x, p1.y, edge_color));
        vertices.push(Vertex::new(p2.x, p2.y, edge_color));
    }
    vertices
}

/// Band between two closed outlines with matching point counts
pub fn band(inner: &[Vec2], inner_color: Color, outer: &[Vec2], outer_color: Color) -> Vec<Vertex> {
    let n = inner.len().min(outer.len());
    let mut vertices = Vec::with_capacity(n * 6);

    for i in 0..n {
        let j = (i + 1) % n;
        let (inner1, outer1, inner2, outer2) = (inner[i], outer[i], inner[j], outer[j]);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));

        vertices.push(Vertex::new(inner2.x, inner2.y, inner_color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    fan(center, color, &circle_points(center, radius, segments), color)
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    band(
        &circle_points(center, inner_radius, segments),
        color,
        &circle_points(center, outer_radius, segments),
        color,
    )
}

/// Thick polyline with round joins and caps
pub fn polyline(points: &[Vec2], width: f32, color: Color, closed: bool) -> Vec<Vertex> {
    if points.len() < 2 || width <= 0.0 {
        return Vec::new();
    }
    let half = width / 2.0;
    let cap_segments = segments_for_radius(half).min(16);
    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let mut vertices = Vec::with_capacity(segment_count * 6 + points.len() * cap_segments as usize * 3);

    for i in 0..segment_count {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];

        // Perpendicular for width
        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let v1a = p1 + perp;
        let v1b = p1 - perp;
        let v2a = p2 + perp;
        let v2b = p2 - perp;

        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));
    }

    // Round joins; the caps of an open line fall out of the same discs
    for p in points {
        vertices.extend(circle(*p, half, color, cap_segments));
    }

    vertices
}
