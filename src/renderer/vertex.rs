//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Straight-alpha RGBA, channels in [0, 1]
pub type Color = [f32; 4];

/// 2D vertex with texture coordinate and tint
///
/// Untextured shapes sample a 1x1 white texture, so `uv` only matters for
/// images.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const fn rgb(c: [u8; 3]) -> Color {
        rgba(c, 1.0)
    }

    pub const fn rgba(c: [u8; 3], alpha: f32) -> Color {
        [
            c[0] as f32 / 255.0,
            c[1] as f32 / 255.0,
            c[2] as f32 / 255.0,
            alpha,
        ]
    }

    pub const fn with_alpha(c: Color, alpha: f32) -> Color {
        [c[0], c[1], c[2], alpha]
    }

    pub const WHITE: Color = rgb([255, 255, 255]);
    pub const BLACK: Color = rgb([0, 0, 0]);
    pub const TRANSPARENT: Color = [0.0; 4];
    /// Outlines, strings and dark text
    pub const INK: Color = rgb([0x33, 0x33, 0x33]);

    pub const CLOUD: Color = WHITE;
    pub const CLOUD_SHADOW: Color = rgba([0, 0, 0], 0.06);
    pub const BEAK: Color = rgb([0xff, 0xa5, 0x00]);
    pub const RAIN: Color = rgba([174, 214, 241], 0.6);
    pub const SUN_RAY: Color = rgba([255, 220, 100], 0.4);
    pub const SUN: [Color; 3] = [
        rgb([0xff, 0xf9, 0xe6]),
        rgb([0xff, 0xeb, 0x3b]),
        rgb([0xff, 0xd7, 0x00]),
    ];
    pub const MOON: [Color; 3] = [
        rgb([0xff, 0xff, 0xff]),
        rgb([0xf0, 0xf0, 0xf0]),
        rgb([0xd0, 0xd0, 0xd0]),
    ];
    pub const MOON_CRATER: Color = rgba([180, 180, 180], 0.3);
    pub const STAR: [u8; 3] = [255, 255, 255];
    pub const STAR_GLOW: [u8; 3] = [255, 255, 200];
    pub const RAIN_OVERLAY: Color = rgba([100, 120, 140], 0.1);
    pub const CLOUD_OVERLAY: Color = rgba([200, 200, 210], 0.15);

    pub const GOLD: Color = rgb([0xff, 0xd7, 0x00]);
    pub const GOLD_DARK: Color = rgb([0xb8, 0x86, 0x0b]);
    pub const FREEZE: Color = rgb([0x00, 0xbf, 0xff]);
    pub const FREEZE_DARK: Color = rgb([0x00, 0x80, 0xaa]);
    pub const FREEZE_POPUP_DARK: Color = rgb([0x00, 0x66, 0xaa]);
    pub const FREEZE_LABEL: Color = rgba([0, 191, 255], 0.3);
    pub const BOMB: Color = rgb([0xff, 0x44, 0x44]);
    pub const BOMB_DARK: Color = rgb([0xaa, 0x00, 0x00]);
    pub const BOMB_POPUP: Color = rgb([0xff, 0x6b, 0x6b]);

    pub const LOADING_PLACEHOLDER: Color = rgb([0xcc, 0xcc, 0xcc]);
    pub const AUTO_ON: Color = rgb([0xff, 0x6b, 0x6b]);
    pub const AUTO_OFF: Color = rgb([0x4c, 0xaf, 0x50]);

    pub const DIM: Color = rgba([0, 0, 0], 0.6);
    pub const CROSS: Color = rgb([0xe7, 0x4c, 0x3c]);
    pub const SCORE_TEXT: Color = rgb([0x66, 0x66, 0x66]);
    pub const BEST_NEW: Color = rgb([0xf3, 0x9c, 0x12]);
    pub const BEST_OLD: Color = rgb([0x99, 0x99, 0x99]);
    pub const BUTTON_TOP: Color = rgb([0x3b, 0xb3, 0xe0]);
    pub const BUTTON_BOTTOM: Color = rgb([0x29, 0x80, 0xb9]);
    pub const BUTTON_BORDER: Color = rgb([0x1a, 0x52, 0x76]);

    /// Clear color behind the sky gradient
    pub const BACKGROUND: Color = rgb([25, 25, 50]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 16);
    }

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(colors::rgb([255, 0, 51]), [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(colors::with_alpha(colors::WHITE, 0.5)[3], 0.5);
    }
}
