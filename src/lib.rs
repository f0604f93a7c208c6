//! Pump Pop - pump up balloons, let them fly, pop them for points
//!
//! Core modules:
//! - `sim`: Seeded simulation (entities, pump, weather, game orchestration)
//! - `renderer`: Draw list, tessellation and the WebGPU pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key/value storage for the records the game keeps
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScore;
pub use settings::WeatherSettings;
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; tuning values are per step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Symbol alphabet sizes
    pub const LETTER_COUNT: u8 = 26;
    pub const DIGIT_COUNT: u8 = 10;
    pub const SYMBOL_COUNT: usize = (LETTER_COUNT + DIGIT_COUNT) as usize;

    /// Number of balloon pattern images
    pub const PATTERN_COUNT: usize = 10;
    /// Pattern file numbers (pattern 6 never shipped)
    pub const PATTERN_FILES: [u8; PATTERN_COUNT] = [1, 2, 3, 4, 5, 7, 8, 9, 10, 11];
}

/// Axis-aligned rectangle in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on all edges
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[inline]
pub fn point_in_circle(px: f32, py: f32, center: Vec2, radius: f32) -> bool {
    Vec2::new(px, py).distance_squared(center) <= radius * radius
}

/// Axis-aligned ellipse test (strict: points on the boundary are outside)
#[inline]
pub fn point_in_ellipse(px: f32, py: f32, center: Vec2, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = px - center.x;
    let dy = py - center.y;
    (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) < 1.0
}

/// Per-channel linear interpolation, rounded to the nearest integer
pub fn lerp_color(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [
        channel(from[0], to[0]),
        channel(from[1], to[1]),
        channel(from[2], to[2]),
    ]
}

/// Uniform value in `[min, max)`; returns `min` for an empty range instead of panicking
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.random_range(min..max)
    }
}

/// Unit vector pointing at a uniformly random angle
#[inline]
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
}
