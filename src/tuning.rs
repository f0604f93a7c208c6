//! Data-driven game balance
//!
//! All speeds are per simulation step (see `consts::SIM_DT`), all sizes in
//! CSS pixels, all durations in milliseconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonTuning {
    pub max_size: f32,
    pub string_length: f32,
    /// Speed floor; below it a random boost is injected
    pub min_speed: f32,
    pub max_speed: f32,
    /// Restitution applied on wall bounces
    pub bounce_energy: f32,
    /// Random perpendicular kick on bounce (±)
    pub bounce_kick: f32,
    /// Random velocity drift per step (±)
    pub drift: f32,
    pub speed_boost: f32,
    pub inflate_amount: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    /// Added to the launch velocity's y (negative = upward)
    pub launch_lift: f32,
    pub wobble_speed_min: f32,
    pub wobble_speed_max: f32,
}

impl Default for BalloonTuning {
    fn default() -> Self {
        Self {
            max_size: 80.0,
            string_length: 60.0,
            min_speed: 1.5,
            max_speed: 5.0,
            bounce_energy: 0.95,
            bounce_kick: 1.0,
            drift: 0.15,
            speed_boost: 0.5,
            inflate_amount: 2.5,
            launch_speed_min: 3.0,
            launch_speed_max: 5.0,
            launch_lift: -1.0,
            wobble_speed_min: 0.05,
            wobble_speed_max: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpTuning {
    /// Scale applied to the pump part images
    pub scale: f32,
    pub max_handle_y: f32,
    /// Handle travel per step while pressed
    pub handle_speed_down: f32,
    /// Handle travel per step while released
    pub handle_speed_up: f32,
    pub auto_pump_speed: f32,
    /// Handle travel below which the pump does not inflate
    pub dead_zone: f32,
}

impl Default for PumpTuning {
    fn default() -> Self {
        Self {
            scale: 0.5,
            max_handle_y: 50.0,
            handle_speed_down: 8.0,
            handle_speed_up: 4.0,
            auto_pump_speed: 6.0,
            dead_zone: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdTuning {
    pub size: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub wing_speed: f32,
    pub count: usize,
}

impl Default for BirdTuning {
    fn default() -> Self {
        Self {
            size: 40.0,
            speed_min: 2.0,
            speed_max: 4.0,
            wing_speed: 0.15,
            count: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudTuning {
    pub count: usize,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for CloudTuning {
    fn default() -> Self {
        Self {
            count: 8,
            speed_min: 0.2,
            speed_max: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherTuning {
    pub change_interval_ms: f64,
    pub day_night_speed: f32,
    pub star_count: usize,
    pub sun_ray_count: usize,
    /// Probability per step of spawning a raindrop while raining
    pub rain_chance: f64,
}

impl Default for WeatherTuning {
    fn default() -> Self {
        Self {
            change_interval_ms: 15_000.0,
            day_night_speed: 0.000_05,
            star_count: 100,
            sun_ray_count: 12,
            rain_chance: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Particles per popped balloon
    pub count: usize,
    /// Extra particles at a bomb's center
    pub explosion_count: usize,
    pub size_min: f32,
    pub size_max: f32,
    pub speed: f32,
    pub gravity: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            count: 20,
            explosion_count: 30,
            size_min: 5.0,
            size_max: 15.0,
            speed: 15.0,
            gravity: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTuning {
    /// Chance that a new balloon is special (split evenly between kinds)
    pub spawn_chance: f64,
    pub golden_points: u64,
    pub freeze_duration_ms: f64,
    pub bomb_radius: f32,
}

impl Default for SpecialTuning {
    fn default() -> Self {
        Self {
            spawn_chance: 0.15,
            golden_points: 5,
            freeze_duration_ms: 3000.0,
            bomb_radius: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTuning {
    pub rise_speed: f32,
    pub fade_speed: f32,
    pub font_size: f32,
}

impl Default for PopupTuning {
    fn default() -> Self {
        Self {
            rise_speed: 2.0,
            fade_speed: 0.02,
            font_size: 28.0,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Flying balloons kept at once; the oldest is evicted beyond this
    pub max_balloons: usize,
    pub balloon: BalloonTuning,
    pub pump: PumpTuning,
    pub bird: BirdTuning,
    pub cloud: CloudTuning,
    pub weather: WeatherTuning,
    pub particle: ParticleTuning,
    pub special: SpecialTuning,
    pub popup: PopupTuning,
    /// Particle colors, indexed by balloon pattern
    pub balloon_colors: Vec<[u8; 3]>,
    pub bird_colors: Vec<[u8; 3]>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_balloons: 20,
            balloon: BalloonTuning::default(),
            pump: PumpTuning::default(),
            bird: BirdTuning::default(),
            cloud: CloudTuning::default(),
            weather: WeatherTuning::default(),
            particle: ParticleTuning::default(),
            special: SpecialTuning::default(),
            popup: PopupTuning::default(),
            balloon_colors: vec![
                [0x3b, 0xb3, 0xe0],
                [0xe7, 0x4c, 0x3c],
                [0x2e, 0xcc, 0x71],
                [0xf3, 0x9c, 0x12],
                [0x9b, 0x59, 0xb6],
                [0xe9, 0x1e, 0x63],
                [0x00, 0xbc, 0xd4],
            ],
            bird_colors: vec![[0xff, 0x6b, 0x6b], [0x4e, 0xcd, 0xc4]],
        }
    }
}

impl Tuning {
    /// Particle color for a balloon pattern (palette wraps)
    pub fn balloon_color(&self, pattern: usize) -> [u8; 3] {
        if self.balloon_colors.is_empty() {
            return [255, 255, 255];
        }
        self.balloon_colors[pattern % self.balloon_colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{"max_balloons": 5, "pump": {"max_handle_y": 80.0}}"#).unwrap();
        assert_eq!(tuning.max_balloons, 5);
        assert_eq!(tuning.pump.max_handle_y, 80.0);
        assert_eq!(tuning.pump.handle_speed_down, 8.0);
        assert_eq!(tuning.balloon, BalloonTuning::default());
    }

    #[test]
    fn test_balloon_color_wraps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.balloon_color(0), tuning.balloon_color(7));
        assert_eq!(tuning.balloon_color(9), [0x2e, 0xcc, 0x71]);
    }
}
