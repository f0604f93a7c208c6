//! Day/night clock, weather cycle and their ambient entities

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Entity, UpdateCtx};
use crate::settings::WeatherSettings;
use crate::tuning::WeatherTuning;
use crate::{Bounds, lerp_color, random_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    #[default]
    Sunny,
    Rainy,
    Cloudy,
}

impl WeatherKind {
    /// Round-robin successor
    pub fn next(self) -> Self {
        match self {
            WeatherKind::Sunny => WeatherKind::Rainy,
            WeatherKind::Rainy => WeatherKind::Cloudy,
            WeatherKind::Cloudy => WeatherKind::Sunny,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherKind::Sunny => "sunny",
            WeatherKind::Rainy => "rainy",
            WeatherKind::Cloudy => "cloudy",
        }
    }
}

/// Named band of the day/night clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl DayPhase {
    pub fn at(time_of_day: f32) -> Self {
        if time_of_day < 0.25 {
            DayPhase::Dawn
        } else if time_of_day < 0.5 {
            DayPhase::Day
        } else if time_of_day < 0.75 {
            DayPhase::Dusk
        } else {
            DayPhase::Night
        }
    }
}

/// Sky gradient colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyColors {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

const NIGHT_TOP: [u8; 3] = [25, 25, 50];
const NIGHT_BOTTOM: [u8; 3] = [15, 15, 35];
const DAY_TOP: [u8; 3] = [135, 206, 235];
const DAY_BOTTOM: [u8; 3] = [245, 230, 163];
const DUSK_TOP: [u8; 3] = [50, 30, 80];
const DUSK_BOTTOM: [u8; 3] = [30, 20, 50];

impl SkyColors {
    pub fn at(time_of_day: f32) -> Self {
        let t = time_of_day;
        match DayPhase::at(t) {
            DayPhase::Dawn => {
                let progress = t / 0.25;
                Self {
                    top: lerp_color(NIGHT_TOP, DAY_TOP, progress),
                    bottom: lerp_color(NIGHT_BOTTOM, DAY_BOTTOM, progress),
                }
            }
            DayPhase::Day => Self {
                top: DAY_TOP,
                bottom: DAY_BOTTOM,
            },
            DayPhase::Dusk => {
                let progress = (t - 0.5) / 0.25;
                Self {
                    top: lerp_color(DAY_TOP, DUSK_TOP, progress),
                    bottom: lerp_color(DAY_BOTTOM, DUSK_BOTTOM, progress),
                }
            }
            DayPhase::Night => Self {
                top: NIGHT_TOP,
                bottom: NIGHT_BOTTOM,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Raindrop {
    pub pos: Vec2,
    pub speed: f32,
    pub length: f32,
}

impl Raindrop {
    pub fn spawn(bounds: Bounds, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(rng.random::<f32>() * bounds.width, -10.0),
            speed: random_range(rng, 5.0, 10.0),
            length: random_range(rng, 15.0, 25.0),
        }
    }
}

impl Entity for Raindrop {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        self.pos.y += self.speed;
        self.pos.y < ctx.bounds.height
    }
}

/// One spoke around the sun; purely phase-animated
#[derive(Debug, Clone)]
pub struct SunRay {
    pub angle: f32,
    pub length: f32,
    pub pulse_offset: f32,
}

impl SunRay {
    pub fn new(index: usize, total: usize, rng: &mut Pcg32) -> Self {
        Self {
            angle: index as f32 / total.max(1) as f32 * std::f32::consts::TAU,
            length: 60.0,
            pulse_offset: random_range(rng, 0.0, std::f32::consts::TAU),
        }
    }

    pub fn current_length(&self, time_ms: f64) -> f32 {
        let phase = (time_ms * 0.002) as f32 + self.pulse_offset;
        self.length + phase.sin() * 10.0
    }
}

/// Twinkling star, visible with the night intensity
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub twinkle_speed: f32,
    pub twinkle_offset: f32,
    pub brightness: f32,
}

impl Star {
    pub fn spawn(bounds: Bounds, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * bounds.width,
                rng.random::<f32>() * bounds.height * 0.7,
            ),
            size: random_range(rng, 1.0, 3.0),
            twinkle_speed: random_range(rng, 0.02, 0.05),
            twinkle_offset: random_range(rng, 0.0, std::f32::consts::TAU),
            brightness: random_range(rng, 0.5, 1.0),
        }
    }

    /// Opacity at `time_ms`; the twinkle phase advances per 60 Hz frame
    pub fn alpha(&self, time_ms: f64, night_intensity: f32) -> f32 {
        let frames = (time_ms * 0.06) as f32;
        let twinkle = (frames * self.twinkle_speed + self.twinkle_offset).sin() * 0.3 + 0.7;
        self.brightness * twinkle * night_intensity
    }
}

#[derive(Debug, Clone)]
pub struct WeatherManager {
    pub kind: WeatherKind,
    /// 0 = midnight before dawn, wraps at 1
    pub time_of_day: f32,
    pub day_night_speed: f32,
    pub change_interval_ms: f64,
    last_change_ms: f64,
    rain_chance: f64,
    pub raindrops: Vec<Raindrop>,
    pub sun_rays: Vec<SunRay>,
    pub stars: Vec<Star>,
    star_count: usize,
}

impl WeatherManager {
    pub fn new(
        settings: &WeatherSettings,
        tuning: &WeatherTuning,
        bounds: Bounds,
        now_ms: f64,
        rng: &mut Pcg32,
    ) -> Self {
        let sun_rays = (0..tuning.sun_ray_count)
            .map(|i| SunRay::new(i, tuning.sun_ray_count, rng))
            .collect();
        let stars = (0..tuning.star_count)
            .map(|_| Star::spawn(bounds, rng))
            .collect();

        Self {
            kind: settings.kind,
            time_of_day: settings.time_of_day,
            day_night_speed: settings.day_night_speed,
            change_interval_ms: settings.change_interval_ms,
            last_change_ms: now_ms,
            rain_chance: tuning.rain_chance,
            raindrops: Vec::new(),
            sun_rays,
            stars,
            star_count: tuning.star_count,
        }
    }

    /// Advance the clock, cycle the weather when due and move the rain
    ///
    /// Returns the new kind when the weather changed this step.
    pub fn update(&mut self, ctx: &mut UpdateCtx<'_>, now_ms: f64) -> Option<WeatherKind> {
        self.time_of_day += self.day_night_speed;
        if self.time_of_day >= 1.0 {
            self.time_of_day = 0.0;
        }

        let mut changed = None;
        if now_ms - self.last_change_ms > self.change_interval_ms {
            self.change_weather();
            self.last_change_ms = now_ms;
            changed = Some(self.kind);
        }

        if self.kind == WeatherKind::Rainy {
            if ctx.rng.random_bool(self.rain_chance.clamp(0.0, 1.0)) {
                self.raindrops.push(Raindrop::spawn(ctx.bounds, ctx.rng));
            }
            self.raindrops.retain_mut(|drop| drop.update(ctx));
        }

        changed
    }

    pub fn change_weather(&mut self) {
        self.kind = self.kind.next();
        self.raindrops.clear();
    }

    /// Regenerate stars for a new viewport
    pub fn resize(&mut self, bounds: Bounds, rng: &mut Pcg32) {
        self.stars = (0..self.star_count)
            .map(|_| Star::spawn(bounds, rng))
            .collect();
    }

    pub fn day_phase(&self) -> DayPhase {
        DayPhase::at(self.time_of_day)
    }

    pub fn sky_colors(&self) -> SkyColors {
        SkyColors::at(self.time_of_day)
    }

    /// 1 at midnight, fading to 0 through dawn and back up through the night band
    pub fn night_intensity(&self) -> f32 {
        let t = self.time_of_day;
        if t < 0.25 {
            (0.25 - t) / 0.25
        } else if t > 0.75 {
            (t - 0.75) / 0.25
        } else {
            0.0
        }
    }

    pub fn is_daytime(&self) -> bool {
        (0.25..=0.75).contains(&self.time_of_day)
    }

    pub fn is_nighttime(&self) -> bool {
        !self.is_daytime()
    }

    /// The record persisted between sessions
    pub fn snapshot(&self) -> WeatherSettings {
        WeatherSettings {
            kind: self.kind,
            time_of_day: self.time_of_day,
            day_night_speed: self.day_night_speed,
            change_interval_ms: self.change_interval_ms,
            ..WeatherSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use rand::SeedableRng;

    fn manager(settings: WeatherSettings) -> WeatherManager {
        let mut rng = Pcg32::seed_from_u64(1);
        WeatherManager::new(
            &settings,
            &WeatherTuning::default(),
            Bounds::new(800.0, 600.0),
            0.0,
            &mut rng,
        )
    }

    #[test]
    fn test_weather_cycles_round_robin_on_interval() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut w = manager(WeatherSettings::default());
        let mut ctx = UpdateCtx {
            bounds: Bounds::new(800.0, 600.0),
            tuning: &tuning,
            rng: &mut rng,
        };

        assert_eq!(w.update(&mut ctx, 15_000.0), None);
        assert_eq!(w.update(&mut ctx, 15_001.0), Some(WeatherKind::Rainy));
        assert_eq!(w.update(&mut ctx, 20_000.0), None);
        assert_eq!(w.update(&mut ctx, 30_002.0), Some(WeatherKind::Cloudy));
        assert_eq!(w.update(&mut ctx, 45_003.0), Some(WeatherKind::Sunny));
    }

    #[test]
    fn test_rain_spawns_only_while_rainy_and_clears_on_change() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut w = manager(WeatherSettings {
            kind: WeatherKind::Rainy,
            ..WeatherSettings::default()
        });
        let bounds = Bounds::new(800.0, 600.0);
        let mut ctx = UpdateCtx {
            bounds,
            tuning: &tuning,
            rng: &mut rng,
        };
        for step in 0..200 {
            w.update(&mut ctx, step as f64);
        }
        assert!(!w.raindrops.is_empty());
        assert!(w.raindrops.iter().all(|d| d.pos.y < bounds.height));

        w.change_weather();
        assert_eq!(w.kind, WeatherKind::Cloudy);
        assert!(w.raindrops.is_empty());
        for step in 0..50 {
            w.update(&mut ctx, step as f64);
        }
        assert!(w.raindrops.is_empty());
    }

    #[test]
    fn test_clock_wraps() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut w = manager(WeatherSettings {
            time_of_day: 0.99,
            day_night_speed: 0.006,
            ..WeatherSettings::default()
        });
        let mut ctx = UpdateCtx {
            bounds: Bounds::new(800.0, 600.0),
            tuning: &tuning,
            rng: &mut rng,
        };
        w.update(&mut ctx, 0.0);
        assert!(w.time_of_day < 1.0);
        w.update(&mut ctx, 0.0);
        assert_eq!(w.time_of_day, 0.0);
    }

    #[test]
    fn test_sky_colors_by_band() {
        assert_eq!(SkyColors::at(0.0).top, NIGHT_TOP);
        assert_eq!(SkyColors::at(0.3).top, DAY_TOP);
        assert_eq!(SkyColors::at(0.3).bottom, DAY_BOTTOM);
        assert_eq!(SkyColors::at(0.5).top, DAY_TOP);
        assert_eq!(SkyColors::at(0.8).bottom, NIGHT_BOTTOM);
        let mid_dawn = SkyColors::at(0.125);
        assert_eq!(mid_dawn.top, [80, 116, 143]);
    }

    #[test]
    fn test_night_intensity_and_daytime() {
        let mut w = manager(WeatherSettings::default());
        w.time_of_day = 0.0;
        assert_eq!(w.night_intensity(), 1.0);
        assert!(w.is_nighttime());
        w.time_of_day = 0.4;
        assert_eq!(w.night_intensity(), 0.0);
        assert!(w.is_daytime());
        assert_eq!(w.day_phase(), DayPhase::Day);
        w.time_of_day = 0.875;
        assert!((w.night_intensity() - 0.5).abs() < 1e-5);
        assert!(w.is_nighttime());
    }

    #[test]
    fn test_snapshot_round_trips_state() {
        let mut w = manager(WeatherSettings::default());
        w.kind = WeatherKind::Cloudy;
        w.time_of_day = 0.6;
        let snap = w.snapshot();
        assert_eq!(snap.kind, WeatherKind::Cloudy);
        assert_eq!(snap.time_of_day, 0.6);
        assert!(snap.validate().is_ok());
    }
}
