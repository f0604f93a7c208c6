//! Ambient and effect entities: clouds, birds, particles, score popups

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::balloon::SpecialKind;
use crate::tuning::Tuning;
use crate::{Bounds, point_in_circle, random_range};

/// Everything an entity needs to advance one step
pub struct UpdateCtx<'a> {
    pub bounds: Bounds,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
}

/// A simulated entity
pub trait Entity {
    /// Advance one step; returns false once the entity should be discarded
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool;
}

/// Background cloud drifting right, recycled at the left edge
#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub scale: f32,
    pub speed: f32,
}

impl Cloud {
    pub fn spawn(bounds: Bounds, tuning: &Tuning, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * bounds.width,
                rng.random::<f32>() * bounds.height * 0.6,
            ),
            scale: random_range(rng, 0.5, 1.0),
            speed: random_range(rng, tuning.cloud.speed_min, tuning.cloud.speed_max),
        }
    }
}

impl Entity for Cloud {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        self.pos.x += self.speed;
        if self.pos.x > ctx.bounds.width + 150.0 {
            self.pos.x = -200.0;
            self.pos.y = ctx.rng.random::<f32>() * ctx.bounds.height * 0.6;
        }
        true
    }
}

/// Obstacle bird; clicking one ends the game
#[derive(Debug, Clone)]
pub struct Bird {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub wing_angle: f32,
    pub wing_speed: f32,
    pub color: [u8; 3],
}

impl Bird {
    pub fn spawn(bounds: Bounds, tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let color = if tuning.bird_colors.is_empty() {
            [0xff, 0x6b, 0x6b]
        } else {
            tuning.bird_colors[rng.random_range(0..tuning.bird_colors.len())]
        };
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * bounds.width,
                100.0 + rng.random::<f32>() * bounds.height * 0.5,
            ),
            size: tuning.bird.size,
            speed: random_range(rng, tuning.bird.speed_min, tuning.bird.speed_max),
            wing_angle: 0.0,
            wing_speed: tuning.bird.wing_speed,
            color,
        }
    }

    /// Vertical wing displacement for the current flap phase
    pub fn wing_offset(&self) -> f32 {
        self.wing_angle.sin() * 10.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        point_in_circle(px, py, self.pos, self.size)
    }
}

impl Entity for Bird {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        self.wing_angle += self.wing_speed;
        self.pos.x += self.speed;
        self.pos.y += (self.wing_angle * 0.5).sin() * 0.5;

        if self.pos.x > ctx.bounds.width + 100.0 {
            self.pos.x = -100.0;
            self.pos.y = 100.0 + ctx.rng.random::<f32>() * ctx.bounds.height * 0.5;
        }
        true
    }
}

/// Burst fragment from a popped balloon
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    pub size: f32,
    /// 1.0 at spawn, discarded at 0
    pub life: f32,
    pub decay: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Particle {
    pub fn new(pos: Vec2, color: [u8; 3], tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let half = tuning.particle.speed / 2.0;
        Self {
            pos,
            vel: Vec2::new(random_range(rng, -half, half), random_range(rng, -half, half)),
            color,
            size: random_range(rng, tuning.particle.size_min, tuning.particle.size_max),
            life: 1.0,
            decay: random_range(rng, 0.02, 0.04),
            rotation: random_range(rng, 0.0, std::f32::consts::TAU),
            rotation_speed: random_range(rng, -0.15, 0.15),
        }
    }
}

impl Entity for Particle {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        self.pos += self.vel;
        self.vel.y += ctx.tuning.particle.gravity;
        self.vel.x *= 0.98;
        self.life -= self.decay;
        self.rotation += self.rotation_speed;
        self.life > 0.0
    }
}

/// Floating "+N" text that rises and fades after a pop
#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub points: u64,
    pub special: SpecialKind,
    pub life: f32,
    pub scale: f32,
}

impl ScorePopup {
    pub fn new(pos: Vec2, points: u64, special: SpecialKind) -> Self {
        Self {
            pos,
            points,
            special,
            life: 1.0,
            scale: 1.0,
        }
    }

    /// Worth more than a plain pop
    pub fn is_special(&self) -> bool {
        self.points > 1
    }

    /// Text without the badge
    pub fn text(&self) -> String {
        format!("+{}", self.points)
    }

    /// Full label, e.g. "+5 🌟"
    pub fn label(&self) -> String {
        match self.special.badge() {
            Some(badge) => format!("+{} {}", self.points, badge),
            None => self.text(),
        }
    }
}

impl Entity for ScorePopup {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        let tuning = &ctx.tuning.popup;
        self.pos.y -= tuning.rise_speed;
        self.life -= tuning.fade_speed;

        // Grow briefly, then settle back while fading
        self.scale = if self.life > 0.8 {
            1.0 + (1.0 - self.life) * 2.0
        } else {
            1.0 + 0.4 * (self.life / 0.8)
        };

        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx<'a>(tuning: &'a Tuning, rng: &'a mut Pcg32) -> UpdateCtx<'a> {
        UpdateCtx {
            bounds: Bounds::new(800.0, 600.0),
            tuning,
            rng,
        }
    }

    #[test]
    fn test_cloud_wraps_to_left() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut cloud = Cloud {
            pos: Vec2::new(949.9, 10.0),
            scale: 1.0,
            speed: 0.5,
        };
        let mut ctx = ctx(&tuning, &mut rng);
        assert!(cloud.update(&mut ctx));
        assert_eq!(cloud.pos.x, -200.0);
        assert!(cloud.pos.y >= 0.0 && cloud.pos.y <= 360.0);
    }

    #[test]
    fn test_bird_wraps_and_never_dies() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut bird = Bird::spawn(Bounds::new(800.0, 600.0), &tuning, &mut rng);
        let mut ctx = ctx(&tuning, &mut rng);
        let mut wrapped = false;
        for _ in 0..1000 {
            let before = bird.pos.x;
            assert!(bird.update(&mut ctx));
            if bird.pos.x < before {
                wrapped = true;
                assert_eq!(bird.pos.x, -100.0);
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn test_bird_hit_radius() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bird = Bird::spawn(Bounds::new(800.0, 600.0), &tuning, &mut rng);
        bird.pos = Vec2::new(100.0, 100.0);
        assert!(bird.contains(100.0, 100.0));
        assert!(bird.contains(139.0, 100.0));
        assert!(!bird.contains(141.0, 100.0));
    }

    #[test]
    fn test_particle_decays_to_death() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut particle = Particle::new(Vec2::ZERO, [255, 0, 0], &tuning, &mut rng);
        let mut ctx = ctx(&tuning, &mut rng);

        let mut steps = 0;
        while particle.update(&mut ctx) {
            steps += 1;
            assert!(particle.life > 0.0 && particle.life < 1.0);
        }
        // Decay is 0.02..0.04 per step
        assert!((25..=50).contains(&steps));
    }

    #[test]
    fn test_popup_rises_and_fades() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut popup = ScorePopup::new(Vec2::new(0.0, 100.0), 5, SpecialKind::Golden);
        assert_eq!(popup.label(), "+5 🌟");
        assert!(popup.is_special());

        let mut ctx = ctx(&tuning, &mut rng);
        assert!(popup.update(&mut ctx));
        assert_eq!(popup.pos.y, 98.0);
        assert!(popup.scale > 1.0);

        let mut alive = true;
        for _ in 0..60 {
            alive = popup.update(&mut ctx);
        }
        assert!(!alive);
    }

    #[test]
    fn test_plain_popup_label() {
        let popup = ScorePopup::new(Vec2::ZERO, 1, SpecialKind::None);
        assert_eq!(popup.label(), "+1");
        assert!(!popup.is_special());
    }
}
