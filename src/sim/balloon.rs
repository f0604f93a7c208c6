//! Balloons: inflated at the pump, then free-flying until popped

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Entity, UpdateCtx};
use crate::tuning::{BalloonTuning, SpecialTuning};
use crate::{point_in_ellipse, random_direction, random_range};

/// Bonus effect carried by a balloon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpecialKind {
    #[default]
    None,
    /// Worth a fixed bonus instead of a single point
    Golden,
    /// Stops the birds for a while
    TimeFreeze,
    /// Pops every balloon nearby
    Bomb,
}

impl SpecialKind {
    /// Roll the special kind for a new balloon
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> Self {
        if !rng.random_bool(chance.clamp(0.0, 1.0)) {
            return SpecialKind::None;
        }
        let pick: f32 = rng.random();
        if pick < 0.33 {
            SpecialKind::Golden
        } else if pick < 0.66 {
            SpecialKind::TimeFreeze
        } else {
            SpecialKind::Bomb
        }
    }

    pub fn is_special(self) -> bool {
        self != SpecialKind::None
    }

    /// Points for popping a balloon of this kind (chain bonuses excluded)
    pub fn points(self, tuning: &SpecialTuning) -> u64 {
        match self {
            SpecialKind::Golden => tuning.golden_points,
            SpecialKind::None | SpecialKind::TimeFreeze | SpecialKind::Bomb => 1,
        }
    }

    /// Signature color, used for burst particles
    pub fn color(self) -> Option<[u8; 3]> {
        match self {
            SpecialKind::None => None,
            SpecialKind::Golden => Some([0xff, 0xd7, 0x00]),
            SpecialKind::TimeFreeze => Some([0x00, 0xbf, 0xff]),
            SpecialKind::Bomb => Some([0xff, 0x44, 0x44]),
        }
    }

    /// Icon shown next to the score popup
    pub fn badge(self) -> Option<&'static str> {
        match self {
            SpecialKind::None => None,
            SpecialKind::Golden => Some("🌟"),
            SpecialKind::TimeFreeze => Some("⏱️"),
            SpecialKind::Bomb => Some("💥"),
        }
    }
}

/// Letter or digit printed on a balloon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// 0 = 'A' .. 25 = 'Z'
    Letter(u8),
    /// 0..=9
    Digit(u8),
}

impl Symbol {
    pub fn key(self) -> char {
        match self {
            Symbol::Letter(i) => (b'A' + i) as char,
            Symbol::Digit(i) => (b'0' + i) as char,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalloonPhase {
    /// Attached to the pump nozzle, growing
    Inflating,
    /// Released, bouncing around the screen
    Flying,
}

#[derive(Debug, Clone)]
pub struct Balloon {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub max_size: f32,
    pub string_length: f32,
    phase: BalloonPhase,
    popped: bool,
    pub wobble: f32,
    pub wobble_speed: f32,
    pub rotation: f32,
    /// Pulse phase of the special-balloon glow
    pub glow_phase: f32,
    /// Index into the pattern images
    pub pattern: usize,
    pub symbol: Symbol,
    pub special: SpecialKind,
}

impl Balloon {
    pub fn new(
        id: u32,
        pos: Vec2,
        pattern: usize,
        symbol: Symbol,
        special: SpecialKind,
        tuning: &BalloonTuning,
        rng: &mut Pcg32,
    ) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: 0.0,
            max_size: tuning.max_size,
            string_length: tuning.string_length,
            phase: BalloonPhase::Inflating,
            popped: false,
            wobble: 0.0,
            wobble_speed: random_range(rng, tuning.wobble_speed_min, tuning.wobble_speed_max),
            rotation: 0.0,
            glow_phase: 0.0,
            pattern,
            symbol,
            special,
        }
    }

    pub fn phase(&self) -> BalloonPhase {
        self.phase
    }

    pub fn is_inflating(&self) -> bool {
        self.phase == BalloonPhase::Inflating
    }

    pub fn is_flying(&self) -> bool {
        self.phase == BalloonPhase::Flying
    }

    pub fn is_popped(&self) -> bool {
        self.popped
    }

    /// Grow by `amount`; returns true on the call that completes inflation
    pub fn inflate(&mut self, amount: f32, tuning: &BalloonTuning, rng: &mut Pcg32) -> bool {
        if !self.is_inflating() || self.popped || self.size >= self.max_size {
            return false;
        }

        self.size += amount.max(0.0);
        if self.size >= self.max_size {
            self.size = self.max_size;
            self.start_flying(tuning, rng);
            return true;
        }
        false
    }

    fn start_flying(&mut self, tuning: &BalloonTuning, rng: &mut Pcg32) {
        self.phase = BalloonPhase::Flying;
        let speed = random_range(rng, tuning.launch_speed_min, tuning.launch_speed_max);
        self.vel = random_direction(rng) * speed + Vec2::new(0.0, tuning.launch_lift);
    }

    /// Mark popped; returns false if it already was
    pub fn pop(&mut self) -> bool {
        if self.popped {
            return false;
        }
        self.popped = true;
        true
    }

    /// Elliptical hit test, narrower horizontally than vertically
    pub fn contains(&self, px: f32, py: f32) -> bool {
        if self.popped || self.size <= 0.0 {
            return false;
        }
        point_in_ellipse(px, py, self.pos, self.size * 0.7_f32.sqrt(), self.size)
    }
}

/// Clamp that tolerates an inverted range (viewport smaller than the margins)
#[inline]
fn clamp_inside(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

impl Entity for Balloon {
    fn update(&mut self, ctx: &mut UpdateCtx<'_>) -> bool {
        if !self.is_flying() || self.popped {
            return true;
        }
        let t = &ctx.tuning.balloon;

        self.pos += self.vel;

        self.wobble += self.wobble_speed;
        self.rotation = self.wobble.sin() * 0.1;

        if self.special.is_special() {
            self.glow_phase += 0.1;
        }

        // Bounce off the walls; the string hangs below the bottom margin
        let margin = self.size;
        let bottom_margin = self.size + self.string_length;
        let (w, h) = (ctx.bounds.width, ctx.bounds.height);

        if self.pos.x < margin || self.pos.x > w - margin {
            self.vel.x *= -t.bounce_energy;
            self.pos.x = clamp_inside(self.pos.x, margin, w - margin);
            self.vel.y += random_range(ctx.rng, -t.bounce_kick, t.bounce_kick);
        }

        if self.pos.y < margin || self.pos.y > h - bottom_margin {
            self.vel.y *= -t.bounce_energy;
            self.pos.y = clamp_inside(self.pos.y, margin, h - bottom_margin);
            self.vel.x += random_range(ctx.rng, -t.bounce_kick, t.bounce_kick);
        }

        self.vel.x += random_range(ctx.rng, -t.drift, t.drift);
        self.vel.y += random_range(ctx.rng, -t.drift, t.drift);

        let speed = self.vel.length();
        if speed < t.min_speed {
            self.vel += random_direction(ctx.rng) * t.speed_boost;
        }
        if speed > t.max_speed {
            self.vel = self.vel / speed * t.max_speed;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, Tuning};
    use rand::SeedableRng;

    fn balloon(rng: &mut Pcg32) -> Balloon {
        Balloon::new(
            1,
            Vec2::new(400.0, 300.0),
            0,
            Symbol::Letter(0),
            SpecialKind::None,
            &BalloonTuning::default(),
            rng,
        )
    }

    #[test]
    fn test_inflate_flips_to_flying_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = BalloonTuning::default();
        let mut b = balloon(&mut rng);

        let mut last_size = b.size;
        let mut completions = 0;
        for _ in 0..100 {
            let was_inflating = b.is_inflating();
            if b.inflate(tuning.inflate_amount, &tuning, &mut rng) {
                completions += 1;
                assert!(was_inflating);
            }
            assert!(b.size >= last_size);
            last_size = b.size;
        }

        assert_eq!(completions, 1);
        assert!(b.is_flying());
        assert!(!b.is_inflating());
        assert_eq!(b.size, tuning.max_size);
        assert!(b.vel.length() > 0.0);
    }

    #[test]
    fn test_inflate_noop_after_flying() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tuning = BalloonTuning::default();
        let mut b = balloon(&mut rng);
        b.inflate(tuning.max_size, &tuning, &mut rng);
        assert!(b.is_flying());

        let vel = b.vel;
        assert!(!b.inflate(10.0, &tuning, &mut rng));
        assert_eq!(b.size, tuning.max_size);
        assert_eq!(b.vel, vel);
    }

    #[test]
    fn test_contains_is_elliptical() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut b = balloon(&mut rng);
        b.size = 80.0;

        assert!(b.contains(400.0, 300.0));
        // Vertical radius is the full size, horizontal is narrower
        assert!(b.contains(400.0, 300.0 + 75.0));
        assert!(!b.contains(400.0 + 75.0, 300.0));
        assert!(!b.contains(400.0, 300.0 + 81.0));
        assert!(!b.contains(400.0 + 67.0, 300.0));

        b.pop();
        assert!(!b.contains(400.0, 300.0));
    }

    #[test]
    fn test_pop_is_idempotent() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut b = balloon(&mut rng);
        assert!(b.pop());
        assert!(!b.pop());
        assert!(b.is_popped());
    }

    #[test]
    fn test_flight_stays_in_bounds_and_speed_capped() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::default();
        let mut b = balloon(&mut rng);
        b.inflate(tuning.balloon.max_size, &tuning.balloon, &mut rng);

        let bounds = Bounds::new(800.0, 600.0);
        let mut sim_rng = Pcg32::seed_from_u64(6);
        for _ in 0..2000 {
            let mut ctx = UpdateCtx {
                bounds,
                tuning: &tuning,
                rng: &mut sim_rng,
            };
            assert!(b.update(&mut ctx));
            assert!(b.pos.x >= b.size - 0.001 && b.pos.x <= bounds.width - b.size + 0.001);
            assert!(b.pos.y >= b.size - 0.001);
            assert!(b.pos.y <= bounds.height - b.size - b.string_length + 0.001);
            // Cap applies to the pre-drift speed, so allow the floor boost on top
            assert!(b.vel.length() <= tuning.balloon.max_speed + 2.0);
        }
    }

    #[test]
    fn test_special_roll_distribution() {
        let mut rng = Pcg32::seed_from_u64(9);
        assert_eq!(SpecialKind::roll(&mut rng, 0.0), SpecialKind::None);

        let mut seen = [0usize; 3];
        for _ in 0..3000 {
            match SpecialKind::roll(&mut rng, 1.0) {
                SpecialKind::Golden => seen[0] += 1,
                SpecialKind::TimeFreeze => seen[1] += 1,
                SpecialKind::Bomb => seen[2] += 1,
                SpecialKind::None => panic!("chance 1.0 must always be special"),
            }
        }
        assert!(seen.iter().all(|&n| n > 800));
    }

    #[test]
    fn test_symbol_keys() {
        assert_eq!(Symbol::Letter(0).key(), 'A');
        assert_eq!(Symbol::Letter(25).key(), 'Z');
        assert_eq!(Symbol::Digit(7).key(), '7');
    }
}
