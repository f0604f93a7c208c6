//! The air pump: handle travel, inflation gating and the auto-pump cycle

use glam::Vec2;

use crate::tuning::PumpTuning;
use crate::{Bounds, Rect};

/// Handle travel while auto-pumping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Handle moving toward `max_handle_y`
    Push,
    /// Handle moving back to rest
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpMode {
    Manual,
    Auto { stroke: Stroke },
}

/// Observable pump state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    PressedManual,
    ReleasedManual,
    AutoCycling,
}

/// Result of one pump step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpUpdate {
    /// Set on the step an auto-pump down-stroke completes
    pub needs_new_balloon: bool,
}

/// Natural sizes of the pump part images, once known
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PumpParts {
    pub body: Option<Vec2>,
    pub handle: Option<Vec2>,
    pub inflator: Option<Vec2>,
}

/// Fallback sizes used for hit-testing before the images arrive
const FALLBACK_BODY: Vec2 = Vec2::new(200.0, 200.0);
const FALLBACK_HANDLE: Vec2 = Vec2::new(100.0, 100.0);
const FALLBACK_INFLATOR: Vec2 = Vec2::new(100.0, 100.0);
/// Vertical offset of the handle's rest position into the body
const HANDLE_SEAT: f32 = 90.0;
const AUTO_BUTTON_SIZE: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct AirPump {
    pub handle_y: f32,
    pub max_handle_y: f32,
    pressing: bool,
    pump_count: u32,
    mode: PumpMode,
    /// Pump center; follows the bottom-right corner of the viewport
    pub origin: Vec2,
    /// Where balloons attach
    pub nozzle: Vec2,
    parts: PumpParts,
    tuning: PumpTuning,
}

impl AirPump {
    pub fn new(tuning: PumpTuning, bounds: Bounds) -> Self {
        let mut pump = Self {
            handle_y: 0.0,
            max_handle_y: tuning.max_handle_y,
            pressing: false,
            pump_count: 0,
            mode: PumpMode::Manual,
            origin: Vec2::ZERO,
            nozzle: Vec2::ZERO,
            parts: PumpParts::default(),
            tuning,
        };
        pump.set_viewport(bounds);
        pump
    }

    /// Reposition relative to the viewport
    pub fn set_viewport(&mut self, bounds: Bounds) {
        self.origin = Vec2::new(bounds.width - 150.0, bounds.height - 120.0);
        self.nozzle = self.origin + Vec2::new(-150.0, -30.0);
    }

    pub fn set_parts(&mut self, parts: PumpParts) {
        self.parts = parts;
    }

    pub fn press(&mut self) {
        if !self.pressing {
            self.pressing = true;
            self.pump_count += 1;
        }
    }

    pub fn release(&mut self) {
        self.pressing = false;
    }

    pub fn toggle_auto_inflate(&mut self) {
        self.mode = match self.mode {
            PumpMode::Manual => {
                self.pressing = false;
                PumpMode::Auto {
                    stroke: Stroke::Push,
                }
            }
            PumpMode::Auto { .. } => PumpMode::Manual,
        };
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.mode, PumpMode::Auto { .. })
    }

    pub fn is_pressing(&self) -> bool {
        self.pressing
    }

    pub fn pump_count(&self) -> u32 {
        self.pump_count
    }

    pub fn mode(&self) -> PumpMode {
        self.mode
    }

    pub fn state(&self) -> PumpState {
        match self.mode {
            PumpMode::Auto { .. } => PumpState::AutoCycling,
            PumpMode::Manual if self.pressing => PumpState::PressedManual,
            PumpMode::Manual if self.handle_y > 0.0 => PumpState::ReleasedManual,
            PumpMode::Manual => PumpState::Idle,
        }
    }

    /// Advance the handle one step
    pub fn update(&mut self) -> PumpUpdate {
        match self.mode {
            PumpMode::Auto { stroke } => {
                let speed = self.tuning.auto_pump_speed;
                match stroke {
                    Stroke::Push if self.handle_y < self.max_handle_y => self.handle_y += speed,
                    Stroke::Push => {
                        self.mode = PumpMode::Auto {
                            stroke: Stroke::Return,
                        }
                    }
                    Stroke::Return if self.handle_y > 0.0 => self.handle_y -= speed,
                    Stroke::Return => {
                        self.mode = PumpMode::Auto {
                            stroke: Stroke::Push,
                        };
                        self.handle_y = 0.0;
                        return PumpUpdate {
                            needs_new_balloon: true,
                        };
                    }
                }
            }
            PumpMode::Manual => {
                if self.pressing && self.handle_y < self.max_handle_y {
                    self.handle_y += self.tuning.handle_speed_down;
                } else if !self.pressing && self.handle_y > 0.0 {
                    self.handle_y -= self.tuning.handle_speed_up;
                }
            }
        }

        self.handle_y = self.handle_y.clamp(0.0, self.max_handle_y.max(0.0));
        PumpUpdate::default()
    }

    /// Handle is past the dead zone
    pub fn should_inflate(&self) -> bool {
        self.handle_y > self.tuning.dead_zone
    }

    fn scaled(&self, natural: Option<Vec2>, fallback: Vec2) -> Vec2 {
        natural.unwrap_or(fallback) * self.tuning.scale
    }

    pub fn body_rect(&self) -> Rect {
        let size = self.scaled(self.parts.body, FALLBACK_BODY);
        Rect::centered(self.origin, size.x, size.y)
    }

    pub fn handle_rect(&self) -> Rect {
        let body = self.scaled(self.parts.body, FALLBACK_BODY);
        let handle = self.scaled(self.parts.handle, FALLBACK_HANDLE);
        Rect::new(
            self.origin.x - handle.x / 2.0,
            self.origin.y - body.y / 2.0 - handle.y + HANDLE_SEAT + self.handle_y,
            handle.x,
            handle.y,
        )
    }

    pub fn inflator_rect(&self) -> Rect {
        let size = self.scaled(self.parts.inflator, FALLBACK_INFLATOR);
        Rect::centered(self.nozzle, size.x, size.y)
    }

    pub fn auto_button_rect(&self) -> Rect {
        Rect::centered(
            self.nozzle + Vec2::new(60.0, -20.0),
            AUTO_BUTTON_SIZE,
            AUTO_BUTTON_SIZE,
        )
    }

    pub fn contains_handle(&self, px: f32, py: f32) -> bool {
        self.handle_rect().contains(px, py)
    }

    pub fn contains_auto_button(&self, px: f32, py: f32) -> bool {
        self.auto_button_rect().contains(px, py)
    }

    /// Where a new balloon is created
    pub fn spawn_point(&self) -> Vec2 {
        self.nozzle + Vec2::new(0.0, -80.0)
    }

    /// Center of a balloon of `size` sitting on the nozzle
    pub fn balloon_anchor(&self, size: f32) -> Vec2 {
        self.nozzle + Vec2::new(-60.0, -75.0 - size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pump() -> AirPump {
        AirPump::new(PumpTuning::default(), Bounds::new(1000.0, 800.0))
    }

    #[test]
    fn test_layout_follows_viewport() {
        let mut p = pump();
        assert_eq!(p.origin, Vec2::new(850.0, 680.0));
        assert_eq!(p.nozzle, Vec2::new(700.0, 650.0));

        p.set_viewport(Bounds::new(500.0, 400.0));
        assert_eq!(p.origin, Vec2::new(350.0, 280.0));
        assert_eq!(p.auto_button_rect(), Rect::new(240.0, 210.0, 40.0, 40.0));
    }

    #[test]
    fn test_press_counts_once_per_hold() {
        let mut p = pump();
        assert_eq!(p.state(), PumpState::Idle);
        p.press();
        p.press();
        assert_eq!(p.pump_count(), 1);
        assert_eq!(p.state(), PumpState::PressedManual);
        p.update();
        p.release();
        assert_eq!(p.state(), PumpState::ReleasedManual);
        p.press();
        assert_eq!(p.pump_count(), 2);
    }

    #[test]
    fn test_manual_press_and_release_clamped() {
        let mut p = pump();
        p.press();
        let mut last = p.handle_y;
        for _ in 0..20 {
            p.update();
            assert!(p.handle_y >= last);
            assert!(p.handle_y <= p.max_handle_y);
            last = p.handle_y;
        }
        assert_eq!(p.handle_y, p.max_handle_y);

        p.release();
        for _ in 0..30 {
            p.update();
            assert!(p.handle_y <= last);
            assert!(p.handle_y >= 0.0);
            last = p.handle_y;
        }
        assert_eq!(p.handle_y, 0.0);
        assert_eq!(p.state(), PumpState::Idle);
    }

    #[test]
    fn test_dead_zone() {
        let mut p = pump();
        p.handle_y = 5.0;
        assert!(!p.should_inflate());
        p.handle_y = 5.5;
        assert!(p.should_inflate());
    }

    #[test]
    fn test_auto_cycle_requests_one_balloon_per_cycle() {
        let mut p = pump();
        p.press();
        p.toggle_auto_inflate();
        assert!(!p.is_pressing());
        assert_eq!(p.state(), PumpState::AutoCycling);

        let mut requests = Vec::new();
        for step in 0..100 {
            if p.update().needs_new_balloon {
                requests.push(step);
            }
            assert!(p.handle_y >= 0.0 && p.handle_y <= p.max_handle_y);
        }
        assert!(requests.len() >= 2);
        let period = requests[1] - requests[0];
        assert!(requests.windows(2).all(|w| w[1] - w[0] == period));

        // Manual press is ignored while auto-cycling
        let before = p.handle_y;
        p.press();
        p.toggle_auto_inflate();
        assert_eq!(p.state(), PumpState::PressedManual);
        assert_eq!(p.handle_y, before);
    }

    #[test]
    fn test_handle_rect_uses_part_sizes() {
        let mut p = pump();
        let fallback = p.handle_rect();
        assert_eq!(fallback.width, 50.0);
        assert!(p.contains_handle(fallback.center().x, fallback.center().y));

        p.set_parts(PumpParts {
            body: Some(Vec2::new(300.0, 400.0)),
            handle: Some(Vec2::new(160.0, 120.0)),
            inflator: None,
        });
        let r = p.handle_rect();
        assert_eq!(r.width, 80.0);
        assert_eq!(r.height, 60.0);
        assert_eq!(r.y, 680.0 - 100.0 - 60.0 + 90.0);

        // Handle travels with handle_y
        p.handle_y = 20.0;
        assert_eq!(p.handle_rect().y, r.y + 20.0);
    }

    proptest! {
        #[test]
        fn prop_handle_always_clamped(presses in proptest::collection::vec(0u8..4, 0..300)) {
            let mut p = pump();
            for action in presses {
                match action {
                    0 => p.press(),
                    1 => p.release(),
                    2 => p.toggle_auto_inflate(),
                    _ => {}
                }
                p.update();
                prop_assert!(p.handle_y >= 0.0 && p.handle_y <= p.max_handle_y);
            }
        }
    }
}
