//! Fixed timestep simulation step
//!
//! Advances the game by one 60 Hz step. Ordering matters: weather and
//! scenery first, then the pump, then the balloon on the nozzle, then
//! everything that flies.

use super::balloon::Balloon;
use super::entities::{Entity, UpdateCtx};
use super::game::Game;

impl Game {
    /// Advance one step; `now_ms` is the host clock, used for timed effects
    pub fn update(&mut self, now_ms: f64) {
        if self.game_over {
            return;
        }
        self.now_ms = now_ms;

        {
            let mut ctx = UpdateCtx {
                bounds: self.bounds,
                tuning: &self.tuning,
                rng: &mut self.rng,
            };

            if let Some(kind) = self.weather.update(&mut ctx, now_ms) {
                log::info!("Weather changed to {}", kind.as_str());
            }

            for cloud in &mut self.clouds {
                cloud.update(&mut ctx);
            }

            if self.birds_frozen && now_ms > self.freeze_end_ms {
                self.birds_frozen = false;
                log::debug!("Birds thawed");
            }
            if !self.birds_frozen {
                for bird in &mut self.birds {
                    bird.update(&mut ctx);
                }
            }
        }

        if let Err(e) = self.weather.snapshot().save(self.storage.as_mut()) {
            log::debug!("Weather not saved: {e}");
        }

        // Pump drives balloon creation in auto mode
        let pump = self.pump.update();
        if pump.needs_new_balloon && self.inflating.is_none() {
            self.create_balloon_if_needed();
        }

        if self.pump.should_inflate() {
            if let Some(balloon) = self.inflating.as_mut().filter(|b| b.is_inflating()) {
                balloon.inflate(
                    self.tuning.balloon.inflate_amount,
                    &self.tuning.balloon,
                    &mut self.rng,
                );
            }
        }

        if let Some(balloon) = self.inflating.take_if(|b| b.is_flying()) {
            self.launch(balloon);
        }

        let mut ctx = UpdateCtx {
            bounds: self.bounds,
            tuning: &self.tuning,
            rng: &mut self.rng,
        };
        self.balloons
            .retain_mut(|b| !b.is_popped() && b.update(&mut ctx));
        self.particles.retain_mut(|p| p.update(&mut ctx));
        self.popups.retain_mut(|p| p.update(&mut ctx));
    }

    /// Move a fully inflated balloon off the nozzle into the sky
    fn launch(&mut self, mut balloon: Balloon) {
        balloon.pos = self.pump.balloon_anchor(balloon.size);

        self.balloons.retain(|b| !b.is_popped());
        let capacity = self.tuning.max_balloons.max(1);
        while self.balloons.len() >= capacity {
            let evicted = self.balloons.remove(0);
            self.symbols.give_back(evicted.symbol);
            log::debug!("Evicted balloon {} '{}'", evicted.id, evicted.symbol.key());
        }

        log::debug!("Balloon {} launched", balloon.id);
        self.balloons.push(balloon);

        if !self.pump.is_auto() {
            self.pump.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::Bounds;
    use crate::persistence::{MemoryStorage, Storage, WEATHER_KEY};
    use crate::sim::game::ClickOutcome;
    use crate::sim::pump::PumpState;
    use crate::tuning::Tuning;

    const STEP_MS: f64 = 1000.0 / 60.0;

    fn game(seed: u64) -> Game {
        let mut g = Game::new(
            seed,
            Bounds::new(1000.0, 800.0),
            Tuning::default(),
            Box::new(MemoryStorage::new()),
            0.0,
        );
        g.birds.clear();
        g
    }

    /// Finish the balloon on the nozzle and run one step to launch it
    fn launch_one(g: &mut Game, now_ms: f64) {
        g.create_balloon_if_needed();
        if let Some(b) = g.inflating.as_mut() {
            let max = b.max_size;
            b.inflate(max, &g.tuning.balloon, &mut g.rng);
        }
        g.update(now_ms);
    }

    #[test]
    fn test_update_noop_when_game_over() {
        let mut g = game(1);
        launch_one(&mut g, STEP_MS);
        g.game_over = true;

        let pos = g.balloons[0].pos;
        let time = g.weather.time_of_day;
        g.update(2.0 * STEP_MS);
        assert_eq!(g.balloons[0].pos, pos);
        assert_eq!(g.weather.time_of_day, time);
        assert_eq!(g.now_ms(), STEP_MS);
    }

    #[test]
    fn test_manual_pumping_launches_and_releases() {
        let mut g = game(2);
        let handle = g.pump.handle_rect().center();
        assert_eq!(g.handle_click(handle.x, handle.y), ClickOutcome::PressedPump);

        let mut steps = 0;
        while g.balloons.is_empty() {
            steps += 1;
            g.update(steps as f64 * STEP_MS);
            assert!(steps < 100, "balloon never launched");
        }
        // 80 px at 2.5 px per inflating step
        assert_eq!(steps, 32);
        assert!(g.inflating_balloon().is_none());
        assert!(g.balloons[0].is_flying());
        assert!(!g.pump.is_pressing());
    }

    #[test]
    fn test_no_inflation_inside_dead_zone() {
        let mut g = game(3);
        g.create_balloon_if_needed();
        g.update(STEP_MS);
        assert_eq!(g.inflating_balloon().map(|b| b.size), Some(0.0));
    }

    #[test]
    fn test_capacity_evicts_oldest_and_returns_symbol() {
        let mut g = game(4);
        let capacity = g.tuning.max_balloons;
        for i in 0..capacity {
            launch_one(&mut g, i as f64 * STEP_MS);
        }
        assert_eq!(g.balloons.len(), capacity);
        let oldest = g.balloons[0].id;
        let oldest_symbol = g.balloons[0].symbol;

        launch_one(&mut g, capacity as f64 * STEP_MS);
        assert_eq!(g.balloons.len(), capacity);
        assert!(g.balloons.iter().all(|b| b.id != oldest));
        assert_eq!(g.symbols.in_use_count(), capacity);
        assert!(!g.symbols.is_in_use(oldest_symbol));
    }

    #[test]
    fn test_popped_balloons_dropped_next_step() {
        let mut g = game(5);
        launch_one(&mut g, STEP_MS);
        g.pop_balloon(0, false);
        g.update(2.0 * STEP_MS);
        assert!(g.balloons.is_empty());
        assert!(!g.particles.is_empty());

        for step in 3..200 {
            g.update(step as f64 * STEP_MS);
        }
        assert!(g.particles.is_empty());
        assert!(g.popups.is_empty());
    }

    #[test]
    fn test_auto_pump_produces_balloons() {
        let mut g = game(6);
        g.pump.toggle_auto_inflate();
        for step in 1..=600 {
            g.update(step as f64 * STEP_MS);
            assert_eq!(g.pump.state(), PumpState::AutoCycling);
        }
        assert!(g.balloons.len() >= 3);
    }

    #[test]
    fn test_freeze_stops_birds_until_deadline() {
        let mut g = game(7);
        g.spawn_birds();
        g.birds_frozen = true;
        g.freeze_end_ms = 1000.0;

        let before: Vec<Vec2> = g.birds.iter().map(|b| b.pos).collect();
        g.update(500.0);
        let during: Vec<Vec2> = g.birds.iter().map(|b| b.pos).collect();
        assert_eq!(before, during);
        assert!(g.birds_frozen());

        g.update(1000.5);
        assert!(!g.birds_frozen());
        assert!(g.birds.iter().zip(&before).all(|(b, p)| b.pos != *p));
    }

    #[test]
    fn test_weather_saved_each_step() {
        let mut g = game(8);
        g.update(STEP_MS);
        let raw = g.storage.get(WEATHER_KEY).unwrap();
        assert!(raw.is_some_and(|json| json.contains("timeOfDay")));
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = |seed| {
            let mut g = game(seed);
            g.pump.toggle_auto_inflate();
            for step in 1..=400 {
                g.update(step as f64 * STEP_MS);
            }
            g.balloons
                .iter()
                .map(|b| (b.id, b.pos, b.symbol))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
