//! Game orchestration: owns every entity, routes clicks, scores pops
//!
//! The per-step update lives in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::balloon::{Balloon, SpecialKind};
use super::entities::{Bird, Cloud, Particle, ScorePopup};
use super::pump::AirPump;
use super::symbols::SymbolPool;
use super::weather::WeatherManager;
use crate::assets::AssetCache;
use crate::consts::PATTERN_COUNT;
use crate::highscores::HighScore;
use crate::persistence::Storage;
use crate::settings::WeatherSettings;
use crate::tuning::Tuning;
use crate::ui::{BackButton, GameOverLayout};
use crate::Bounds;

/// Explosion particles at a bomb's center
const EXPLOSION_COLOR: [u8; 3] = [0xff, 0x66, 0x00];

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    /// Try Again on the game-over screen
    Retried,
    /// Back button
    Reset,
    /// Clicked a bird
    GameOver,
    /// Popped a balloon, worth `points` in total (chain included)
    Popped { id: u32, points: u64 },
    ToggledAuto,
    PressedPump,
}

pub struct Game {
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub(crate) bounds: Bounds,
    /// Host clock at the latest update, in ms
    pub(crate) now_ms: f64,
    pub(crate) score: u64,
    pub(crate) high_score: HighScore,
    pub(crate) game_over: bool,
    pub(crate) birds_frozen: bool,
    pub(crate) freeze_end_ms: f64,
    /// Flying balloons, oldest first
    pub(crate) balloons: Vec<Balloon>,
    /// Balloon on the nozzle, if any
    pub(crate) inflating: Option<Balloon>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) clouds: Vec<Cloud>,
    pub(crate) birds: Vec<Bird>,
    pub(crate) popups: Vec<ScorePopup>,
    pub(crate) symbols: SymbolPool,
    pub(crate) pump: AirPump,
    pub(crate) weather: WeatherManager,
    back_button: BackButton,
    assets_ready: bool,
    next_balloon_id: u32,
    pub(crate) storage: Box<dyn Storage>,
}

impl Game {
    /// Start a game, restoring the high score and weather from `storage`
    pub fn new(
        seed: u64,
        bounds: Bounds,
        tuning: Tuning,
        storage: Box<dyn Storage>,
        now_ms: f64,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let high_score = HighScore::load(storage.as_ref());
        let settings = WeatherSettings::load(
            storage.as_ref(),
            WeatherSettings::from_tuning(&tuning.weather),
        );
        let weather = WeatherManager::new(&settings, &tuning.weather, bounds, now_ms, &mut rng);
        let pump = AirPump::new(tuning.pump, bounds);

        let mut game = Self {
            tuning,
            rng,
            bounds,
            now_ms,
            score: 0,
            high_score,
            game_over: false,
            birds_frozen: false,
            freeze_end_ms: 0.0,
            balloons: Vec::new(),
            inflating: None,
            particles: Vec::new(),
            clouds: Vec::new(),
            birds: Vec::new(),
            popups: Vec::new(),
            symbols: SymbolPool::new(),
            pump,
            weather,
            back_button: BackButton::default(),
            assets_ready: false,
            next_balloon_id: 1,
            storage,
        };
        game.spawn_clouds();
        game.spawn_birds();

        log::info!(
            "Game started (seed {seed}, {}x{}, high score {})",
            bounds.width,
            bounds.height,
            game.high_score.best()
        );
        game
    }

    // --- Accessors -------------------------------------------------------

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn birds_frozen(&self) -> bool {
        self.birds_frozen
    }

    /// Time left on the freeze, 0 when not frozen
    pub fn freeze_remaining_ms(&self) -> f64 {
        if self.birds_frozen {
            (self.freeze_end_ms - self.now_ms).max(0.0)
        } else {
            0.0
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn inflating_balloon(&self) -> Option<&Balloon> {
        self.inflating.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub fn pump(&self) -> &AirPump {
        &self.pump
    }

    pub fn weather(&self) -> &WeatherManager {
        &self.weather
    }

    pub fn symbols(&self) -> &SymbolPool {
        &self.symbols
    }

    pub fn back_button(&self) -> &BackButton {
        &self.back_button
    }

    pub fn game_over_layout(&self) -> GameOverLayout {
        GameOverLayout::new(self.bounds)
    }

    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    // --- Input -----------------------------------------------------------

    /// Route a pointer press; the first matching target wins
    pub fn handle_click(&mut self, x: f32, y: f32) -> ClickOutcome {
        if self.game_over {
            if self.game_over_layout().retry_button.contains(x, y) {
                self.reset();
                return ClickOutcome::Retried;
            }
            return ClickOutcome::Ignored;
        }

        if self.back_button.contains(x, y) {
            self.reset();
            return ClickOutcome::Reset;
        }

        if self.birds.iter().any(|bird| bird.contains(x, y)) {
            self.game_over = true;
            log::info!("Hit a bird, game over with score {}", self.score);
            return ClickOutcome::GameOver;
        }

        // Newest balloon is drawn on top, so it is hit first
        if let Some(index) = self
            .balloons
            .iter()
            .rposition(|b| b.is_flying() && b.contains(x, y))
        {
            let id = self.balloons[index].id;
            let points = self.pop_balloon(index, false);
            return ClickOutcome::Popped { id, points };
        }

        if self.pump.contains_auto_button(x, y) {
            self.pump.toggle_auto_inflate();
            log::debug!("Auto pump {}", if self.pump.is_auto() { "on" } else { "off" });
            return ClickOutcome::ToggledAuto;
        }

        if self.pump.contains_handle(x, y) {
            self.pump.press();
            self.create_balloon_if_needed();
            return ClickOutcome::PressedPump;
        }

        ClickOutcome::Ignored
    }

    /// Pointer released anywhere
    pub fn handle_release(&mut self) {
        self.pump.release();
    }

    // --- Lifecycle -------------------------------------------------------

    /// New round; keeps the high score, weather and pump mode
    pub fn reset(&mut self) {
        self.game_over = false;
        self.score = 0;
        self.balloons.clear();
        self.particles.clear();
        self.popups.clear();
        self.inflating = None;
        self.birds_frozen = false;
        self.freeze_end_ms = 0.0;
        self.symbols.reset();
        self.spawn_birds();
        log::info!("Game reset");
    }

    /// Viewport changed: move the pump, respawn the scenery
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.pump.set_viewport(bounds);
        self.spawn_clouds();
        self.spawn_birds();
        self.weather.resize(bounds, &mut self.rng);
    }

    /// The image batch settled; pump hit-testing switches to real part sizes
    pub fn on_assets_loaded(&mut self, assets: &AssetCache) {
        self.pump.set_parts(assets.pump_parts());
        self.assets_ready = true;
        let progress = assets.progress();
        log::info!(
            "Assets ready ({} loaded, {} failed)",
            progress.settled - progress.failed,
            progress.failed
        );
    }

    pub(crate) fn spawn_clouds(&mut self) {
        let (bounds, tuning, rng) = (self.bounds, &self.tuning, &mut self.rng);
        self.clouds = (0..tuning.cloud.count)
            .map(|_| Cloud::spawn(bounds, tuning, rng))
            .collect();
    }

    pub(crate) fn spawn_birds(&mut self) {
        let (bounds, tuning, rng) = (self.bounds, &self.tuning, &mut self.rng);
        self.birds = (0..tuning.bird.count)
            .map(|_| Bird::spawn(bounds, tuning, rng))
            .collect();
    }

    // --- Balloons --------------------------------------------------------

    /// Put a fresh balloon on the nozzle unless one is already inflating
    pub fn create_balloon_if_needed(&mut self) {
        if self.inflating.as_ref().is_some_and(|b| b.is_inflating()) {
            return;
        }

        let pattern = self.rng.random_range(0..PATTERN_COUNT);
        let symbol = self.symbols.take(&mut self.rng);
        let special = SpecialKind::roll(&mut self.rng, self.tuning.special.spawn_chance);
        let id = self.next_balloon_id;
        self.next_balloon_id += 1;

        log::debug!("Balloon {id}: '{}' {:?}", symbol.key(), special);
        self.inflating = Some(Balloon::new(
            id,
            self.pump.spawn_point(),
            pattern,
            symbol,
            special,
            &self.tuning.balloon,
            &mut self.rng,
        ));
    }

    /// Pop the flying balloon at `index`; returns the points scored
    ///
    /// A bomb that is not itself part of a chain pops every flying balloon
    /// within its radius. Chain pops score their own points and show their
    /// own popup; the bomb's popup shows its point plus the chain total, and
    /// the score rises by exactly that amount. A chain never sets off another
    /// bomb.
    pub fn pop_balloon(&mut self, index: usize, chain: bool) -> u64 {
        let Some(balloon) = self.balloons.get_mut(index) else {
            return 0;
        };
        if !balloon.pop() {
            return 0;
        }
        let (pos, pattern, symbol, special) =
            (balloon.pos, balloon.pattern, balloon.symbol, balloon.special);

        self.symbols.give_back(symbol);

        let color = special
            .color()
            .unwrap_or_else(|| self.tuning.balloon_color(pattern));
        self.burst(pos, color, self.tuning.particle.count);

        let own = special.points(&self.tuning.special);
        let mut shown = own;
        match special {
            SpecialKind::TimeFreeze => self.activate_time_freeze(),
            SpecialKind::Bomb if !chain => shown += self.trigger_bomb(pos),
            SpecialKind::Bomb | SpecialKind::None | SpecialKind::Golden => {}
        }

        self.add_score(own);
        self.popups.push(ScorePopup::new(pos, shown, special));
        shown
    }

    /// Chain-pop every flying balloon within the bomb radius of `center`
    fn trigger_bomb(&mut self, center: Vec2) -> u64 {
        let radius = self.tuning.special.bomb_radius;
        let targets: Vec<usize> = self
            .balloons
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_popped() && b.is_flying() && b.pos.distance(center) < radius)
            .map(|(i, _)| i)
            .collect();

        let total: u64 = targets.iter().map(|&i| self.pop_balloon(i, true)).sum();
        log::debug!("Bomb popped {} balloons for {total}", targets.len());

        self.burst(center, EXPLOSION_COLOR, self.tuning.particle.explosion_count);
        total
    }

    fn activate_time_freeze(&mut self) {
        self.birds_frozen = true;
        self.freeze_end_ms = self.now_ms + self.tuning.special.freeze_duration_ms;
    }

    fn burst(&mut self, pos: Vec2, color: [u8; 3], count: usize) {
        for _ in 0..count {
            let particle = Particle::new(pos, color, &self.tuning, &mut self.rng);
            self.particles.push(particle);
        }
    }

    fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.high_score.record(self.score) {
            if let Err(e) = self.high_score.save(self.storage.as_mut()) {
                log::warn!("Failed to save high score: {e}");
            }
        }
    }
}
