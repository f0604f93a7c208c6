//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - HUD readouts (DOM elements on web, the log natively)
//! - Storage (LocalStorage on web, see `persistence::MemoryStorage` natively)
//! - Image loading (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// One-way sink for the values shown outside the canvas
pub trait Readout {
    fn set_score(&mut self, score: u64);
    fn set_high_score(&mut self, high_score: u64);
    fn set_loading_visible(&mut self, visible: bool);
    fn set_instructions_visible(&mut self, visible: bool);
}

/// Everything the HUD shows, sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudState {
    pub score: u64,
    pub high_score: u64,
    pub loading_visible: bool,
    pub instructions_visible: bool,
}

/// Forwards only the fields that changed since the last frame
pub struct ReadoutSync<R: Readout> {
    readout: R,
    last: Option<HudState>,
}

impl<R: Readout> ReadoutSync<R> {
    pub fn new(readout: R) -> Self {
        Self {
            readout,
            last: None,
        }
    }

    pub fn readout(&self) -> &R {
        &self.readout
    }

    pub fn sync(&mut self, state: HudState) {
        let last = self.last;
        let changed = |f: fn(&HudState) -> u64| last.is_none_or(|l| f(&l) != f(&state));

        if changed(|s| s.score) {
            self.readout.set_score(state.score);
        }
        if changed(|s| s.high_score) {
            self.readout.set_high_score(state.high_score);
        }
        if changed(|s| s.loading_visible as u64) {
            self.readout.set_loading_visible(state.loading_visible);
        }
        if changed(|s| s.instructions_visible as u64) {
            self.readout.set_instructions_visible(state.instructions_visible);
        }
        self.last = Some(state);
    }
}

/// Native stand-in for the DOM: reports HUD changes through `log`
#[derive(Debug, Default)]
pub struct LogReadout;

impl Readout for LogReadout {
    fn set_score(&mut self, score: u64) {
        log::info!("Score: {score}");
    }

    fn set_high_score(&mut self, high_score: u64) {
        log::info!("Best: {high_score}");
    }

    fn set_loading_visible(&mut self, visible: bool) {
        log::debug!("Loading screen visible: {visible}");
    }

    fn set_instructions_visible(&mut self, visible: bool) {
        log::debug!("Instructions visible: {visible}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<String>,
    }

    impl Readout for Recorder {
        fn set_score(&mut self, score: u64) {
            self.writes.push(format!("score={score}"));
        }
        fn set_high_score(&mut self, high_score: u64) {
            self.writes.push(format!("best={high_score}"));
        }
        fn set_loading_visible(&mut self, visible: bool) {
            self.writes.push(format!("loading={visible}"));
        }
        fn set_instructions_visible(&mut self, visible: bool) {
            self.writes.push(format!("instructions={visible}"));
        }
    }

    fn hud(score: u64) -> HudState {
        HudState {
            score,
            high_score: 10,
            loading_visible: true,
            instructions_visible: false,
        }
    }

    #[test]
    fn test_first_sync_writes_everything() {
        let mut sync = ReadoutSync::new(Recorder::default());
        sync.sync(hud(0));
        assert_eq!(sync.readout().writes.len(), 4);
    }

    #[test]
    fn test_unchanged_fields_are_not_rewritten() {
        let mut sync = ReadoutSync::new(Recorder::default());
        sync.sync(hud(0));
        sync.sync(hud(0));
        sync.sync(hud(3));
        sync.sync(HudState {
            loading_visible: false,
            instructions_visible: true,
            ..hud(3)
        });
        assert_eq!(
            &sync.readout().writes[4..],
            &["score=3", "loading=false", "instructions=true"]
        );
    }
}
