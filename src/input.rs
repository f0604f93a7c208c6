//! Pointer input translation
//!
//! The host converts mouse and touch events into [`PointerEvent`]s with
//! canvas-relative coordinates (first touch point only) and feeds them here.

use crate::sim::{ClickOutcome, Game};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// mousedown / touchstart
    Start { x: f32, y: f32 },
    /// mousemove / touchmove; only suppresses default scrolling
    Move { x: f32, y: f32 },
    /// mouseup / mouseleave / touchend / touchcancel
    End,
}

#[derive(Debug, Clone, Default)]
pub struct InputManager {
    pointer_down: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Apply one event; returns what a press did
    pub fn handle(&mut self, game: &mut Game, event: PointerEvent) -> Option<ClickOutcome> {
        match event {
            PointerEvent::Start { x, y } => {
                self.pointer_down = true;
                Some(game.handle_click(x, y))
            }
            PointerEvent::Move { .. } => None,
            PointerEvent::End => {
                self.pointer_down = false;
                game.handle_release();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::{Bounds, Tuning};

    fn game() -> Game {
        Game::new(
            3,
            Bounds::new(1000.0, 800.0),
            Tuning::default(),
            Box::new(MemoryStorage::new()),
            0.0,
        )
    }

    #[test]
    fn test_start_presses_end_releases() {
        let mut g = game();
        let mut input = InputManager::new();
        let handle = g.pump().handle_rect().center();

        let outcome = input.handle(&mut g, PointerEvent::Start { x: handle.x, y: handle.y });
        assert_eq!(outcome, Some(ClickOutcome::PressedPump));
        assert!(input.is_pointer_down());
        assert!(g.pump().is_pressing());

        assert_eq!(input.handle(&mut g, PointerEvent::Move { x: 0.0, y: 0.0 }), None);
        assert!(g.pump().is_pressing());

        input.handle(&mut g, PointerEvent::End);
        assert!(!input.is_pointer_down());
        assert!(!g.pump().is_pressing());
    }

    #[test]
    fn test_empty_sky_click_is_ignored() {
        let mut g = game();
        let mut input = InputManager::new();
        // Top-center is clear of the back button, birds start lower
        let outcome = input.handle(&mut g, PointerEvent::Start { x: 500.0, y: 10.0 });
        assert_eq!(outcome, Some(ClickOutcome::Ignored));
    }
}
