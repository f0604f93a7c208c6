//! Screen-space UI geometry
//!
//! Shared by hit-testing in `sim::game` and painting in `renderer::scene`, so
//! what the player sees is exactly what they can click.

use glam::Vec2;

use crate::{Bounds, Rect, point_in_circle};

/// Round button in the top-left corner; resets the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackButton {
    pub center: Vec2,
    pub radius: f32,
}

impl Default for BackButton {
    fn default() -> Self {
        Self {
            center: Vec2::new(50.0, 50.0),
            radius: 30.0,
        }
    }
}

impl BackButton {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        point_in_circle(px, py, self.center, self.radius)
    }
}

pub const MODAL_SIZE: f32 = 400.0;
pub const CROSS_SIZE: f32 = 80.0;
pub const RETRY_BUTTON_WIDTH: f32 = 200.0;
pub const RETRY_BUTTON_HEIGHT: f32 = 60.0;

/// Game-over modal, centered in the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverLayout {
    pub modal: Rect,
    pub cross_center: Vec2,
    pub title_y: f32,
    pub score_y: f32,
    pub best_y: f32,
    pub retry_button: Rect,
}

impl GameOverLayout {
    pub fn new(bounds: Bounds) -> Self {
        let modal = Rect::new(
            (bounds.width - MODAL_SIZE) / 2.0,
            (bounds.height - MODAL_SIZE) / 2.0,
            MODAL_SIZE,
            MODAL_SIZE,
        );
        let cross_center = Vec2::new(bounds.width / 2.0, modal.y + 80.0);
        let retry_button = Rect::new(
            (bounds.width - RETRY_BUTTON_WIDTH) / 2.0,
            cross_center.y + 190.0,
            RETRY_BUTTON_WIDTH,
            RETRY_BUTTON_HEIGHT,
        );

        Self {
            modal,
            cross_center,
            title_y: cross_center.y + 80.0,
            score_y: cross_center.y + 120.0,
            best_y: cross_center.y + 155.0,
            retry_button,
        }
    }
}

/// Vertical position of the freeze indicator's top edge
pub const FREEZE_LABEL_Y: f32 = 100.0;

/// "Birds Frozen: 3s"; seconds rounded up, never negative
pub fn freeze_label(remaining_ms: f64) -> String {
    let seconds = (remaining_ms.max(0.0) / 1000.0).ceil() as u64;
    format!("Birds Frozen: {seconds}s")
}

/// Label of the auto-pump toggle, two lines
pub fn auto_button_label(auto: bool) -> (&'static str, &'static str) {
    if auto { ("OFF", "AUTO") } else { ("AUTO", "PUMP") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_button_hit() {
        let button = BackButton::default();
        assert!(button.contains(50.0, 50.0));
        assert!(button.contains(80.0, 50.0));
        assert!(!button.contains(81.0, 50.0));
    }

    #[test]
    fn test_game_over_layout() {
        let layout = GameOverLayout::new(Bounds::new(1000.0, 800.0));
        assert_eq!(layout.modal, Rect::new(300.0, 200.0, 400.0, 400.0));
        assert_eq!(layout.cross_center, Vec2::new(500.0, 280.0));
        assert_eq!(layout.retry_button, Rect::new(400.0, 470.0, 200.0, 60.0));
        // Button sits inside the modal
        assert!(layout.retry_button.y + layout.retry_button.height <= layout.modal.y + layout.modal.height);
    }

    #[test]
    fn test_freeze_label_rounds_up() {
        assert_eq!(freeze_label(3000.0), "Birds Frozen: 3s");
        assert_eq!(freeze_label(2001.0), "Birds Frozen: 3s");
        assert_eq!(freeze_label(1.0), "Birds Frozen: 1s");
        assert_eq!(freeze_label(-5.0), "Birds Frozen: 0s");
    }
}
