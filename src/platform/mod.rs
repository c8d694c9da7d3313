//! Platform abstraction layer
//!
//! Collaborator types the browser shell fills in every frame:
//! - Input state (edge-triggered jump, held jump/duck)
//! - Viewport size and the derived logical scale

use crate::consts::GAME_HEIGHT;

/// Input commands for a single frame
///
/// The source (keyboard, touch, pointer) is irrelevant to the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Jump was pressed since the last frame (edge)
    pub jump_pressed: bool,
    /// Jump is currently held
    pub jump_held: bool,
    /// Duck is currently held
    pub duck_held: bool,
}

impl FrameInput {
    /// Clear one-shot inputs after a frame consumed them
    pub fn consume_edges(&mut self) {
        self.jump_pressed = false;
    }
}

/// Viewport dimensions in device pixels plus the logical scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Pixels per logical unit (`height / GAME_HEIGHT`)
    pub scale_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let scale_ratio = if height == 0 {
            1.0
        } else {
            height as f32 / GAME_HEIGHT
        };
        Self {
            width,
            height,
            scale_ratio,
        }
    }

    /// Visible width in logical units
    pub fn logical_width(&self) -> f32 {
        self.width as f32 / self.scale_ratio
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600, GAME_HEIGHT as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_scale_from_height() {
        let vp = Viewport::new(1600, 800);
        assert_eq!(vp.scale_ratio, 2.0);
        assert_eq!(vp.logical_width(), 800.0);
    }

    #[test]
    fn test_zero_height_viewport_does_not_divide_by_zero() {
        let vp = Viewport::new(100, 0);
        assert_eq!(vp.scale_ratio, 1.0);
    }

    #[test]
    fn test_consume_edges_keeps_held_state() {
        let mut input = FrameInput {
            jump_pressed: true,
            jump_held: true,
            duck_held: false,
        };
        input.consume_edges();
        assert!(!input.jump_pressed);
        assert!(input.jump_held);
    }
}
