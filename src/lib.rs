//! Symbiote Rush - A comic-book endless runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, pooling, timers, director)
//! - `renderer`: Canvas 2D abstraction, render caches, post-processing overlays
//! - `platform`: Input and viewport collaborator types
//! - `persistence`: High score and settings storage, gated by consent
//! - `settings`: Quality tiers and animation style

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{PersistenceError, RenderError};
pub use settings::{AnimationStyle, QualityPreset, QualityProfile, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed logical height; everything is laid out in these units and scaled at draw time
    pub const GAME_HEIGHT: f32 = 400.0;
    /// Logical y of the street surface
    pub const GROUND_Y: f32 = GAME_HEIGHT - 50.0;

    /// Frame duration the dt multiplier is normalized against (60 Hz)
    pub const BASE_FRAME_MS: f32 = 16.67;
    /// Largest delta handed to the simulation, prevents spiral of death after tab suspend
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Horizontal distance past the left edge before an entity is dropped
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Fraction of the remaining distance covered after `dt_mult` frames when
/// `rate` of it is covered every 60 Hz frame.
#[inline]
pub fn ease_factor(rate: f32, dt_mult: f32) -> f32 {
    1.0 - (1.0 - rate).powf(dt_mult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_factor_matches_single_frame_rate() {
        assert!((ease_factor(0.25, 1.0) - 0.25).abs() < 1e-6);
        assert!(ease_factor(0.25, 2.0) > 0.25);
        assert_eq!(ease_factor(0.25, 0.0), 0.0);
    }
}
