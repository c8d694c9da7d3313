//! Session-level simulation types
//!
//! Game phase, the hazard taxonomy used for collision outcomes, timer
//! events, and the balance constants the director runs with.

use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Start screen, waiting for the first input
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended; the last frame stays on screen until restart
    GameOver,
}

/// Whatever ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Obstacle(ObstacleKind),
    Electric,
    Projectile,
    Enemy,
}

impl Hazard {
    /// Message shown on the game-over screen
    pub fn death_reason(&self) -> &'static str {
        match self {
            Hazard::Obstacle(kind) => kind.death_message(),
            Hazard::Electric => "Electrocuted!",
            Hazard::Projectile => "Pumpkin bomb!",
            Hazard::Enemy => "Hit by Goblin!",
        }
    }
}

/// Events delivered by the director's timer manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The glitch overlay runs out
    GlitchEnd,
    /// A cloud's discharge glow fades, keyed by cloud id
    CloudDischarged(u32),
}

/// Balance constants
///
/// Frame-valued fields count 60 Hz frames and are compared against counters
/// advanced by the dt multiplier. Millisecond fields feed the timer manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_strength: f32,
    pub double_jump_strength: f32,

    pub start_speed: f32,
    /// Speed gained per frame
    pub speed_ramp: f32,
    pub max_speed: f32,

    pub score_per_frame: f32,
    /// A score cue and popup every this many points
    pub score_milestone: u32,

    /// Obstacle interval is `obstacle_interval / (speed / obstacle_speed_divisor)`
    pub obstacle_interval: f32,
    pub obstacle_speed_divisor: f32,
    pub enemy_interval: f32,
    pub enemy_min_score: f32,
    pub lightning_interval: f32,
    pub lightning_min_score: f32,
    /// Frames before the same cloud may strike again
    pub cloud_cooldown: f32,
    pub cloud_glow_ms: f32,

    pub max_clouds: usize,
    pub cloud_spawn_chance: f64,
    pub max_buildings: usize,
    pub building_spawn_chance: f64,

    pub near_miss_threshold: f32,
    pub near_miss_bonus: f32,
    /// Frames after a near miss within which the next one extends the combo
    pub combo_window: f32,

    pub glitch_min_interval: f32,
    pub glitch_chance: f64,
    pub glitch_min_ms: f32,
    pub glitch_max_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_strength: -12.0,
            double_jump_strength: -10.0,
            start_speed: 5.0,
            speed_ramp: 0.001,
            max_speed: 15.0,
            score_per_frame: 0.1,
            score_milestone: 100,
            obstacle_interval: 80.0,
            obstacle_speed_divisor: 5.0,
            enemy_interval: 400.0,
            enemy_min_score: 150.0,
            lightning_interval: 180.0,
            lightning_min_score: 100.0,
            cloud_cooldown: 200.0,
            cloud_glow_ms: 500.0,
            max_clouds: 4,
            cloud_spawn_chance: 0.01,
            max_buildings: 6,
            building_spawn_chance: 0.02,
            near_miss_threshold: 15.0,
            near_miss_bonus: 10.0,
            combo_window: 120.0,
            glitch_min_interval: 120.0,
            glitch_chance: 0.02,
            glitch_min_ms: 50.0,
            glitch_max_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Frames between obstacles at `speed`; shrinks as the game speeds up
    pub fn obstacle_interval_at(&self, speed: f32) -> f32 {
        self.obstacle_interval / (speed / self.obstacle_speed_divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_reasons() {
        assert_eq!(Hazard::Obstacle(ObstacleKind::Taxi).death_reason(), "Hit by taxi!");
        assert_eq!(Hazard::Electric.death_reason(), "Electrocuted!");
        assert_eq!(Hazard::Projectile.death_reason(), "Pumpkin bomb!");
        assert_eq!(Hazard::Enemy.death_reason(), "Hit by Goblin!");
    }

    #[test]
    fn test_obstacle_interval_shrinks_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(tuning.obstacle_interval_at(5.0), 80.0);
        assert!(tuning.obstacle_interval_at(15.0) < tuning.obstacle_interval_at(10.0));
    }
}
