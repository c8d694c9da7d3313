//! Game settings and preferences
//!
//! Persisted through the storage collaborator, separately from the high score.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Resolve the preset into its toggle bundle
    pub fn profile(&self) -> QualityProfile {
        match self {
            QualityPreset::Low => QualityProfile {
                halftone: false,
                scanlines: false,
                chromatic_aberration: false,
                color_misregistration: false,
                action_lines: false,
                after_images: false,
                speed_lines: true,
                ink_splatters: true,
                glow_effects: false,
                max_particles: 15,
            },
            QualityPreset::Medium => QualityProfile {
                halftone: true,
                scanlines: true,
                chromatic_aberration: false,
                color_misregistration: true,
                action_lines: true,
                after_images: true,
                speed_lines: true,
                ink_splatters: true,
                glow_effects: true,
                max_particles: 30,
            },
            QualityPreset::High => QualityProfile {
                halftone: true,
                scanlines: true,
                chromatic_aberration: true,
                color_misregistration: true,
                action_lines: true,
                after_images: true,
                speed_lines: true,
                ink_splatters: true,
                glow_effects: true,
                max_particles: 50,
            },
        }
    }
}

/// Resolved feature toggles the render and update phases branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityProfile {
    pub halftone: bool,
    pub scanlines: bool,
    pub chromatic_aberration: bool,
    pub color_misregistration: bool,
    pub action_lines: bool,
    pub after_images: bool,
    pub speed_lines: bool,
    pub ink_splatters: bool,
    pub glow_effects: bool,
    /// Cap on simultaneously live explosion particles
    pub max_particles: usize,
}

impl Default for QualityProfile {
    fn default() -> Self {
        QualityPreset::default().profile()
    }
}

/// Animation stepping style
///
/// Physics always runs every frame; this only decides how often the
/// run cycle and other cosmetic phases advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimationStyle {
    /// Every frame (60fps)
    Smooth,
    /// Every 2nd frame, the stop-motion look
    #[default]
    Stylized,
    /// Every 3rd frame
    Comic,
}

impl AnimationStyle {
    pub fn frame_skip(&self) -> u64 {
        match self {
            AnimationStyle::Smooth => 1,
            AnimationStyle::Stylized => 2,
            AnimationStyle::Comic => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationStyle::Smooth => "Smooth (60fps)",
            AnimationStyle::Stylized => "Stylized (12fps)",
            AnimationStyle::Comic => "Comic Book (8fps)",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run-cycle stepping style
    pub animation_style: AnimationStyle,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Play sound cues
    pub sound_enabled: bool,
    /// Screen shake on impacts and landings
    pub screen_shake: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation_style: AnimationStyle::default(),
            quality: QualityPreset::default(),
            sound_enabled: true,
            screen_shake: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Resolved quality toggles
    pub fn quality_profile(&self) -> QualityProfile {
        self.quality.profile()
    }

    /// Animation frame-skip for the configured style
    pub fn frame_skip(&self) -> u64 {
        self.animation_style.frame_skip()
    }
}
