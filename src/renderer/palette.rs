//! Neon comic palette

pub const PINK: &str = "#ff00ff";
pub const PINK_LIGHT: &str = "#ff66ff";
pub const CYAN: &str = "#00ffff";
pub const CYAN_LIGHT: &str = "#66ffff";
pub const YELLOW: &str = "#ffff00";
pub const PURPLE: &str = "#aa00ff";
pub const PURPLE_DEEP: &str = "#6600cc";
pub const ORANGE: &str = "#ff3300";
pub const ORANGE_HOT: &str = "#ff6600";
pub const ELECTRIC_BLUE: &str = "#00bfff";
pub const SYMBIOTE_GREEN: &str = "#00ff66";

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#ffffff";

pub const BG_DEEP: &str = "#050510";
pub const BG_MID: &str = "#0a0a1a";
pub const BG_NEAR: &str = "#1a1a3a";
pub const BG_SURFACE: &str = "#2a2a4a";
pub const UI_GLOW: &str = "#ff1493";

/// Title and HUD face
pub const COMIC_FONT: &str = "Bangers";
