//! Comic lettering tables

use rand::Rng;

pub const JUMP: &[&str] = &["THWIP!", "WHOOSH!", "HUP!"];
pub const LAND: &[&str] = &["THUD!", "STOMP!"];
pub const HIT: &[&str] = &["CRASH!", "WHAM!", "POW!", "SPLAT!"];
pub const ELECTRIC: &[&str] = &["ZZZAP!", "CRACKLE!", "BZZT!"];
pub const BOMB: &[&str] = &["KABOOM!", "BOOM!", "BLAM!"];
pub const NEAR_MISS: &[&str] = &["CLOSE!", "WHEW!", "NICE!"];
pub const SCORE: &[&str] = &["YEAH!", "BONUS!", "SICK!"];

pub const PLAYER_LINES: &[&str] = &["WE ARE VENOM!", "HUNGRY!", "OURS!", "LETHAL!", "TEETH!", "CHOMP!"];
pub const ENEMY_LINES: &[&str] = &["HAHAHA!", "CATCH!", "SURPRISE!", "BOOM!", "TOO SLOW!"];

/// Uniform pick from a non-empty table
pub fn pick<R: Rng>(rng: &mut R, table: &'static [&'static str]) -> &'static str {
    table[rng.random_range(0..table.len())]
}
