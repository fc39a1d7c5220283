//! Crystal Puzzle - An 8x8 block-placement puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game core (grid, shapes, scoring, commands)
//! - `persistence`: Storage backends and signed score saves
//! - `platform`: Rewards, cloud data and leaderboard abstraction
//! - `audio`: Sound effects for game events
//! - `highscores` / `settings`: Local leaderboard and preferences
//! - `web`: wasm-bindgen handle for the browser front-end (wasm32 only)

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use settings::{Language, Settings};

/// Game configuration constants
pub mod consts {
    /// Board is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: usize = 8;
    /// Pieces offered per tray refill
    pub const TRAY_SIZE: usize = 3;

    /// Points per block placed on the board
    pub const POINTS_PER_BLOCK: u64 = 10;
    /// Points per cleared line before multipliers
    pub const BASE_POINTS_PER_LINE: u64 = 100;
    /// Flat bonus when a single placement clears JACKPOT_LINES or more
    pub const JACKPOT_BONUS: u64 = 500;
    pub const JACKPOT_LINES: usize = 3;
    /// Points per block destroyed by the hammer
    pub const HAMMER_POINTS_PER_BLOCK: u64 = 5;

    /// Upper bound for a believable saved score
    pub const MAX_PLAUSIBLE_SCORE: u64 = 999_999;

    /// Leaderboard name on the gaming platform
    pub const LEADERBOARD_NAME: &str = "crystalpuzzlehighscore";
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
