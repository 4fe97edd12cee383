//! Greedy Snake - grid Snake with difficulty tiers and a persisted leaderboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring)
//! - `game`: Session controller (input, timer, leaderboard, UI notifications)
//! - `scheduler`: Single-timer tick scheduling
//! - `highscores`: Per-difficulty top-N leaderboard
//! - `persistence`: Key-value storage backends
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Board/difficulty tiers and session configuration

pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{ConfigError, SimError, StorageError};
pub use game::Game;
pub use highscores::{Leaderboard, LeaderboardEntry, LeaderboardStore};
pub use settings::{BoardSize, Difficulty, SessionConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Fastest allowed tick interval (ms)
    pub const MIN_INTERVAL_MS: u32 = 50;
    /// Entries kept per leaderboard tier
    pub const MAX_LEADERBOARD_ENTRIES: usize = 3;
    /// Side of one grid cell in pixels
    pub const CELL_PX: u32 = 20;
    /// Score multiplier at session start
    pub const INITIAL_MULTIPLIER: f32 = 1.0;
    /// Obstacles keep at least this Chebyshev distance from the spawn head
    pub const OBSTACLE_SAFE_DISTANCE: i32 = 3;
    /// Random draws before a placement falls back to scanning free cells
    pub const MAX_RANDOM_ATTEMPTS: usize = 1000;
}
