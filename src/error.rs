//! Error types
//!
//! Only configuration and programming errors surface to callers. Storage
//! failures are logged and degraded by the leaderboard and settings layers.

use thiserror::Error;

/// Errors from advancing the simulation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// A terminated session was ticked; it must be reset first
    #[error("session already terminated")]
    SessionTerminated,
}

/// Rejected session configurations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid of {grid_count} cells cannot hold a snake of length {length} inside the margin")]
    GridTooSmall { grid_count: i32, length: usize },

    #[error("{obstacles} obstacles do not fit on a {grid_count}x{grid_count} grid")]
    TooManyObstacles { obstacles: usize, grid_count: i32 },
}

/// Durable storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
