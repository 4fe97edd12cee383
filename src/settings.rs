//! Game settings and session configuration
//!
//! Board and difficulty tiers are chosen in the menus and persisted as
//! preferences. A [`SessionConfig`] snapshots both tiers when a session is
//! reset, so changing the menu selection never reaches an in-flight game.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::persistence::Storage;

/// Board size tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl BoardSize {
    pub const ALL: [BoardSize; 3] = [BoardSize::Small, BoardSize::Medium, BoardSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardSize::Small => "small",
            BoardSize::Medium => "medium",
            BoardSize::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Some(BoardSize::Small),
            "medium" | "med" | "m" => Some(BoardSize::Medium),
            "large" | "l" => Some(BoardSize::Large),
            _ => None,
        }
    }

    /// Cells along each side of the square grid
    pub fn grid_count(&self) -> i32 {
        match self {
            BoardSize::Small => 15,
            BoardSize::Medium => 20,
            BoardSize::Large => 25,
        }
    }

    /// Side length of one cell in pixels
    pub fn cell_px(&self) -> u32 {
        CELL_PX
    }

    /// Canvas side length in pixels
    pub fn canvas_px(&self) -> u32 {
        self.grid_count() as u32 * self.cell_px()
    }
}

/// Difficulty tiers, also the leaderboard's tier key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Per-difficulty tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyParams {
    /// Tick interval at session start (ms)
    pub initial_interval_ms: u32,
    /// Interval reduction per food eaten (ms)
    pub interval_decrement_ms: u32,
    pub initial_length: usize,
    /// Points per food before the time multiplier
    pub base_score: u64,
    pub obstacle_count: usize,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                initial_interval_ms: 300,
                interval_decrement_ms: 1,
                initial_length: 3,
                base_score: 10,
                obstacle_count: 0,
            },
            Difficulty::Medium => DifficultyParams {
                initial_interval_ms: 200,
                interval_decrement_ms: 2,
                initial_length: 4,
                base_score: 15,
                obstacle_count: 0,
            },
            Difficulty::Hard => DifficultyParams {
                initial_interval_ms: 150,
                interval_decrement_ms: 3,
                initial_length: 5,
                base_score: 20,
                obstacle_count: 5,
            },
        }
    }
}

/// Immutable configuration for one session, created at reset
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub board: BoardSize,
    pub difficulty: Difficulty,
    pub grid_count: i32,
    pub cell_px: u32,
    pub initial_interval_ms: u32,
    pub interval_decrement_ms: u32,
    /// Floor for the tick interval
    pub min_interval_ms: u32,
    pub initial_length: usize,
    pub base_score: u64,
    /// 0 disables obstacles
    pub obstacle_count: usize,
}

impl SessionConfig {
    /// Snapshot the given tiers
    pub fn new(board: BoardSize, difficulty: Difficulty) -> Self {
        let params = difficulty.params();
        Self {
            board,
            difficulty,
            grid_count: board.grid_count(),
            cell_px: board.cell_px(),
            initial_interval_ms: params.initial_interval_ms,
            interval_decrement_ms: params.interval_decrement_ms,
            min_interval_ms: MIN_INTERVAL_MS,
            initial_length: params.initial_length,
            base_score: params.base_score,
            obstacle_count: params.obstacle_count,
        }
    }

    /// Override the obstacle count
    pub fn with_obstacles(mut self, count: usize) -> Self {
        self.obstacle_count = count;
        self
    }

    /// Check that spawn and obstacle placement can terminate
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The body must fit on a line strictly inside the 1-cell margin
        let interior = self.grid_count - 2;
        if self.initial_length == 0 || interior < self.initial_length as i32 {
            return Err(ConfigError::GridTooSmall {
                grid_count: self.grid_count,
                length: self.initial_length,
            });
        }

        let area = (self.grid_count * self.grid_count) as usize;
        let safe_zone = (2 * OBSTACLE_SAFE_DISTANCE as usize - 1).pow(2);
        let reserved = self.initial_length + 1 + safe_zone;
        if self.obstacle_count > 0 && self.obstacle_count + reserved > area {
            return Err(ConfigError::TooManyObstacles {
                obstacles: self.obstacle_count,
                grid_count: self.grid_count,
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(BoardSize::default(), Difficulty::default())
    }
}

/// Persisted menu preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub board: BoardSize,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "greedy_snake_settings";

    /// Build the configuration for a new session from the current selection
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.board, self.difficulty)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings storage unavailable: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (best effort)
    pub fn save(&self, storage: &mut impl Storage) {
        let result = serde_json::to_string(self)
            .map_err(Into::into)
            .and_then(|json| storage.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_tier_parsing() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("insane"), None);
        assert_eq!(BoardSize::from_str("Large"), Some(BoardSize::Large));
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_session_config_snapshots_tiers() {
        let config = SessionConfig::new(BoardSize::Small, Difficulty::Hard);
        assert_eq!(config.grid_count, 15);
        assert_eq!(config.initial_interval_ms, 150);
        assert_eq!(config.interval_decrement_ms, 3);
        assert_eq!(config.initial_length, 5);
        assert_eq!(config.base_score, 20);
        assert_eq!(config.min_interval_ms, MIN_INTERVAL_MS);
        assert_eq!(BoardSize::Large.canvas_px(), 500);
    }

    #[test]
    fn test_all_tier_combinations_are_valid() {
        for board in BoardSize::ALL {
            for difficulty in Difficulty::ALL {
                assert!(SessionConfig::new(board, difficulty).validate().is_ok());
            }
        }
    }

    #[test]
    fn test_validate_rejects_tiny_grid() {
        let mut config = SessionConfig::default();
        config.grid_count = 5;
        config.initial_length = 4;
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall {
                grid_count: 5,
                length: 4
            })
        );
    }

    #[test]
    fn test_validate_rejects_crowded_obstacles() {
        let config = SessionConfig::new(BoardSize::Small, Difficulty::Easy).with_obstacles(200);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyObstacles { .. })
        ));
    }

    #[test]
    fn test_settings_round_trip_and_fallback() {
        let mut storage = MemoryStorage::default();
        assert_eq!(Settings::load(&storage), Settings::default());

        let settings = Settings {
            board: BoardSize::Large,
            difficulty: Difficulty::Easy,
        };
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);

        storage.insert(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
