//! Game state and core simulation types

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn;
use crate::consts::INITIAL_MULTIPLIER;
use crate::error::ConfigError;
use crate::settings::SessionConfig;

/// A grid cell; x grows right, y grows down
pub type Cell = IVec2;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step on the grid
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Snake body, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    cells: Vec<Cell>,
}

impl Snake {
    /// Build from cells ordered head first
    pub fn new(cells: Vec<Cell>) -> Self {
        debug_assert!(!cells.is_empty(), "snake needs a head");
        Self { cells }
    }

    /// Straight body of `length` cells trailing behind `head`
    pub fn straight(head: Cell, heading: Direction, length: usize) -> Self {
        let back = -heading.delta();
        Self::new((0..length as i32).map(|i| head + back * i).collect())
    }

    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Advance onto `head`, keeping the tail when growing
    pub fn advance(&mut self, head: Cell, grow: bool) {
        self.cells.insert(0, head);
        if !grow {
            self.cells.pop();
        }
    }

    /// True if no two cells coincide
    pub fn is_self_disjoint(&self) -> bool {
        self.cells
            .iter()
            .enumerate()
            .all(|(i, a)| !self.cells[i + 1..].contains(a))
    }
}

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Wall,
    Body,
    Obstacle,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision(Collision),
    /// Snake and obstacles cover every cell, food has nowhere to go
    BoardFull,
}

/// Session phase; nothing leaves `Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Terminated(EndReason),
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Configuration snapshot taken at reset
    pub config: SessionConfig,
    /// Seed for this session's RNG
    pub seed: u64,
    pub snake: Snake,
    pub food: Cell,
    /// Fixed for the session
    pub obstacles: Vec<Cell>,
    /// Last committed direction
    pub direction: Direction,
    pub score: u64,
    pub multiplier: f32,
    pub interval_ms: u32,
    pub phase: GamePhase,
    /// Ticks executed
    pub ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Reset: spawn snake, food and obstacles for a fresh Running session
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let (snake, direction) = spawn::spawn_snake(&mut rng, config.grid_count, config.initial_length);
        // A validated config always leaves room for the first food
        let food = spawn::place_food(&mut rng, config.grid_count, &snake, &[])
            .ok_or(ConfigError::GridTooSmall {
                grid_count: config.grid_count,
                length: config.initial_length,
            })?;
        let obstacles = spawn::place_obstacles(
            &mut rng,
            config.grid_count,
            config.obstacle_count,
            &snake,
            food,
        );

        log::debug!(
            "Spawned snake at {:?} heading {}, food at {:?}, {} obstacles",
            snake.head(),
            direction.as_str(),
            food,
            obstacles.len()
        );

        Ok(Self {
            interval_ms: config.initial_interval_ms,
            config,
            seed,
            snake,
            food,
            obstacles,
            direction,
            score: 0,
            multiplier: INITIAL_MULTIPLIER,
            phase: GamePhase::Running,
            ticks: 0,
            rng,
        })
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        spawn::in_bounds(cell, self.config.grid_count)
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }
}
