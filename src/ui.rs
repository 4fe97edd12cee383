//! Presentation collaborators
//!
//! The game core only pushes notifications outward; nothing here feeds back
//! into simulation state.

use serde::Serialize;

use crate::highscores::{Leaderboard, LeaderboardEntry};
use crate::settings::{BoardSize, Difficulty};
use crate::sim::{Cell, Direction, EndReason, GameState};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Frame<'a> {
    pub snake: &'a [Cell],
    pub food: Cell,
    pub direction: Direction,
    pub multiplier: f32,
    pub obstacles: &'a [Cell],
    pub grid_count: i32,
    pub cell_px: u32,
}

impl<'a> Frame<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            snake: state.snake.cells(),
            food: state.food,
            direction: state.direction,
            multiplier: state.multiplier,
            obstacles: &state.obstacles,
            grid_count: state.config.grid_count,
            cell_px: state.config.cell_px,
        }
    }
}

/// Draws frames
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Dialogs, HUD and leaderboard panels
#[allow(unused_variables)]
pub trait Dialogs {
    fn show_start(&mut self) {}
    fn show_board_size_choices(&mut self, current: BoardSize) {}
    fn show_difficulty_choices(&mut self, current: Difficulty) {}
    /// A session started; close any open dialog
    fn hide_dialogs(&mut self) {}
    fn score_changed(&mut self, score: u64, multiplier: f32) {}
    fn leaderboard_changed(&mut self, board: &Leaderboard) {}
    /// Stored tier with the running score merged in (flagged `is_current`)
    fn leaderboard_preview(&mut self, tier: Difficulty, entries: &[LeaderboardEntry]) {}
    /// `rank` is the leaderboard position reached, if any
    fn show_game_over(&mut self, score: u64, reason: EndReason, rank: Option<usize>) {}
}

/// Discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUi;

impl Renderer for NullUi {
    fn render(&mut self, _frame: &Frame<'_>) {}
}

impl Dialogs for NullUi {}
