//! Discrete simulation tick
//!
//! One call moves the snake one cell. Collision checks run in a fixed order
//! (wall, body, obstacle) and the first hit terminates the session.

use std::time::Duration;

use super::scoring::{food_points, multiplier_for, next_interval};
use super::spawn;
use super::state::{Cell, Collision, Direction, EndReason, GamePhase, GameState};
use crate::error::SimError;

/// Input for a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Direction requested by the player, read once at tick start
    pub direction: Direction,
    /// Wall-clock time since the session started
    pub elapsed: Duration,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Moved without eating
    Moved,
    /// Ate the food and grew by one
    Ate {
        points: u64,
        /// Interval after the speed-up
        interval_ms: u32,
        interval_changed: bool,
    },
    /// Session ended on this tick
    Ended(EndReason),
}

/// Resolve the requested direction against the last committed one
///
/// A U-turn would put the head on the neck, so the previous direction is
/// kept instead.
pub fn commit_direction(previous: Direction, requested: Direction) -> Direction {
    if requested == previous.opposite() {
        previous
    } else {
        requested
    }
}

/// First collision for a candidate head, in check order
pub fn check_collision(state: &GameState, head: Cell) -> Option<Collision> {
    if !state.in_bounds(head) {
        Some(Collision::Wall)
    } else if state.snake.contains(head) {
        Some(Collision::Body)
    } else if state.is_obstacle(head) {
        Some(Collision::Obstacle)
    } else {
        None
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<TickOutcome, SimError> {
    if let GamePhase::Terminated(_) = state.phase {
        return Err(SimError::SessionTerminated);
    }

    state.ticks += 1;
    let direction = commit_direction(state.direction, input.direction);
    state.direction = direction;

    let head = state.snake.head() + direction.delta();
    if let Some(collision) = check_collision(state, head) {
        log::info!(
            "Collision ({:?}) at {:?} after {} ticks, score {}",
            collision,
            head,
            state.ticks,
            state.score
        );
        let reason = EndReason::Collision(collision);
        state.phase = GamePhase::Terminated(reason);
        return Ok(TickOutcome::Ended(reason));
    }

    let ate = head == state.food;
    state.snake.advance(head, ate);
    state.multiplier = multiplier_for(input.elapsed);

    if !ate {
        return Ok(TickOutcome::Moved);
    }

    let points = food_points(state.config.base_score, state.multiplier);
    state.score += points;

    let previous_interval = state.interval_ms;
    state.interval_ms = next_interval(
        state.interval_ms,
        state.config.interval_decrement_ms,
        state.config.min_interval_ms,
    );

    match spawn::place_food(&mut state.rng, state.config.grid_count, &state.snake, &state.obstacles) {
        Some(food) => state.food = food,
        None => {
            log::info!("Board full at score {}", state.score);
            state.phase = GamePhase::Terminated(EndReason::BoardFull);
            return Ok(TickOutcome::Ended(EndReason::BoardFull));
        }
    }

    Ok(TickOutcome::Ate {
        points,
        interval_ms: state.interval_ms,
        interval_changed: state.interval_ms != previous_interval,
    })
}
