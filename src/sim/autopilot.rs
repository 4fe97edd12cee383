//! Idle/demo mode: a greedy player
//!
//! Heads for the food along the shortest Manhattan path and never picks a
//! move that dies on the next tick when a survivable one exists.

use super::state::{Direction, GameState};
use super::tick::check_collision;

/// Pick a direction for the next tick
pub fn choose_direction(state: &GameState) -> Direction {
    let head = state.snake.head();

    Direction::ALL
        .into_iter()
        .filter(|&d| d != state.direction.opposite())
        .filter(|&d| check_collision(state, head + d.delta()).is_none())
        .min_by_key(|&d| {
            let next = head + d.delta();
            let to_food = (state.food - next).abs();
            // Prefer open space as a tie-breaker so the snake does not box itself in
            let exits = Direction::ALL
                .into_iter()
                .filter(|e| check_collision(state, next + e.delta()).is_none())
                .count() as i32;
            (to_food.x + to_food.y, -exits)
        })
        .unwrap_or(state.direction)
}
