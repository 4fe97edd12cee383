//! Keyboard input
//!
//! Key events only write the pending direction. The game loop consumes it
//! once at the start of each tick, so several presses between two ticks
//! collapse to the last one.

use crate::sim::Direction;

/// Pending direction shared between the input source and the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputController {
    pending: Direction,
    enabled: bool,
}

impl InputController {
    pub fn new(initial: Direction) -> Self {
        Self {
            pending: initial,
            enabled: false,
        }
    }

    /// Start accepting input, with `direction` as the session's heading
    pub fn reset(&mut self, direction: Direction) {
        self.pending = direction;
        self.enabled = true;
    }

    /// Stop accepting input (game over)
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a requested direction; last write wins
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.enabled {
            self.pending = direction;
        }
    }

    /// Direction to use for the next tick
    pub fn consume_pending_direction(&mut self) -> Direction {
        self.pending
    }

    /// Peek without consuming (renderer preview before the first tick)
    pub fn pending(&self) -> Direction {
        self.pending
    }

    /// Handle a `KeyboardEvent.key` value; returns true if it was a direction key
    pub fn handle_key(&mut self, key: &str) -> bool {
        match direction_for_key(key) {
            Some(direction) => {
                self.set_pending_direction(direction);
                true
            }
            None => false,
        }
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(Direction::Right)
    }
}

/// Map arrow keys and WASD to directions
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}
