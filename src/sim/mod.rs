//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, config and inputs a
//! session plays out identically:
//! - Seeded RNG only
//! - Elapsed time is an input, never read from a clock
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::choose_direction;
pub use scoring::{food_points, multiplier_for, next_interval};
pub use state::{Cell, Collision, Direction, EndReason, GamePhase, GameState, Snake};
pub use tick::{TickInput, TickOutcome, commit_direction, tick};
