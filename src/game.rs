//! Game controller
//!
//! Wires the input controller, the tick scheduler, the simulation and the
//! leaderboard together, and pushes notifications to the presentation layer.
//!
//! Flow: start dialog -> board size -> difficulty -> running -> game over.
//! A session is a fresh [`GameState`] built from a [`SessionConfig`] snapshot,
//! and the scheduler is always stopped before a new session arms its timer.
//!
//! [`SessionConfig`]: crate::settings::SessionConfig

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::ConfigError;
use crate::highscores::{Leaderboard, LeaderboardStore};
use crate::input::InputController;
use crate::persistence::Storage;
use crate::scheduler::{Scheduler, TimerBackend};
use crate::settings::{BoardSize, Difficulty, Settings};
use crate::sim::{Direction, EndReason, GameState, TickInput, TickOutcome, tick};
use crate::ui::{Dialogs, Frame, Renderer};

pub struct Game<S: Storage, B: TimerBackend> {
    settings: Settings,
    /// Current or most recent session (None only if the preview failed)
    state: Option<GameState>,
    /// Unix ms at which the running session started
    started_at_ms: f64,
    input: InputController,
    scheduler: Scheduler<B>,
    leaderboard: LeaderboardStore<S>,
    renderer: Box<dyn Renderer>,
    dialogs: Box<dyn Dialogs>,
    /// Source of per-session seeds
    seeds: Pcg32,
}

impl<S: Storage, B: TimerBackend> Game<S, B> {
    /// Load preferences and leaderboard, then show the start dialog
    pub fn new(
        storage: S,
        timer: B,
        renderer: Box<dyn Renderer>,
        dialogs: Box<dyn Dialogs>,
        seed: u64,
    ) -> Self {
        let settings = Settings::load(&storage);
        let mut game = Self {
            settings,
            state: None,
            started_at_ms: 0.0,
            input: InputController::default(),
            scheduler: Scheduler::new(timer),
            leaderboard: LeaderboardStore::new(storage),
            renderer,
            dialogs,
            seeds: Pcg32::seed_from_u64(seed),
        };

        let board = game.leaderboard.load();
        game.dialogs.leaderboard_changed(&board);
        game.show_start_dialog();
        game
    }

    /// Reset to a fresh, idle session as the start screen backdrop
    pub fn show_start_dialog(&mut self) {
        self.scheduler.stop();
        self.input.stop();
        match GameState::new(self.settings.session_config(), self.seeds.random()) {
            Ok(state) => {
                self.renderer.render(&Frame::of(&state));
                self.state = Some(state);
            }
            Err(e) => log::error!("Cannot build preview session: {}", e),
        }
        self.dialogs.show_start();
    }

    /// Start dialog confirmed
    pub fn confirm_start(&mut self) {
        self.dialogs.show_board_size_choices(self.settings.board);
    }

    /// Board size picked; continues to the difficulty choice
    pub fn set_board_size(&mut self, board: BoardSize) {
        self.settings.board = board;
        self.settings.save(self.leaderboard.storage_mut());
        self.dialogs.show_difficulty_choices(self.settings.difficulty);
    }

    /// Difficulty picked; applies from the next session on
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.settings.save(self.leaderboard.storage_mut());
        log::info!("Difficulty set to {}", difficulty.as_str());
    }

    /// Reset and run a new session
    pub fn start_game(&mut self, now_ms: f64) -> Result<(), ConfigError> {
        // A previous session's timer must never fire into the new one
        self.scheduler.stop();

        let seed = self.seeds.random();
        let state = GameState::new(self.settings.session_config(), seed)?;
        log::info!(
            "Starting {} / {} session (seed {}, interval {} ms, length {})",
            state.config.board.as_str(),
            state.config.difficulty.as_str(),
            seed,
            state.interval_ms,
            state.snake.len()
        );

        self.input.reset(state.direction);
        self.started_at_ms = now_ms;
        self.dialogs.hide_dialogs();
        self.dialogs.score_changed(state.score, state.multiplier);
        self.renderer.render(&Frame::of(&state));
        self.scheduler.start(state.interval_ms);
        self.state = Some(state);
        Ok(())
    }

    /// Input source: request a direction for the next tick
    pub fn set_pending_direction(&mut self, direction: Direction) {
        self.input.set_pending_direction(direction);
    }

    /// Input source: raw `KeyboardEvent.key`; true if consumed
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.input.handle_key(key)
    }

    /// Timer callback: run one tick if `generation` is the live timer
    pub fn on_timer(&mut self, generation: u64, now_ms: f64) -> Option<TickOutcome> {
        if !self.scheduler.is_current(generation) {
            log::debug!("Dropping stale tick from timer {}", generation);
            return None;
        }
        let Some(state) = self.state.as_mut().filter(|s| s.is_running()) else {
            self.scheduler.stop();
            return None;
        };

        let input = TickInput {
            direction: self.input.consume_pending_direction(),
            elapsed: Duration::from_secs_f64(((now_ms - self.started_at_ms) / 1000.0).max(0.0)),
        };
        let previous_multiplier = state.multiplier;
        let outcome = match tick(state, &input) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Tick rejected: {}", e);
                self.scheduler.stop();
                return None;
            }
        };

        match outcome {
            TickOutcome::Moved => {
                self.renderer.render(&Frame::of(state));
                if state.multiplier != previous_multiplier {
                    self.dialogs.score_changed(state.score, state.multiplier);
                }
            }
            TickOutcome::Ate {
                interval_ms,
                interval_changed,
                ..
            } => {
                self.renderer.render(&Frame::of(state));
                self.dialogs.score_changed(state.score, state.multiplier);
                let tier = state.config.difficulty;
                let preview = self.leaderboard.preview_with_current(tier, state.score);
                self.dialogs.leaderboard_preview(tier, &preview);
                if interval_changed {
                    log::info!("Speed up: {} ms", interval_ms);
                    self.scheduler.reschedule(interval_ms);
                }
            }
            TickOutcome::Ended(reason) => self.finish(reason, now_ms),
        }
        Some(outcome)
    }

    /// Terminal transition: stop the timer, record the score, notify the UI
    fn finish(&mut self, reason: EndReason, now_ms: f64) {
        self.scheduler.stop();
        self.input.stop();

        let Some(state) = self.state.as_ref() else {
            return;
        };
        let tier = state.config.difficulty;
        let score = state.score;
        log::info!("Game over ({:?}) with score {} on {}", reason, score, tier.as_str());

        let rank = self.leaderboard.record_at(tier, score, now_ms);
        let board = self.leaderboard.load();
        self.dialogs.leaderboard_changed(&board);
        self.dialogs.show_game_over(score, reason, rank);
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running() && self.state.as_ref().is_some_and(GameState::is_running)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &Scheduler<B> {
        &self.scheduler
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.leaderboard.load()
    }

    pub fn storage(&self) -> &S {
        self.leaderboard.storage()
    }
}
