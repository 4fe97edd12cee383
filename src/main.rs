//! Greedy Snake entry point
//!
//! wasm32: wires keyboard, `setInterval` and LocalStorage to the game and
//! forwards frames and dialog notifications to page-level JS hooks.
//! Native: plays one headless session with the autopilot and prints the
//! leaderboard.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use greedy_snake::highscores::{Leaderboard, LeaderboardEntry};
    use greedy_snake::persistence::{LocalStorage, MemoryStorage, Storage};
    use greedy_snake::platform::{IntervalTimer, clock_seed, now_ms};
    use greedy_snake::sim::EndReason;
    use greedy_snake::ui::{Dialogs, Frame, Renderer};
    use greedy_snake::{BoardSize, Difficulty, Game};

    // Page hooks: the HTML page may define window.snakeRender(frame) and
    // window.snakeUi = { showStart() {...}, showGameOver(score, reason, rank) {...}, ... }
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (window.snakeRender) window.snakeRender(JSON.parse(json));
        }

        export function ui_event(name, json) {
            const ui = window.snakeUi;
            if (ui && typeof ui[name] === 'function') ui[name](JSON.parse(json));
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn ui_event(name: &str, json: &str);
    }

    type WebGame = Game<Box<dyn Storage>, IntervalTimer>;

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<WebGame>>>> = const { RefCell::new(None) };
    }

    struct JsRenderer;

    impl Renderer for JsRenderer {
        fn render(&mut self, frame: &Frame<'_>) {
            match serde_json::to_string(frame) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Frame serialization failed: {}", e),
            }
        }
    }

    struct JsDialogs;

    impl JsDialogs {
        fn emit(&self, name: &str, payload: serde_json::Value) {
            ui_event(name, &payload.to_string());
        }
    }

    impl Dialogs for JsDialogs {
        fn show_start(&mut self) {
            self.emit("showStart", serde_json::Value::Null);
        }
        fn show_board_size_choices(&mut self, current: BoardSize) {
            self.emit("showBoardSize", serde_json::json!({ "current": current }));
        }
        fn show_difficulty_choices(&mut self, current: Difficulty) {
            self.emit("showDifficulty", serde_json::json!({ "current": current }));
        }
        fn hide_dialogs(&mut self) {
            self.emit("hideDialogs", serde_json::Value::Null);
        }
        fn score_changed(&mut self, score: u64, multiplier: f32) {
            self.emit("score", serde_json::json!({ "score": score, "multiplier": multiplier }));
        }
        fn leaderboard_changed(&mut self, board: &Leaderboard) {
            self.emit("leaderboard", serde_json::to_value(board).unwrap_or_default());
        }
        fn leaderboard_preview(&mut self, tier: Difficulty, entries: &[LeaderboardEntry]) {
            self.emit(
                "leaderboardPreview",
                serde_json::json!({ "tier": tier, "entries": entries }),
            );
        }
        fn show_game_over(&mut self, score: u64, reason: EndReason, rank: Option<usize>) {
            self.emit(
                "showGameOver",
                serde_json::json!({ "score": score, "reason": reason, "rank": rank }),
            );
        }
    }

    fn with_game(f: impl FnOnce(&mut WebGame)) {
        let game = GAME.with(|g| g.borrow().clone());
        match game {
            Some(game) => f(&mut game.borrow_mut()),
            None => log::warn!("Game not initialized"),
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), scores will not persist", e);
                Box::new(MemoryStorage::default())
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Greedy Snake starting...");

        let game = Rc::new_cyclic(|weak: &std::rc::Weak<RefCell<WebGame>>| {
            let weak = weak.clone();
            let timer = IntervalTimer::new(move |generation| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().on_timer(generation, now_ms());
                }
            });
            RefCell::new(Game::new(
                open_storage(),
                timer,
                Box::new(JsRenderer),
                Box::new(JsDialogs),
                clock_seed(),
            ))
        });
        GAME.with(|g| *g.borrow_mut() = Some(Rc::clone(&game)));

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, keyboard input disabled");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if game.borrow_mut().handle_key(&event.key()) {
                event.prevent_default();
            }
        });
        let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();

        log::info!("Greedy Snake running!");
    }

    #[wasm_bindgen]
    pub fn confirm_start_game() {
        with_game(|g| g.confirm_start());
    }

    #[wasm_bindgen]
    pub fn set_board_size(size: &str) {
        match BoardSize::from_str(size) {
            Some(board) => with_game(|g| g.set_board_size(board)),
            None => log::warn!("Unknown board size {:?}", size),
        }
    }

    #[wasm_bindgen]
    pub fn set_difficulty(difficulty: &str) {
        match Difficulty::from_str(difficulty) {
            Some(d) => with_game(|g| g.set_difficulty(d)),
            None => log::warn!("Unknown difficulty {:?}", difficulty),
        }
    }

    #[wasm_bindgen]
    pub fn start_game() {
        with_game(|g| {
            if let Err(e) = g.start_game(now_ms()) {
                log::error!("Cannot start game: {}", e);
            }
        });
    }

    #[wasm_bindgen]
    pub fn show_start_dialog() {
        with_game(|g| g.show_start_dialog());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use greedy_snake::highscores::{Leaderboard, format_age};
    use greedy_snake::persistence::FileStorage;
    use greedy_snake::platform::{clock_seed, now_ms};
    use greedy_snake::scheduler::ManualTimer;
    use greedy_snake::sim::{EndReason, choose_direction};
    use greedy_snake::ui::{Dialogs, NullUi};
    use greedy_snake::{BoardSize, Difficulty, Game};

    /// Default leaderboard file, overridden by `GREEDY_SNAKE_STORE`
    const DEFAULT_STORE: &str = "greedy_snake_scores.json";
    /// Safety cap for the demo
    const MAX_TICKS: u64 = 100_000;

    struct ConsoleUi;

    impl Dialogs for ConsoleUi {
        fn show_game_over(&mut self, score: u64, reason: EndReason, rank: Option<usize>) {
            println!("Game over: {:?}, score {}", reason, score);
            if let Some(rank) = rank {
                println!("New high score #{}!", rank);
            }
        }

        fn leaderboard_changed(&mut self, board: &Leaderboard) {
            let now = now_ms();
            for (tier, entries) in board.tiers() {
                println!("[{}]", tier.as_str());
                for (i, e) in entries.iter().enumerate() {
                    println!("  {}. {:>6}  {}", i + 1, e.score, format_age(e.timestamp, now));
                }
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let board = args.next().and_then(|s| BoardSize::from_str(&s));
        let difficulty = args.next().and_then(|s| Difficulty::from_str(&s));
        let path = std::env::var("GREEDY_SNAKE_STORE").unwrap_or_else(|_| DEFAULT_STORE.to_string());
        log::info!("Leaderboard file: {}", path);

        let mut game = Game::new(
            FileStorage::new(path),
            ManualTimer::default(),
            Box::new(NullUi),
            Box::new(ConsoleUi),
            clock_seed(),
        );
        game.confirm_start();
        if let Some(board) = board {
            game.set_board_size(board);
        }
        if let Some(difficulty) = difficulty {
            game.set_difficulty(difficulty);
        }

        // Virtual clock: advance by the tick interval instead of sleeping
        let mut now = now_ms();
        if let Err(e) = game.start_game(now) {
            log::error!("Cannot start game: {}", e);
            return;
        }

        let mut ticks = 0;
        while let (Some(generation), Some(interval)) =
            (game.scheduler().generation(), game.scheduler().interval_ms())
        {
            if ticks >= MAX_TICKS {
                log::warn!("Stopping demo after {} ticks", ticks);
                break;
            }
            if let Some(direction) = game.state().map(choose_direction) {
                game.set_pending_direction(direction);
            }
            now += interval as f64;
            game.on_timer(generation, now);
            ticks += 1;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Greedy Snake (native) starting...");
    log::info!("Headless autopilot demo - build for wasm32 to play in the browser");
    headless::run();
}
