//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Periodic tick timers (`setInterval` on web)

#[cfg(target_arch = "wasm32")]
mod web_timer;

#[cfg(target_arch = "wasm32")]
pub use web_timer::{IntervalHandle, IntervalTimer};

/// Current Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed derived from the clock, for sessions that need no reproducibility
pub fn clock_seed() -> u64 {
    now_ms().to_bits()
}
