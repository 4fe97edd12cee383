//! Tick scheduling
//!
//! A session owns at most one armed periodic timer. Changing speed cancels
//! the old timer before arming the new one, and every timer carries a
//! generation number so a callback from a cancelled timer can be recognised
//! and dropped.

use std::collections::BTreeMap;

/// Platform timer facility
pub trait TimerBackend {
    type Handle;

    /// Arm a periodic timer firing every `interval_ms`, tagged with `generation`
    fn arm(&mut self, interval_ms: u32, generation: u64) -> Self::Handle;

    /// Cancel a timer; it must not fire afterwards
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
struct ActiveTimer<H> {
    handle: H,
    generation: u64,
    interval_ms: u32,
}

/// Owns the single active tick timer
pub struct Scheduler<B: TimerBackend> {
    backend: B,
    active: Option<ActiveTimer<B::Handle>>,
    last_generation: u64,
}

impl<B: TimerBackend> Scheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
            last_generation: 0,
        }
    }

    /// Cancel any running timer, then arm a new one; returns its generation
    pub fn start(&mut self, interval_ms: u32) -> u64 {
        self.stop();
        self.last_generation += 1;
        let generation = self.last_generation;
        let handle = self.backend.arm(interval_ms, generation);
        self.active = Some(ActiveTimer {
            handle,
            generation,
            interval_ms,
        });
        generation
    }

    /// Change the interval of the running timer (cancel-then-arm)
    ///
    /// No-op if the interval is unchanged or nothing is running.
    pub fn reschedule(&mut self, interval_ms: u32) {
        match &self.active {
            Some(active) if active.interval_ms != interval_ms => {
                log::debug!("Tick interval {} -> {} ms", active.interval_ms, interval_ms);
                self.start(interval_ms);
            }
            _ => {}
        }
    }

    /// Cancel the running timer, if any
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            self.backend.cancel(active.handle);
        }
    }

    /// True if a callback tagged `generation` belongs to the running timer
    pub fn is_current(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.generation == generation)
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval_ms(&self) -> Option<u32> {
        self.active.as_ref().map(|a| a.interval_ms)
    }

    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.generation)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: TimerBackend> Drop for Scheduler<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Timer bookkeeping without a clock; the owner fires ticks itself
///
/// Used by headless runs (which sleep for `interval_ms`) and tests.
#[derive(Debug, Default)]
pub struct ManualTimer {
    /// Armed timers: generation -> interval
    armed: BTreeMap<u64, u32>,
    /// Total timers ever armed
    pub arm_count: usize,
}

impl ManualTimer {
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    pub fn armed_interval(&self, generation: u64) -> Option<u32> {
        self.armed.get(&generation).copied()
    }
}

impl TimerBackend for ManualTimer {
    type Handle = u64;

    fn arm(&mut self, interval_ms: u32, generation: u64) -> u64 {
        self.armed.insert(generation, interval_ms);
        self.arm_count += 1;
        generation
    }

    fn cancel(&mut self, handle: u64) {
        self.armed.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_arms_single_timer() {
        let mut scheduler = Scheduler::new(ManualTimer::default());
        assert!(!scheduler.is_running());

        let g1 = scheduler.start(200);
        let g2 = scheduler.start(150);
        assert_ne!(g1, g2);
        assert_eq!(scheduler.backend().armed_count(), 1);
        assert!(!scheduler.is_current(g1));
        assert!(scheduler.is_current(g2));
        assert_eq!(scheduler.interval_ms(), Some(150));
    }

    #[test]
    fn test_reschedule_cancels_old_timer() {
        let mut scheduler = Scheduler::new(ManualTimer::default());
        let old = scheduler.start(200);
        scheduler.reschedule(198);

        assert_eq!(scheduler.backend().armed_count(), 1);
        assert!(!scheduler.is_current(old));
        let current = scheduler.generation().unwrap();
        assert_eq!(scheduler.backend().armed_interval(current), Some(198));
    }

    #[test]
    fn test_reschedule_same_interval_is_noop() {
        let mut scheduler = Scheduler::new(ManualTimer::default());
        let generation = scheduler.start(50);
        scheduler.reschedule(50);
        assert!(scheduler.is_current(generation));
        assert_eq!(scheduler.backend().arm_count, 1);
    }

    #[test]
    fn test_reschedule_when_stopped_does_nothing() {
        let mut scheduler = Scheduler::new(ManualTimer::default());
        scheduler.reschedule(100);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.backend().arm_count, 0);
    }

    #[test]
    fn test_stop_invalidates_generation() {
        let mut scheduler = Scheduler::new(ManualTimer::default());
        let generation = scheduler.start(100);
        scheduler.stop();
        assert!(!scheduler.is_current(generation));
        assert_eq!(scheduler.backend().armed_count(), 0);
        assert_eq!(scheduler.interval_ms(), None);
    }
}
