//! Score multiplier and speed progression

use std::time::Duration;

/// Multiplier breakpoints: (session seconds at which it starts, multiplier)
pub const MULTIPLIER_STEPS: [(u64, f32); 4] = [(0, 1.0), (60, 1.5), (120, 2.0), (180, 2.5)];

/// Score multiplier for the elapsed session time
pub fn multiplier_for(elapsed: Duration) -> f32 {
    let secs = elapsed.as_secs();
    MULTIPLIER_STEPS
        .iter()
        .rev()
        .find(|(start, _)| secs >= *start)
        .map(|&(_, m)| m)
        .unwrap_or(MULTIPLIER_STEPS[0].1)
}

/// Points for one food: `floor(base * multiplier)`
pub fn food_points(base_score: u64, multiplier: f32) -> u64 {
    (base_score as f64 * multiplier as f64).floor() as u64
}

/// Next tick interval after eating, never below `min_ms`
pub fn next_interval(current_ms: u32, decrement_ms: u32, min_ms: u32) -> u32 {
    current_ms.saturating_sub(decrement_ms).max(min_ms).min(current_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_multiplier_breakpoints() {
        let at = |s: u64| multiplier_for(Duration::from_secs(s));
        assert_eq!(at(0), 1.0);
        assert_eq!(at(59), 1.0);
        assert_eq!(multiplier_for(Duration::from_millis(59_999)), 1.0);
        assert_eq!(at(60), 1.5);
        assert_eq!(at(119), 1.5);
        assert_eq!(at(120), 2.0);
        assert_eq!(at(180), 2.5);
        assert_eq!(at(10_000), 2.5);
    }

    #[test]
    fn test_food_points_floor() {
        assert_eq!(food_points(15, 1.0), 15);
        assert_eq!(food_points(15, 1.5), 22);
        assert_eq!(food_points(15, 2.5), 37);
        assert_eq!(food_points(10, 2.0), 20);
    }

    #[test]
    fn test_interval_floor() {
        assert_eq!(next_interval(200, 2, 50), 198);
        assert_eq!(next_interval(51, 3, 50), 50);
        assert_eq!(next_interval(50, 3, 50), 50);
        assert_eq!(next_interval(2, 5, 0), 0);
    }

    proptest! {
        #[test]
        fn prop_interval_monotone_and_floored(
            start in 50u32..400,
            dec in 0u32..10,
            steps in 0usize..300,
        ) {
            let mut interval = start;
            for _ in 0..steps {
                let next = next_interval(interval, dec, 50);
                prop_assert!(next <= interval);
                prop_assert!(next >= 50);
                interval = next;
            }
        }
    }
}
