//! High score leaderboard
//!
//! One top-N list per difficulty tier, persisted as a single JSON document:
//! `{"easy": [{"score": 120, "timestamp": 1700000000000.0}, ...], ...}`.
//! The store is best effort. A missing or corrupt document reads as an empty
//! leaderboard and failed writes are logged, never surfaced to the player.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEADERBOARD_ENTRIES;
use crate::persistence::Storage;
use crate::platform;
use crate::settings::Difficulty;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
    /// Set only on the in-progress entry of a preview
    #[serde(default, rename = "isCurrent", skip_serializing_if = "std::ops::Not::not")]
    pub is_current: bool,
}

impl LeaderboardEntry {
    pub fn new(score: u64, timestamp: f64) -> Self {
        Self {
            score,
            timestamp,
            is_current: false,
        }
    }
}

/// Per-tier leaderboards, each sorted descending by score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    tiers: BTreeMap<Difficulty, Vec<LeaderboardEntry>>,
    #[serde(skip)]
    max_entries: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(MAX_LEADERBOARD_ENTRIES)
    }
}

impl Leaderboard {
    /// Empty leaderboard with every tier present
    pub fn new(max_entries: usize) -> Self {
        Self {
            tiers: Difficulty::ALL.into_iter().map(|d| (d, Vec::new())).collect(),
            max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entries for a tier, best first
    pub fn entries(&self, tier: Difficulty) -> &[LeaderboardEntry] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate all tiers in order
    pub fn tiers(&self) -> impl Iterator<Item = (Difficulty, &[LeaderboardEntry])> {
        self.tiers.iter().map(|(d, e)| (*d, e.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.values().all(Vec::is_empty)
    }

    /// Top score for a tier (if any)
    pub fn top_score(&self, tier: Difficulty) -> Option<u64> {
        self.entries(tier).first().map(|e| e.score)
    }

    /// Rank (1-indexed) a score would get in `tier`, None if it would be cut
    pub fn potential_rank(&self, tier: Difficulty, score: u64) -> Option<usize> {
        let entries = self.entries(tier);
        // Ties go after existing entries
        let rank = entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(entries.len())
            + 1;
        (rank <= self.max_entries).then_some(rank)
    }

    /// Insert an entry keeping the tier sorted and bounded
    ///
    /// Returns the rank achieved (1-indexed), or None if it was cut.
    pub fn insert(&mut self, tier: Difficulty, entry: LeaderboardEntry) -> Option<usize> {
        let max_entries = self.max_entries;
        let entries = self.tiers.entry(tier).or_default();

        let pos = entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(entries.len());
        entries.insert(pos, entry);
        entries.truncate(max_entries);

        (pos < max_entries).then_some(pos + 1)
    }

    /// Copy of `tier` with an in-progress score merged in and flagged
    pub fn preview_with_current(
        &self,
        tier: Difficulty,
        score: u64,
        timestamp: f64,
    ) -> Vec<LeaderboardEntry> {
        let mut preview = self.clone();
        preview.insert(
            tier,
            LeaderboardEntry {
                score,
                timestamp,
                is_current: true,
            },
        );
        preview.tiers.remove(&tier).unwrap_or_default()
    }

    /// Parse a stored document
    ///
    /// Unknown tiers are dropped, missing tiers come back empty and each tier
    /// is re-sorted and truncated, so hand-edited data cannot break ordering.
    pub fn from_json(json: &str, max_entries: usize) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Vec<LeaderboardEntry>> = serde_json::from_str(json)?;
        let mut board = Self::new(max_entries);

        for (name, mut entries) in raw {
            let Some(tier) = Difficulty::from_str(&name) else {
                log::debug!("Ignoring unknown leaderboard tier {:?}", name);
                continue;
            };
            // Stable sort keeps the stored order among ties
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(max_entries);
            for entry in &mut entries {
                entry.is_current = false;
            }
            board.tiers.insert(tier, entries);
        }
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Leaderboard persisted through a [`Storage`] backend
pub struct LeaderboardStore<S: Storage> {
    storage: S,
    max_entries: usize,
}

impl<S: Storage> LeaderboardStore<S> {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "snakeLeaderboard";

    pub fn new(storage: S) -> Self {
        Self::with_max_entries(storage, MAX_LEADERBOARD_ENTRIES)
    }

    pub fn with_max_entries(storage: S, max_entries: usize) -> Self {
        Self {
            storage,
            max_entries,
        }
    }

    /// Read all tiers; any failure yields an empty leaderboard
    pub fn load(&self) -> Leaderboard {
        match self.storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Leaderboard::from_json(&json, self.max_entries) {
                Ok(board) => return board,
                Err(e) => log::warn!("Discarding corrupt leaderboard: {}", e),
            },
            Ok(None) => log::debug!("No leaderboard stored, starting fresh"),
            Err(e) => log::warn!("Leaderboard storage unavailable: {}", e),
        }
        Leaderboard::new(self.max_entries)
    }

    /// Record a finished session's score now
    pub fn record(&mut self, tier: Difficulty, score: u64) -> Option<usize> {
        self.record_at(tier, score, platform::now_ms())
    }

    /// Record a score with an explicit timestamp; returns the rank achieved
    pub fn record_at(&mut self, tier: Difficulty, score: u64, timestamp: f64) -> Option<usize> {
        let mut board = self.load();
        let rank = board.insert(tier, LeaderboardEntry::new(score, timestamp));
        self.save(&board);
        rank
    }

    /// Stored tier with `current_score` merged in; never written back
    pub fn preview_with_current(&self, tier: Difficulty, current_score: u64) -> Vec<LeaderboardEntry> {
        self.load()
            .preview_with_current(tier, current_score, platform::now_ms())
    }

    fn save(&mut self, board: &Leaderboard) {
        let result = board
            .to_json()
            .map_err(Into::into)
            .and_then(|json| self.storage.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Leaderboard saved"),
            Err(e) => log::warn!("Failed to save leaderboard: {}", e),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let mins = ((now - timestamp) / 60_000.0).max(0.0).floor() as u64;
    let hours = mins / 60;
    let days = hours / 24;

    match (days, hours, mins) {
        (1, _, _) => "Yesterday".to_string(),
        (d, _, _) if d > 1 => format!("{} days ago", d),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, h, _) if h > 1 => format!("{} hours ago", h),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, m) if m > 1 => format!("{} mins ago", m),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::persistence::MemoryStorage;
    use proptest::prelude::*;

    type Store = LeaderboardStore<MemoryStorage>;

    fn scores(entries: &[LeaderboardEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.score).collect()
    }

    #[test]
    fn test_load_empty_materializes_all_tiers() {
        let store = Store::new(MemoryStorage::default());
        let board = store.load();
        assert!(board.is_empty());
        assert_eq!(board.tiers().count(), 3);
        for tier in Difficulty::ALL {
            assert!(board.entries(tier).is_empty());
        }
    }

    #[test]
    fn test_record_drops_lowest() {
        let mut store = Store::new(MemoryStorage::default());
        store.record_at(Difficulty::Medium, 50, 1.0);
        store.record_at(Difficulty::Medium, 30, 2.0);
        store.record_at(Difficulty::Medium, 10, 3.0);

        assert_eq!(store.record_at(Difficulty::Medium, 40, 4.0), Some(2));
        let board = store.load();
        assert_eq!(scores(board.entries(Difficulty::Medium)), vec![50, 40, 30]);
        assert!(board.entries(Difficulty::Easy).is_empty());
    }

    #[test]
    fn test_record_too_low_is_cut() {
        let mut store = Store::new(MemoryStorage::default());
        for s in [50, 30, 10] {
            store.record_at(Difficulty::Hard, s, 0.0);
        }
        assert_eq!(store.record_at(Difficulty::Hard, 5, 0.0), None);
        assert_eq!(scores(store.load().entries(Difficulty::Hard)), vec![50, 30, 10]);
    }

    #[test]
    fn test_ties_keep_older_entry_first() {
        let mut board = Leaderboard::default();
        board.insert(Difficulty::Easy, LeaderboardEntry::new(20, 1.0));
        board.insert(Difficulty::Easy, LeaderboardEntry::new(20, 2.0));
        let entries = board.entries(Difficulty::Easy);
        assert_eq!(entries[0].timestamp, 1.0);
        assert_eq!(entries[1].timestamp, 2.0);
        assert_eq!(board.potential_rank(Difficulty::Easy, 20), Some(3));
    }

    #[test]
    fn test_preview_marks_current_without_persisting() {
        let mut store = Store::new(MemoryStorage::default());
        for s in [50, 30, 10] {
            store.record_at(Difficulty::Easy, s, 0.0);
        }
        let before = store.storage().get(Store::STORAGE_KEY).unwrap();

        let preview = store.preview_with_current(Difficulty::Easy, 35);
        assert_eq!(scores(&preview), vec![50, 35, 30]);
        assert!(preview[1].is_current);
        assert!(!preview[0].is_current && !preview[2].is_current);

        assert_eq!(store.storage().get(Store::STORAGE_KEY).unwrap(), before);
        assert_eq!(scores(store.load().entries(Difficulty::Easy)), vec![50, 30, 10]);
    }

    #[test]
    fn test_corrupt_storage_reads_empty() {
        let mut storage = MemoryStorage::default();
        storage.insert(Store::STORAGE_KEY, "[[[not a leaderboard");
        let mut store = Store::new(storage);
        assert!(store.load().is_empty());

        // Recording over a corrupt record starts a fresh document
        store.record_at(Difficulty::Hard, 12, 0.0);
        assert_eq!(scores(store.load().entries(Difficulty::Hard)), vec![12]);
    }

    #[test]
    fn test_from_json_sanitizes() {
        let json = r#"{
            "easy": [{"score": 1, "timestamp": 0}, {"score": 9, "timestamp": 0},
                     {"score": 5, "timestamp": 0}, {"score": 7, "timestamp": 0}],
            "insane": [{"score": 1000, "timestamp": 0}],
            "hard": [{"score": 3, "timestamp": 0, "isCurrent": true}]
        }"#;
        let board = Leaderboard::from_json(json, 3).unwrap();
        assert_eq!(scores(board.entries(Difficulty::Easy)), vec![9, 7, 5]);
        assert!(board.entries(Difficulty::Medium).is_empty());
        assert!(!board.entries(Difficulty::Hard)[0].is_current);
        assert_eq!(board.tiers().count(), 3);
    }

    #[test]
    fn test_json_shape() {
        let mut board = Leaderboard::default();
        board.insert(Difficulty::Hard, LeaderboardEntry::new(42, 1000.0));
        let value: serde_json::Value = serde_json::from_str(&board.to_json().unwrap()).unwrap();
        assert_eq!(value["hard"][0]["score"], 42);
        assert_eq!(value["hard"][0]["timestamp"], 1000.0);
        assert!(value["hard"][0].get("isCurrent").is_none());
        assert_eq!(value["easy"], serde_json::json!([]));
    }

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_unavailable_storage_is_best_effort() {
        let mut store = LeaderboardStore::new(BrokenStorage);
        assert!(store.load().is_empty());
        assert_eq!(store.record_at(Difficulty::Easy, 10, 0.0), Some(1));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_format_age() {
        let now = 10.0 * 86_400_000.0;
        assert_eq!(format_age(now - 5_000.0, now), "Just now");
        assert_eq!(format_age(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_age(now - 5.0 * 60_000.0, now), "5 mins ago");
        assert_eq!(format_age(now - 3_600_000.0, now), "1 hour ago");
        assert_eq!(format_age(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(format_age(now - 3.0 * 86_400_000.0, now), "3 days ago");
    }

    proptest! {
        #[test]
        fn prop_record_keeps_sorted_and_bounded(
            records in prop::collection::vec((0usize..3, 0u64..1000), 0..40),
        ) {
            let mut store = Store::new(MemoryStorage::default());
            for (i, (tier, score)) in records.iter().enumerate() {
                store.record_at(Difficulty::ALL[*tier], *score, i as f64);
            }
            let board = store.load();
            for tier in Difficulty::ALL {
                let entries = board.entries(tier);
                prop_assert!(entries.len() <= MAX_LEADERBOARD_ENTRIES);
                prop_assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));

                let mut expected: Vec<u64> = records
                    .iter()
                    .filter(|(t, _)| Difficulty::ALL[*t] == tier)
                    .map(|(_, s)| *s)
                    .collect();
                expected.sort_unstable_by(|a, b| b.cmp(a));
                expected.truncate(MAX_LEADERBOARD_ENTRIES);
                prop_assert_eq!(scores(entries), expected);
            }
        }
    }
}
