//! High score leaderboard system
//!
//! Top 10 scores, persisted as a JSON array under a single storage key.
//! Storage failures degrade to a process-local list.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Storage key for the serialized list
pub const STORAGE_KEY: &str = "snakeHighScores";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub player: String,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, highest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, player: &str, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            player: player.to_string(),
            timestamp,
        };

        // Ties rank below the scores already present
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Leaderboard bound to a store, with an in-memory fallback
pub struct ScoreBoard {
    store: Box<dyn KeyValueStore>,
    fallback: HighScores,
}

impl ScoreBoard {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            fallback: HighScores::new(),
        }
    }

    /// Current list. Unreadable or malformed storage yields the fallback.
    pub fn load(&self) -> HighScores {
        match self.read() {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Could not load high scores ({e}), using in-memory list");
                self.fallback.clone()
            }
        }
    }

    /// Record a finished game and return the updated list.
    /// Zero scores are never recorded.
    pub fn record(&mut self, score: u32, player: &str, timestamp: f64) -> HighScores {
        if score == 0 {
            return self.load();
        }
        match self.try_record(score, player, timestamp) {
            Ok(scores) => {
                log::info!("High scores saved ({} entries)", scores.len());
                scores
            }
            Err(e) => {
                log::warn!("Could not save high score ({e}), keeping it in memory");
                self.fallback.add_score(score, player, timestamp);
                self.fallback.clone()
            }
        }
    }

    fn read(&self) -> Result<HighScores, StorageError> {
        match self.store.get(STORAGE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(HighScores::new()),
        }
    }

    fn try_record(&mut self, score: u32, player: &str, timestamp: f64) -> Result<HighScores, StorageError> {
        let mut scores = self.read()?;
        scores.add_score(score, player, timestamp);
        let json = serde_json::to_string(&scores)?;
        self.store.set(STORAGE_KEY, &json)?;
        Ok(scores)
    }
}

/// Format a timestamp relative to `now` (both ms since the epoch)
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i32;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            format_absolute(timestamp, days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i32;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i32;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(target_arch = "wasm32")]
fn format_absolute(timestamp: f64, _days: i32) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year() % 100
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn format_absolute(_timestamp: f64, days: i32) -> String {
    format!("{} days ago", days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_sorted_and_capped() {
        let mut scores = HighScores::new();
        for s in [5, 50, 20, 1, 7, 33, 12, 9, 41, 2, 3] {
            scores.add_score(s, "p", 0.0);
        }
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        let values: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![50, 41, 33, 20, 12, 9, 7, 5, 3, 2]);

        assert!(!scores.qualifies(2));
        assert!(scores.qualifies(4));
        assert_eq!(scores.add_score(100, "best", 0.0), Some(1));
        assert_eq!(scores.top_score(), Some(100));
    }

    #[test]
    fn test_zero_never_recorded() {
        let mut board = ScoreBoard::new(Box::new(MemoryStore::new()));
        assert!(board.record(0, "p", 0.0).is_empty());
        assert!(board.load().is_empty());
    }

    #[test]
    fn test_record_persists_json_array() {
        let mut board = ScoreBoard::new(Box::new(MemoryStore::new()));
        board.record(12, "Ada", 1_000.0);
        let scores = board.record(30, "Bob", 2_000.0);
        assert_eq!(scores.entries[0].player, "Bob");
        assert_eq!(board.load(), scores);

        let json = board.store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_malformed_storage_falls_back() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{garbage").unwrap();
        let mut board = ScoreBoard::new(Box::new(store));
        assert!(board.load().is_empty());

        let scores = board.record(8, "p", 0.0);
        assert_eq!(scores.top_score(), Some(8));
        assert_eq!(board.load().top_score(), Some(8));
    }

    #[test]
    fn test_unavailable_storage_keeps_scores_in_memory() {
        let mut board = ScoreBoard::new(Box::new(BrokenStore));
        board.record(3, "p", 0.0);
        let scores = board.record(9, "p", 0.0);
        assert_eq!(scores.len(), 2);
        assert_eq!(board.load(), scores);
    }

    #[test]
    fn test_format_date() {
        let now = 1_000_000_000.0;
        assert_eq!(format_date(now - 10_000.0, now), "Just now");
        assert_eq!(format_date(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_date(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_date(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(format_date(now - 3.0 * 86_400_000.0, now), "3 days ago");
    }
}
