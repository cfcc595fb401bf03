//! Round history
//!
//! Keeps the most recent finished rounds, newest first, and answers
//! "best so far" questions for the results screen.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::round::{RoundConfig, RoundSummary};

/// Maximum number of rounds to keep
pub const MAX_HISTORY: usize = 10;

/// A finished round and when it was played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub summary: RoundSummary,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoundHistory {
    pub entries: Vec<HistoryEntry>,
}

impl RoundHistory {
    /// LocalStorage key / file name stem
    const STORAGE_KEY: &'static str = "heads_up_history";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a round at the front, dropping the oldest beyond the limit.
    /// Returns true if it set a new best for its mode and target.
    pub fn record(&mut self, summary: RoundSummary, timestamp: f64) -> bool {
        let new_best = match summary.config {
            RoundConfig::Countdown { seconds } => {
                summary.score > 0
                    && self
                        .best_countdown_score(seconds)
                        .is_none_or(|best| summary.score > best)
            }
            RoundConfig::ScoreTarget { count } => {
                summary.target_reached
                    && self
                        .best_score_target_time(count)
                        .is_none_or(|best| summary.elapsed < best)
            }
        };

        self.entries.insert(0, HistoryEntry { summary, timestamp });
        self.entries.truncate(MAX_HISTORY);
        new_best
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Highest score among kept countdown rounds of this length
    pub fn best_countdown_score(&self, seconds: f64) -> Option<u32> {
        self.entries
            .iter()
            .filter_map(|e| match e.summary.config {
                RoundConfig::Countdown { seconds: s } if s == seconds => Some(e.summary.score),
                _ => None,
            })
            .max()
    }

    /// Fastest completed time among kept score target rounds of this count
    pub fn best_score_target_time(&self, count: u32) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| e.summary.target_reached)
            .filter_map(|e| match e.summary.config {
                RoundConfig::ScoreTarget { count: c } if c == count => Some(e.summary.elapsed),
                _ => None,
            })
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(StorageError::from)
            .and_then(|raw| Ok(serde_json::from_str::<RoundHistory>(&raw)?));
        match loaded {
            Ok(history) => {
                log::info!("Loaded {} history entries", history.entries.len());
                history
            }
            Err(e) => {
                log::info!("No round history found, starting fresh ({})", e);
                Self::new()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("History saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// File name used under a data directory
    pub fn file_name() -> String {
        format!("{}.json", Self::STORAGE_KEY)
    }

    /// Load history from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(history) = serde_json::from_str::<RoundHistory>(&json) {
                    log::info!("Loaded {} history entries", history.entries.len());
                    return history;
                }
            }
        }

        log::info!("No round history found, starting fresh");
        Self::new()
    }

    /// Save history to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;

        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StorageError::Unavailable)?;
        log::info!("History saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Current time as a Unix timestamp in ms
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(score: u32) -> RoundSummary {
        RoundSummary {
            category: "Animals".to_string(),
            config: RoundConfig::Countdown { seconds: 60.0 },
            score,
            elapsed: 60.0,
            target_reached: false,
            questions_seen: score + 2,
        }
    }

    fn race(count: u32, elapsed: f64) -> RoundSummary {
        RoundSummary {
            category: "Food".to_string(),
            config: RoundConfig::ScoreTarget { count },
            score: count,
            elapsed,
            target_reached: true,
            questions_seen: count,
        }
    }

    #[test]
    fn test_record_newest_first_and_bounded() {
        let mut history = RoundHistory::new();
        for i in 0..15 {
            history.record(countdown(i), i as f64);
        }
        assert_eq!(history.entries.len(), MAX_HISTORY);
        assert_eq!(history.entries[0].summary.score, 14);
        assert_eq!(history.entries[MAX_HISTORY - 1].summary.score, 5);
    }

    #[test]
    fn test_new_best_detection() {
        let mut history = RoundHistory::new();
        assert!(history.record(countdown(4), 0.0));
        assert!(!history.record(countdown(3), 1.0));
        assert!(!history.record(countdown(4), 2.0));
        assert!(history.record(countdown(6), 3.0));
        assert_eq!(history.best_countdown_score(60.0), Some(6));
        assert_eq!(history.best_countdown_score(30.0), None);

        assert!(history.record(race(5, 40.0), 4.0));
        assert!(!history.record(race(5, 45.0), 5.0));
        assert!(history.record(race(5, 31.5), 6.0));
        assert!(history.record(race(10, 90.0), 7.0));
        assert_eq!(history.best_score_target_time(5), Some(31.5));
    }

    #[test]
    fn test_zero_score_is_never_a_best() {
        let mut history = RoundHistory::new();
        assert!(!history.record(countdown(0), 0.0));
        assert_eq!(history.best_countdown_score(60.0), Some(0));
        assert!(history.record(countdown(1), 1.0));
    }

    #[test]
    fn test_clear() {
        let mut history = RoundHistory::new();
        history.record(countdown(1), 0.0);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RoundHistory::file_name());
        assert!(RoundHistory::load_from(&path).is_empty());

        let mut history = RoundHistory::new();
        history.record(race(5, 12.5), 1_700_000_000_000.0);
        history.save_to(&path).unwrap();
        assert_eq!(RoundHistory::load_from(&path), history);
    }

    #[test]
    fn test_format_age() {
        let now = 10.0 * 24.0 * 3_600_000.0;
        assert_eq!(format_age(now - 5_000.0, now), "Just now");
        assert_eq!(format_age(now - 60_000.0, now), "1 min ago");
        assert_eq!(format_age(now - 5.0 * 60_000.0, now), "5 mins ago");
        assert_eq!(format_age(now - 3_600_000.0, now), "1 hour ago");
        assert_eq!(format_age(now - 25.0 * 3_600_000.0, now), "Yesterday");
        assert_eq!(format_age(now - 72.0 * 3_600_000.0, now), "3 days ago");
    }
}
