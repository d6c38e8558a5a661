//! Best score tracking
//!
//! Persisted as a decimal string under one well-known key. Anything that does
//! not parse as a non-negative integer reads back as zero.

use crate::platform::storage::KeyValueStore;

/// The best score ever reached on this origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "flappyHighScore";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Check if a finished session's score beats the record
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished session's score. Returns true if it is a new record.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Parse a stored value
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u32>() {
            Ok(best) => Self { best },
            Err(_) => {
                log::warn!("Ignoring malformed high score {:?}", raw);
                Self::default()
            }
        }
    }

    /// Load the high score from storage
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(raw) => {
                let score = Self::parse(&raw);
                log::info!("Loaded high score {}", score.best);
                score
            }
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Save the high score to storage
    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(Self::STORAGE_KEY, &self.best.to_string());
        log::info!("High score saved ({})", self.best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_missing_value_is_zero() {
        let store = MemoryStore::default();
        assert_eq!(HighScore::load(&store).best(), 0);
    }

    #[test]
    fn test_malformed_values_are_zero() {
        for raw in ["", "abc", "-4", "12abc", "1.5", "99999999999999"] {
            assert_eq!(HighScore::parse(raw).best(), 0, "raw = {:?}", raw);
        }
        assert_eq!(HighScore::parse(" 17\n").best(), 17);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::default();
        HighScore::new(42).save(&mut store);
        assert_eq!(store.get(HighScore::STORAGE_KEY).as_deref(), Some("42"));
        assert_eq!(HighScore::load(&store).best(), 42);
    }

    #[test]
    fn test_record_only_increases() {
        let mut hs = HighScore::new(10);
        assert!(!hs.record(3));
        assert!(!hs.record(10));
        assert_eq!(hs.best(), 10);
        assert!(hs.record(11));
        assert_eq!(hs.best(), 11);
    }

    proptest! {
        #[test]
        fn prop_record_is_monotonic(prior in 0u32..1000, score in 0u32..1000) {
            let mut hs = HighScore::new(prior);
            let improved = hs.record(score);
            prop_assert!(hs.best() >= prior);
            prop_assert_eq!(improved, score > prior);
            prop_assert_eq!(hs.best() == score, score >= prior);
        }
    }
}
