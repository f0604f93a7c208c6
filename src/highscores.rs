//! Best score
//!
//! Persisted to LocalStorage as plain integer text.

use crate::persistence::{HIGH_SCORE_KEY, PersistResult, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Offer a score; returns true when it is a new best
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Leading decimal digits after optional whitespace; anything else is 0
    pub fn parse(text: &str) -> u64 {
        let digits: String = text
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(HIGH_SCORE_KEY) {
            Ok(Some(text)) => {
                let best = Self::parse(&text);
                log::info!("Loaded high score {best}");
                Self { best }
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("High score storage unavailable: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> PersistResult<()> {
        storage.set(HIGH_SCORE_KEY, &self.best.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_parse_like_leading_integer() {
        assert_eq!(HighScore::parse("42"), 42);
        assert_eq!(HighScore::parse("  17abc"), 17);
        assert_eq!(HighScore::parse("abc"), 0);
        assert_eq!(HighScore::parse(""), 0);
        assert_eq!(HighScore::parse("-5"), 0);
    }

    #[test]
    fn test_record_only_raises() {
        let mut hs = HighScore::new(10);
        assert!(!hs.record(10));
        assert!(!hs.record(3));
        assert!(hs.record(11));
        assert_eq!(hs.best(), 11);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = MemoryStorage::new();
        assert_eq!(HighScore::load(&store).best(), 0);
        HighScore::new(123).save(&mut store).unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("123"));
        assert_eq!(HighScore::load(&store).best(), 123);
    }
}
