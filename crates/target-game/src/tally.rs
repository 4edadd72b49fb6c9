//! Fixed-size score tally ("medals") for one round of throws.

use serde::{Deserialize, Serialize};

/// Default number of throws in a round.
pub const DEFAULT_TALLY_CAPACITY: usize = 51;

/// Result of a single throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Grade awarded at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Promising,
    Beginner,
}

impl Tier {
    /// Tier for `correct` hits out of `total` throws.
    pub fn from_score(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Tier::Beginner;
        }
        let ratio = correct as f64 / total as f64;
        if ratio >= 0.90 {
            Tier::Excellent
        } else if ratio >= 0.70 {
            Tier::Good
        } else if ratio >= 0.45 {
            Tier::Promising
        } else {
            Tier::Beginner
        }
    }

    /// School grade (2-5)
    pub fn grade(&self) -> u8 {
        match self {
            Tier::Excellent => 5,
            Tier::Good => 4,
            Tier::Promising => 3,
            Tier::Beginner => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Excellent => "5 - Превосходный стрелок",
            Tier::Good => "4 - Хороший стрелок",
            Tier::Promising => "3 - Перспективный стрелок",
            Tier::Beginner => "2 - Начинающий стрелок",
        }
    }
}

/// Final result of a completed round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub total: usize,
    pub correct: usize,
    pub tier: Tier,
    pub label: &'static str,
}

impl RoundSummary {
    fn new(correct: usize, total: usize) -> Self {
        let tier = Tier::from_score(correct, total);
        Self {
            total,
            correct,
            tier,
            label: tier.label(),
        }
    }
}

/// Error recording a throw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    Full { capacity: usize },
}

impl std::fmt::Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::Full { capacity } => write!(f, "Score tally is full ({} slots)", capacity),
        }
    }
}

impl std::error::Error for TallyError {}

#[derive(Debug, Clone)]
pub struct ScoreTally {
    capacity: usize,
    slots: Vec<Outcome>,
    correct: usize,
    /// Words of incorrect throws, newest last
    missed_words: Vec<String>,
}

impl ScoreTally {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
            correct: 0,
            missed_words: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn slots(&self) -> &[Outcome] {
        &self.slots
    }

    /// Summary of the round, once every slot is used.
    pub fn summary(&self) -> Option<RoundSummary> {
        self.is_full()
            .then(|| RoundSummary::new(self.correct, self.slots.len()))
    }

    /// Record a throw at `word`. Filling the last slot returns the round summary.
    pub fn record(&mut self, correct: bool, word: &str) -> Result<Option<RoundSummary>, TallyError> {
        if self.is_full() {
            tracing::warn!("No free slots left in the score tally");
            return Err(TallyError::Full {
                capacity: self.capacity,
            });
        }

        if correct {
            self.slots.push(Outcome::Correct);
            self.correct += 1;
        } else {
            self.slots.push(Outcome::Incorrect);
            self.missed_words.push(word.to_string());
        }

        Ok(self.summary())
    }

    /// Take back the last throw if it missed, returning the missed word.
    ///
    /// Correct throws cannot be undone, and nothing can be undone once the
    /// round is complete.
    pub fn undo_last(&mut self) -> Option<String> {
        if self.is_full() || self.slots.last() != Some(&Outcome::Incorrect) {
            return None;
        }
        self.slots.pop();
        self.missed_words.pop()
    }

    pub fn reset(&mut self) {
        self.slots.clear();
        self.correct = 0;
        self.missed_words.clear();
    }
}

impl Default for ScoreTally {
    fn default() -> Self {
        Self::new(DEFAULT_TALLY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_triggers_single_summary() {
        let mut tally = ScoreTally::new(5);
        let mut summaries = Vec::new();
        for i in 0..5 {
            if let Some(summary) = tally.record(i % 2 == 0, "слово").unwrap() {
                summaries.push(summary);
            }
        }
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total, 5);
        assert_eq!(summaries[0].correct, 3);
        assert_eq!(summaries[0].tier, Tier::Promising);

        assert_eq!(tally.record(true, "слово"), Err(TallyError::Full { capacity: 5 }));
        assert_eq!(tally.len(), 5);
        assert_eq!(tally.correct_count(), 3);
    }

    #[test]
    fn test_default_capacity() {
        let mut tally = ScoreTally::default();
        for _ in 0..DEFAULT_TALLY_CAPACITY - 1 {
            assert_eq!(tally.record(true, "w"), Ok(None));
        }
        let summary = tally.record(true, "w").unwrap().unwrap();
        assert_eq!(summary.total, 51);
        assert_eq!(summary.tier, Tier::Excellent);
        assert!(tally.record(true, "w").is_err());
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(Tier::from_score(9, 10), Tier::Excellent);
        assert_eq!(Tier::from_score(89, 100), Tier::Good);
        assert_eq!(Tier::from_score(7, 10), Tier::Good);
        assert_eq!(Tier::from_score(69, 100), Tier::Promising);
        assert_eq!(Tier::from_score(45, 100), Tier::Promising);
        assert_eq!(Tier::from_score(44, 100), Tier::Beginner);
        assert_eq!(Tier::from_score(0, 0), Tier::Beginner);
        assert_eq!(Tier::Good.grade(), 4);
        assert_eq!(Tier::Beginner.label(), "2 - Начинающий стрелок");
    }

    #[test]
    fn test_undo_after_correct_is_noop() {
        let mut tally = ScoreTally::new(10);
        tally.record(false, "плохо").unwrap();
        tally.record(true, "хорошо").unwrap();

        assert_eq!(tally.undo_last(), None);
        assert_eq!(tally.slots(), &[Outcome::Incorrect, Outcome::Correct]);
    }

    #[test]
    fn test_undo_restores_missed_words_in_order() {
        let mut tally = ScoreTally::new(10);
        tally.record(false, "первое").unwrap();
        tally.record(false, "второе").unwrap();

        assert_eq!(tally.undo_last(), Some("второе".to_string()));
        assert_eq!(tally.undo_last(), Some("первое".to_string()));
        assert_eq!(tally.undo_last(), None);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_undo_blocked_when_round_complete() {
        let mut tally = ScoreTally::new(2);
        tally.record(true, "a").unwrap();
        tally.record(false, "b").unwrap();
        assert!(tally.is_full());
        assert_eq!(tally.undo_last(), None);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut tally = ScoreTally::new(3);
        tally.record(true, "a").unwrap();
        tally.record(false, "b").unwrap();
        tally.reset();
        assert!(tally.is_empty());
        assert_eq!(tally.correct_count(), 0);
        assert_eq!(tally.undo_last(), None);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(ScoreTally::new(0).capacity(), 1);
    }
}
