//! Game state for one player: board, segments, tally and the word in play.

use rand::prelude::IndexedRandom;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::{BoardConfig, ConfigError, TargetResolver};
use crate::segments::{SegmentError, SegmentRegistry};
use crate::tally::{Outcome, RoundSummary, ScoreTally, TallyError};

/// Error applying a player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Throws are disabled while segments are being edited
    Editing,
    /// Segment editing requested outside edit mode
    NotEditing,
    /// Word pool is empty, nothing to throw
    NoWord,
    Segment(SegmentError),
    Tally(TallyError),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Editing => write!(f, "Finish editing segments before throwing"),
            GameError::NotEditing => write!(f, "Segment editing is not active"),
            GameError::NoWord => write!(f, "No word in play"),
            GameError::Segment(e) => write!(f, "{}", e),
            GameError::Tally(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GameError {}

impl From<SegmentError> for GameError {
    fn from(e: SegmentError) -> Self {
        GameError::Segment(e)
    }
}

impl From<TallyError> for GameError {
    fn from(e: TallyError) -> Self {
        GameError::Tally(e)
    }
}

/// A throw that landed on an enabled segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Throw {
    pub segment: String,
    pub word: String,
    pub correct: bool,
    /// Present when this throw completed the round
    pub summary: Option<RoundSummary>,
}

/// Segment as shown on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    pub name: String,
    pub title: Option<String>,
    pub enabled: bool,
    /// Disabled segments are drawn blurred
    pub blurred: bool,
    pub word_count: usize,
}

/// Serializable view of the whole game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub current_word: Option<String>,
    pub slots: Vec<Outcome>,
    pub capacity: usize,
    pub correct: usize,
    pub editing: bool,
    pub pool_size: usize,
    pub segments: Vec<SegmentView>,
    pub summary: Option<RoundSummary>,
}

pub struct GameState {
    resolver: TargetResolver,
    segments: SegmentRegistry,
    tally: ScoreTally,
    pool: Vec<String>,
    current_word: Option<String>,
    editing: bool,
    rng: SmallRng,
}

impl GameState {
    /// Start a game on a validated board. `seed` drives word selection.
    pub fn new(config: &BoardConfig, tally_capacity: usize, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if tally_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let mut state = Self {
            resolver: TargetResolver::from_config(config),
            segments: SegmentRegistry::new(&config.segments),
            tally: ScoreTally::new(tally_capacity),
            pool: Vec::new(),
            current_word: None,
            editing: false,
            rng: SmallRng::seed_from_u64(seed),
        };
        state.rebuild_pool();
        Ok(state)
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn word_pool(&self) -> &[String] {
        &self.pool
    }

    pub fn segments(&self) -> &SegmentRegistry {
        &self.segments
    }

    pub fn tally(&self) -> &ScoreTally {
        &self.tally
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Raw hit-test, ignoring whether the segment is enabled.
    pub fn hover(&self, x: f64, y: f64) -> Option<&str> {
        self.resolver.resolve(x, y)
    }

    /// Enabled segment under the arrow tip while dragging.
    pub fn aim(&self, x: f64, y: f64) -> Result<Option<&str>, GameError> {
        if self.editing {
            return Err(GameError::Editing);
        }
        Ok(self
            .resolver
            .resolve(x, y)
            .filter(|label| self.segments.is_enabled(label)))
    }

    /// Release the arrow at `(x, y)`.
    ///
    /// Missing the board, or hitting a disabled segment, is not a scoring
    /// event and returns `Ok(None)`.
    pub fn drop_at(&mut self, x: f64, y: f64) -> Result<Option<Throw>, GameError> {
        let segment = match self.aim(x, y)? {
            Some(label) => label.to_string(),
            None => return Ok(None),
        };
        let word = match self.current_word.clone() {
            Some(word) => word,
            None => {
                tracing::warn!("Throw at \"{}\" with an empty word pool", segment);
                return Err(GameError::NoWord);
            }
        };

        let correct = self.segments.segment_has_word(&segment, &word);
        let summary = self.tally.record(correct, &word)?;
        if let Some(summary) = &summary {
            tracing::info!(
                "Round complete: {}/{} correct ({})",
                summary.correct,
                summary.total,
                summary.label
            );
        }
        self.draw_word();

        Ok(Some(Throw {
            segment,
            word,
            correct,
            summary,
        }))
    }

    /// Replace the current word without scoring.
    pub fn skip(&mut self) -> Option<&str> {
        self.draw_word();
        self.current_word()
    }

    /// Take back the last missed throw; the missed word is back in play.
    pub fn undo(&mut self) -> Option<&str> {
        let word = self.tally.undo_last()?;
        self.current_word = Some(word);
        self.current_word()
    }

    pub fn restart(&mut self) -> Option<&str> {
        self.tally.reset();
        self.draw_word();
        self.current_word()
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Flip a segment on or off. Resets the tally and redraws the word.
    pub fn toggle_segment(&mut self, name: &str) -> Result<bool, GameError> {
        let enabled = self.segments.toggle(name)?;
        self.tally.reset();
        self.rebuild_pool();
        Ok(enabled)
    }

    /// Toggle the segment under `(x, y)` in edit mode. `Ok(None)` on a miss.
    pub fn toggle_at(&mut self, x: f64, y: f64) -> Result<Option<(String, bool)>, GameError> {
        if !self.editing {
            return Err(GameError::NotEditing);
        }
        let label = match self.resolver.resolve(x, y) {
            Some(label) => label.to_string(),
            None => return Ok(None),
        };
        let enabled = self.toggle_segment(&label)?;
        Ok(Some((label, enabled)))
    }

    /// Dismiss a finished round: all segments back on, fresh tally.
    pub fn close_round(&mut self) -> Option<&str> {
        self.segments.reset_all();
        self.tally.reset();
        self.rebuild_pool();
        self.current_word()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            current_word: self.current_word.clone(),
            slots: self.tally.slots().to_vec(),
            capacity: self.tally.capacity(),
            correct: self.tally.correct_count(),
            editing: self.editing,
            pool_size: self.pool.len(),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentView {
                    name: s.name.clone(),
                    title: s.title.clone(),
                    enabled: s.enabled,
                    blurred: !s.enabled,
                    word_count: s.words.len(),
                })
                .collect(),
            summary: self.tally.summary(),
        }
    }

    fn rebuild_pool(&mut self) {
        self.pool = self.segments.word_pool();
        // The old word may belong to a segment that was just disabled
        self.draw_word();
    }

    fn draw_word(&mut self) {
        self.current_word = self.pool.choose(&mut self.rng).cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, SegmentSpec};

    /// Four quadrant segments, one ring of radius 0.5.
    fn quadrant_board() -> BoardConfig {
        let names = ["east", "north", "west", "south"];
        BoardConfig {
            ring_radii: vec![0.5],
            cells: names.iter().map(|n| vec![Cell::Single(n.to_string())]).collect(),
            segments: names
                .iter()
                .map(|n| SegmentSpec {
                    name: n.to_string(),
                    title: None,
                    words: vec![format!("{}-word", n)],
                })
                .collect(),
        }
    }

    /// Point inside the named quadrant.
    fn at(name: &str) -> (f64, f64) {
        match name {
            "east" => (0.3, 0.1),
            "north" => (-0.1, 0.3),
            "west" => (-0.3, -0.1),
            _ => (0.1, -0.3),
        }
    }

    fn segment_of(word: &str) -> &str {
        word.trim_end_matches("-word")
    }

    fn game(capacity: usize) -> GameState {
        GameState::new(&quadrant_board(), capacity, 7).unwrap()
    }

    #[test]
    fn test_correct_and_incorrect_throws() {
        let mut game = game(10);
        let word = game.current_word().unwrap().to_string();
        let (x, y) = at(segment_of(&word));
        let throw = game.drop_at(x, y).unwrap().unwrap();
        assert!(throw.correct);
        assert_eq!(throw.word, word);

        let word = game.current_word().unwrap().to_string();
        let wrong = if segment_of(&word) == "east" { "west" } else { "east" };
        let (x, y) = at(wrong);
        let throw = game.drop_at(x, y).unwrap().unwrap();
        assert!(!throw.correct);
        assert_eq!(throw.segment, wrong);
        assert_eq!(game.tally().slots(), &[Outcome::Correct, Outcome::Incorrect]);
    }

    #[test]
    fn test_miss_is_not_scored() {
        let mut game = game(10);
        let word = game.current_word().map(str::to_string);
        assert_eq!(game.drop_at(0.49, 0.49), Ok(None));
        assert!(game.tally().is_empty());
        assert_eq!(game.current_word().map(str::to_string), word);
    }

    #[test]
    fn test_disabled_segment_is_not_a_target() {
        let mut game = game(10);
        game.toggle_segment("east").unwrap();
        let (x, y) = at("east");
        assert_eq!(game.aim(x, y), Ok(None));
        assert_eq!(game.drop_at(x, y), Ok(None));
        assert_eq!(game.hover(x, y), Some("east"));
    }

    #[test]
    fn test_toggle_rebuilds_pool_and_resets_tally() {
        let mut game = game(10);
        let (x, y) = at("north");
        game.drop_at(x, y).unwrap();
        assert_eq!(game.tally().len(), 1);

        game.toggle_segment("north").unwrap();
        assert!(game.tally().is_empty());
        assert_eq!(game.word_pool(), &["east-word", "west-word", "south-word"]);
        assert_ne!(game.current_word(), Some("north-word"));

        game.toggle_segment("north").unwrap();
        assert_eq!(
            game.word_pool(),
            &["east-word", "north-word", "west-word", "south-word"]
        );
    }

    #[test]
    fn test_minimum_enabled_segments() {
        let mut game = game(10);
        game.toggle_segment("east").unwrap();
        game.toggle_segment("north").unwrap();
        let before = game.snapshot();

        assert!(matches!(
            game.toggle_segment("west"),
            Err(GameError::Segment(SegmentError::MinimumEnabled { .. }))
        ));
        assert_eq!(game.segments().enabled_count(), 2);
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_round_completes_once() {
        let mut game = game(3);
        let mut summaries = 0;
        for _ in 0..3 {
            let word = game.current_word().unwrap().to_string();
            let (x, y) = at(segment_of(&word));
            if game.drop_at(x, y).unwrap().unwrap().summary.is_some() {
                summaries += 1;
            }
        }
        assert_eq!(summaries, 1);
        assert_eq!(game.snapshot().summary.unwrap().correct, 3);

        let (x, y) = at("east");
        assert_eq!(
            game.drop_at(x, y),
            Err(GameError::Tally(TallyError::Full { capacity: 3 }))
        );
    }

    #[test]
    fn test_undo_restores_missed_word() {
        let mut game = game(10);
        let word = game.current_word().unwrap().to_string();
        let wrong = if segment_of(&word) == "south" { "north" } else { "south" };
        let (x, y) = at(wrong);
        game.drop_at(x, y).unwrap();

        assert_eq!(game.undo(), Some(word.as_str()));
        assert!(game.tally().is_empty());
    }

    #[test]
    fn test_undo_after_correct_changes_nothing() {
        let mut game = game(10);
        let word = game.current_word().unwrap().to_string();
        let (x, y) = at(segment_of(&word));
        game.drop_at(x, y).unwrap();
        let before = game.snapshot();

        assert_eq!(game.undo(), None);
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_editing_blocks_throws_and_enables_toggle_at() {
        let mut game = game(10);
        let (x, y) = at("west");
        assert_eq!(game.toggle_at(x, y), Err(GameError::NotEditing));

        game.set_editing(true);
        assert_eq!(game.drop_at(x, y), Err(GameError::Editing));
        assert_eq!(game.toggle_at(x, y), Ok(Some(("west".to_string(), false))));
        assert_eq!(game.toggle_at(0.49, 0.49), Ok(None));
        assert!(game.snapshot().segments[2].blurred);
    }

    #[test]
    fn test_close_round_enables_everything() {
        let mut game = game(10);
        game.toggle_segment("south").unwrap();
        game.close_round();
        assert_eq!(game.segments().enabled_count(), 4);
        assert_eq!(game.word_pool().len(), 4);
        assert!(game.current_word().is_some());
    }

    #[test]
    fn test_empty_pool_has_no_word() {
        let mut board = quadrant_board();
        for segment in &mut board.segments {
            segment.words.clear();
        }
        let mut game = GameState::new(&board, 5, 1).unwrap();
        assert_eq!(game.current_word(), None);
        let (x, y) = at("east");
        assert_eq!(game.drop_at(x, y), Err(GameError::NoWord));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            GameState::new(&quadrant_board(), 0, 1),
            Err(ConfigError::ZeroCapacity)
        ));
    }
}
