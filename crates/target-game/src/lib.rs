//! Dartboard vocabulary game.
//!
//! The player drags an arrow carrying a word onto the board segment whose
//! spelling rule the word follows. This crate holds the whole game model and
//! compiles both natively (used by the server) and to WASM (used by the page).

pub mod action;
pub mod board;
pub mod segments;
pub mod state;
pub mod tally;
pub mod wasm;

pub use action::{ActionArgs, ActionError, ActionKind, Dispatcher, GameEvent};
pub use board::{BoardConfig, Cell, ConfigError, SegmentSpec, TargetResolver};
pub use segments::{SegmentError, SegmentRegistry, MIN_ENABLED_SEGMENTS};
pub use state::{GameError, GameSnapshot, GameState, Throw};
pub use tally::{Outcome, RoundSummary, ScoreTally, TallyError, Tier, DEFAULT_TALLY_CAPACITY};
