//! Application state shared by all handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use target_game::{BoardConfig, Dispatcher, GameState};

use crate::content::LetterTable;
use crate::db::{self, DbLockError, DbPool, LogOnError};

/// A game played through the HTTP API.
pub struct HostedGame {
    pub game: GameState,
    pub last_used: DateTime<Utc>,
}

impl HostedGame {
    pub fn new(game: GameState, now: DateTime<Utc>) -> Self {
        Self { game, last_used: now }
    }

    /// The game, marked as used now.
    pub fn touch(&mut self, now: DateTime<Utc>) -> &mut GameState {
        self.last_used = now;
        &mut self.game
    }
}

/// Hosted dartboard games keyed by session id
pub type GameSessions = Arc<Mutex<HashMap<String, HostedGame>>>;

/// Drop games idle for longer than `idle`, then the least recently used
/// ones until a new game fits under `max`. Returns how many were dropped.
pub fn evict_games(
    games: &mut HashMap<String, HostedGame>,
    now: DateTime<Utc>,
    idle: Duration,
    max: usize,
) -> usize {
    let before = games.len();
    games.retain(|_, hosted| now - hosted.last_used <= idle);

    while !games.is_empty() && games.len() >= max {
        let oldest = games
            .iter()
            .min_by_key(|(_, hosted)| hosted.last_used)
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                tracing::debug!("Dropping least recently used game {}", id);
                games.remove(&id);
            }
            None => break,
        }
    }

    before - games.len()
}

/// Board JSON safe to embed inside a `<script>` element.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub board: Arc<BoardConfig>,
    /// Board file as served to the page, already validated
    pub board_json: Arc<String>,
    pub letters: Arc<LetterTable>,
    pub games: GameSessions,
    pub dispatcher: Arc<Dispatcher>,
    pub tally_capacity: usize,
}

impl AppState {
    pub fn new(db: DbPool, board: BoardConfig, letters: LetterTable, tally_capacity: usize) -> Self {
        // BoardConfig only holds strings, numbers and vectors
        let board_json = script_safe_json(&serde_json::to_string(&board).unwrap_or_default());
        Self {
            db,
            board: Arc::new(board),
            board_json: Arc::new(board_json),
            letters: Arc::new(letters),
            games: Arc::new(Mutex::new(HashMap::new())),
            dispatcher: Arc::new(Dispatcher::new()),
            tally_capacity,
        }
    }

    /// Lock the session table; a poisoned lock is reported like a database outage.
    pub fn lock_games(&self) -> Result<MutexGuard<'_, HashMap<String, HostedGame>>, DbLockError> {
        self.games.lock().map_err(|_| {
            tracing::error!("Game session mutex poisoned");
            DbLockError
        })
    }

    /// Candidate letters for a mask id, consulting the database for plain
    /// orthograms the letter table does not cover.
    pub fn letters_for(&self, conn: &rusqlite::Connection, mask_id: &str) -> Vec<String> {
        self.letters.resolve(mask_id, |base| {
            db::orthogram_letters(conn, base)
                .log_warn("Failed to read orthogram letters")
                .flatten()
        })
    }
}
