//! Application configuration.
//!
//! Values are resolved with priority `config.toml` > environment (`.env` is
//! loaded first) > built-in defaults.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

/// Configuration file read from the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

// ==================== Drill Configuration ====================

/// Number of example lines in a generated exercise when the request gives none
pub const DEFAULT_EXERCISE_COUNT: usize = 5;

/// Upper bound on example lines per generated exercise
pub const MAX_EXERCISE_COUNT: usize = 30;

/// Orthogram used for the daily quiz (prepositions, 66.1)
pub const QUIZ_ORTHOGRAM: &str = "661";

/// Cookie holding the anonymous student id
pub const STUDENT_COOKIE: &str = "student_id";

/// Hosted game sessions kept in memory; the least recently used one makes room
pub const MAX_GAME_SESSIONS: usize = 1000;

/// Minutes a hosted game may sit untouched before it is dropped
pub const GAME_IDLE_MINUTES: i64 = 120;

/// Days covered by the weekly report
pub const REPORT_DAYS: i64 = 7;

/// Weakest orthograms listed in the weekly report
pub const WEAK_ORTHOGRAMS: usize = 3;

/// Similar words suggested after a mistake
pub const SIMILAR_WORDS: usize = 3;

// ==================== config.toml ====================

#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
    content: Option<ContentConfig>,
    game: Option<GameConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentConfig {
    board: Option<String>,
    letters: Option<String>,
    catalog: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GameConfig {
    tally_capacity: Option<usize>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub port: u16,
    pub board_path: PathBuf,
    pub letters_path: PathBuf,
    pub catalog_path: PathBuf,
    pub tally_capacity: usize,
}

impl Settings {
    /// Load settings from `config.toml`, `.env` and the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        let contents = std::fs::read_to_string(CONFIG_FILE).ok();
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from raw `config.toml` contents and an environment lookup.
    pub fn from_sources(config_toml: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let config = match config_toml.map(toml::from_str::<AppConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
                AppConfig::default()
            }
            None => AppConfig::default(),
        };

        let database_path = match config.database.and_then(|db| db.path) {
            Some(path) => {
                tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
                PathBuf::from(path)
            }
            None => match env("DATABASE_PATH") {
                Some(path) => {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                }
                None => PathBuf::from(paths::db_path()),
            },
        };

        let port = config
            .server
            .and_then(|s| s.port)
            .or_else(|| env("PORT").and_then(|p| p.parse().ok()))
            .unwrap_or(SERVER_PORT);

        let content = config.content.unwrap_or_default();
        let board_path = content
            .board
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::board_path()));
        let letters_path = content
            .letters
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::letters_path()));
        let catalog_path = content
            .catalog
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::catalog_path()));

        let tally_capacity = config
            .game
            .and_then(|g| g.tally_capacity)
            .filter(|&c| c > 0)
            .unwrap_or(target_game::DEFAULT_TALLY_CAPACITY);

        Self {
            database_path,
            port,
            board_path,
            letters_path,
            catalog_path,
            tally_capacity,
        }
    }

    /// Full address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}
