//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//! - `PORT`: Override the server port (see config.rs)
//!
//! Content files (board, letter sets, orthogram catalog) ship with the
//! repository and are read relative to the working directory, like `static/`.

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database path
pub fn db_path() -> String {
    format!("{}/orfo.db", data_dir())
}

/// Bundled content directory
pub const CONTENT_DIR: &str = "content";

/// Static assets directory served under `/static`
pub const STATIC_DIR: &str = "static";

/// Dartboard layout and segment word lists
pub fn board_path() -> String {
    format!("{}/board.json", CONTENT_DIR)
}

/// Consolidated letter-set table for exercise widgets
pub fn letters_path() -> String {
    format!("{}/letters.json", CONTENT_DIR)
}

/// Orthogram rules, examples and accepted answers seeded into the database
pub fn catalog_path() -> String {
    format!("{}/orthograms.json", CONTENT_DIR)
}
