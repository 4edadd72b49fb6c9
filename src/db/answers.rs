//! Accepted spellings for the planning word check.

use rusqlite::{params, Connection, Result};

pub fn insert_correct_answer(
  conn: &Connection,
  orthogram_number: i64,
  word: &str,
  description: Option<&str>,
) -> Result<()> {
  conn.execute(
    "INSERT INTO correct_answers (orthogram_number, correct_word, description) VALUES (?1, ?2, ?3)",
    params![orthogram_number, word, description],
  )?;
  Ok(())
}

pub fn count_correct_answers(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM correct_answers", [], |row| row.get(0))
}

/// True if `word` is stored exactly as written.
pub fn is_correct_word(conn: &Connection, word: &str) -> Result<bool> {
  conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM correct_answers WHERE correct_word = ?1)",
    [word],
    |row| row.get(0),
  )
}
