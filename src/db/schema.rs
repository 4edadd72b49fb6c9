use rusqlite::{Connection, Result};

use crate::content::letters::DEFAULT_LETTERS_CSV;

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Complete schema for new databases; upgrades below cover older files
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS orthograms (
      id TEXT PRIMARY KEY,
      name TEXT NOT NULL,
      rule TEXT NOT NULL DEFAULT '',
      letters TEXT NOT NULL DEFAULT 'а,о,е,и,я'
    );

    CREATE TABLE IF NOT EXISTS orthogram_examples (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      orthogram_id TEXT NOT NULL,
      text TEXT NOT NULL,
      masked_word TEXT NOT NULL,
      explanation TEXT,
      incorrect_variant TEXT,
      is_for_quiz INTEGER NOT NULL DEFAULT 0,
      is_active INTEGER NOT NULL DEFAULT 1,
      FOREIGN KEY (orthogram_id) REFERENCES orthograms(id)
    );

    CREATE TABLE IF NOT EXISTS correct_answers (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      orthogram_number INTEGER NOT NULL,
      correct_word TEXT NOT NULL,
      description TEXT
    );

    CREATE TABLE IF NOT EXISTS user_examples (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      student TEXT NOT NULL,
      field_name TEXT NOT NULL,
      content TEXT NOT NULL DEFAULT '',
      updated_at TEXT NOT NULL,
      UNIQUE (student, field_name)
    );

    CREATE TABLE IF NOT EXISTS student_answers (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      student TEXT NOT NULL,
      orthogram_id TEXT NOT NULL,
      example_id INTEGER,
      is_correct INTEGER NOT NULL,
      answered_at TEXT NOT NULL
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_examples_orthogram ON orthogram_examples(orthogram_id, is_active);
    CREATE INDEX IF NOT EXISTS idx_answers_number ON correct_answers(orthogram_number);
    CREATE INDEX IF NOT EXISTS idx_answers_word ON correct_answers(correct_word);
    CREATE INDEX IF NOT EXISTS idx_answers_number_word ON correct_answers(orthogram_number, correct_word);
    CREATE INDEX IF NOT EXISTS idx_student_answers_time ON student_answers(student, answered_at);
    "#,
  )?;

  // Letter sets were added after the first orthogram tables shipped
  add_column_if_missing(
    conn,
    "orthograms",
    "letters",
    &format!("TEXT NOT NULL DEFAULT '{}'", DEFAULT_LETTERS_CSV),
  )?;
  add_column_if_missing(conn, "orthogram_examples", "is_for_quiz", "INTEGER NOT NULL DEFAULT 0")?;
  add_column_if_missing(conn, "orthogram_examples", "incorrect_variant", "TEXT")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    tracing::info!("Adding column {}.{}", table, column);
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
