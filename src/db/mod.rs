pub mod answers;
pub mod notes;
pub mod orthograms;
pub mod progress;
pub mod schema;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::content::Catalog;

pub use answers::*;
pub use notes::*;
pub use orthograms::*;
pub use progress::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    self.log_warn(context).unwrap_or_default()
  }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Back up before migrations touch an existing file
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Load the catalog into an empty database. Orthogram rows are refreshed on
/// every start; examples and answers are only inserted once.
pub fn seed_catalog(conn: &mut Connection, catalog: &Catalog) -> Result<()> {
  let tx = conn.transaction()?;

  for orthogram in &catalog.orthograms {
    insert_orthogram(&tx, orthogram)?;
  }

  if count_examples(&tx)? == 0 {
    for orthogram in &catalog.orthograms {
      for example in &orthogram.examples {
        insert_example(&tx, &orthogram.id, example)?;
      }
    }
    tracing::info!("Seeded {} orthogram examples", catalog.example_count());
  }

  if count_correct_answers(&tx)? == 0 {
    for answer in &catalog.correct_answers {
      insert_correct_answer(&tx, answer.orthogram_number, &answer.word, answer.description.as_deref())?;
    }
    tracing::info!("Seeded {} correct answers", catalog.correct_answers.len());
  }

  tx.commit()
}
