//! Test utilities for database setup.
//!
//! Reuses the production migrations so tests never carry their own copy of
//! the schema.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::db::{self, DbPool};

/// Temporary directory holding a migrated `orfo.db`.
pub struct TestEnv {
    /// Kept alive so the database file outlives the test body
    pub temp: TempDir,
    /// Connection with the full schema and no seeded content
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("orfo.db"))?;
        db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("orfo.db")
    }

    /// Second, pooled connection to the same database file.
    pub fn pool(&self) -> rusqlite::Result<DbPool> {
        db::init_db(&self.db_path())
    }
}
