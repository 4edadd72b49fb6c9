//! Student planning notes: free text saved per named field.

use chrono::Utc;
use rusqlite::{params, Connection, Result};
use std::collections::BTreeMap;

/// Insert or replace the content of one field.
pub fn save_example(conn: &Connection, student: &str, field_name: &str, content: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO user_examples (student, field_name, content, updated_at) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(student, field_name) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
    params![student, field_name, content, Utc::now().to_rfc3339()],
  )?;
  Ok(())
}

/// All fields of a student, keyed by field name.
pub fn load_examples(conn: &Connection, student: &str) -> Result<BTreeMap<String, String>> {
  let mut stmt = conn.prepare("SELECT field_name, content FROM user_examples WHERE student = ?1")?;
  let rows = stmt.query_map([student], |row| {
    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
  })?;
  rows.collect()
}

/// Every non-empty line of every field, trimmed and lower-cased.
pub fn planning_words(conn: &Connection, student: &str) -> Result<Vec<String>> {
  let mut stmt =
    conn.prepare("SELECT content FROM user_examples WHERE student = ?1 ORDER BY field_name")?;
  let contents = stmt.query_map([student], |row| row.get::<_, String>(0))?;

  let mut words = Vec::new();
  for content in contents {
    words.extend(
      content?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase),
    );
  }
  Ok(words)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_save_is_upsert() {
    let env = TestEnv::new().unwrap();
    save_example(&env.conn, "abc", "user-input-orf-1", "вода").unwrap();
    save_example(&env.conn, "abc", "user-input-orf-1", "вода\nгора").unwrap();
    save_example(&env.conn, "abc", "user-input-orf-2", "лес").unwrap();
    save_example(&env.conn, "other", "user-input-orf-1", "чужое").unwrap();

    let examples = load_examples(&env.conn, "abc").unwrap();
    assert_eq!(examples.len(), 2);
    assert_eq!(examples["user-input-orf-1"], "вода\nгора");
    assert_eq!(examples["user-input-orf-2"], "лес");
  }

  #[test]
  fn test_load_unknown_student_is_empty() {
    let env = TestEnv::new().unwrap();
    assert!(load_examples(&env.conn, "nobody").unwrap().is_empty());
  }

  #[test]
  fn test_planning_words() {
    let env = TestEnv::new().unwrap();
    save_example(&env.conn, "abc", "a", "  Вода \n\n гора\r\n").unwrap();
    save_example(&env.conn, "abc", "b", "ЛЕС").unwrap();
    assert_eq!(planning_words(&env.conn, "abc").unwrap(), vec!["вода", "гора", "лес"]);
  }
}
