//! Checked exercise answers and the weekly progress they add up to.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

/// Fixed-width UTC timestamp so stored values compare as text.
fn timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Orthogram the student got wrong most often in a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakOrthogram {
  pub orthogram_id: String,
  pub name: String,
  pub errors: i64,
}

/// Store one checked widget.
pub fn record_answer(
  conn: &Connection,
  student: &str,
  orthogram_id: &str,
  example_id: Option<i64>,
  is_correct: bool,
  at: DateTime<Utc>,
) -> Result<()> {
  conn.execute(
    "INSERT INTO student_answers (student, orthogram_id, example_id, is_correct, answered_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![student, orthogram_id, example_id, is_correct, timestamp(at)],
  )?;
  Ok(())
}

/// (total, correct) answers since `since`.
pub fn answer_totals(conn: &Connection, student: &str, since: DateTime<Utc>) -> Result<(i64, i64)> {
  conn.query_row(
    "SELECT COUNT(*), COALESCE(SUM(is_correct), 0) FROM student_answers
     WHERE student = ?1 AND answered_at >= ?2",
    params![student, timestamp(since)],
    |row| Ok((row.get(0)?, row.get(1)?)),
  )
}

/// Orthograms with the most wrong answers since `since`, worst first.
pub fn weak_orthograms(
  conn: &Connection,
  student: &str,
  since: DateTime<Utc>,
  limit: usize,
) -> Result<Vec<WeakOrthogram>> {
  let mut stmt = conn.prepare(
    "SELECT a.orthogram_id, COALESCE(o.name, a.orthogram_id), COUNT(*) AS errors
     FROM student_answers a
     LEFT JOIN orthograms o ON o.id = a.orthogram_id
     WHERE a.student = ?1 AND a.answered_at >= ?2 AND a.is_correct = 0
     GROUP BY a.orthogram_id
     ORDER BY errors DESC, a.orthogram_id
     LIMIT ?3",
  )?;
  let rows = stmt.query_map(params![student, timestamp(since), limit as i64], |row| {
    Ok(WeakOrthogram {
      orthogram_id: row.get(0)?,
      name: row.get(1)?,
      errors: row.get(2)?,
    })
  })?;
  rows.collect()
}
