//! Orthogram rules and their example lines.

use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use crate::content::letters::{parse_letters_csv, DEFAULT_LETTERS_CSV};
use crate::content::{OrthogramDef, ExampleDef};

#[derive(Debug, Clone, PartialEq)]
pub struct Orthogram {
  pub id: String,
  pub name: String,
  pub rule: String,
  pub letters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrthogramExample {
  pub id: i64,
  pub orthogram_id: String,
  pub text: String,
  pub masked_word: String,
  pub explanation: Option<String>,
  pub incorrect_variant: Option<String>,
  pub is_for_quiz: bool,
}

const EXAMPLE_COLUMNS: &str =
  "id, orthogram_id, text, masked_word, explanation, incorrect_variant, is_for_quiz";

fn example_from_row(row: &Row) -> Result<OrthogramExample> {
  Ok(OrthogramExample {
    id: row.get(0)?,
    orthogram_id: row.get(1)?,
    text: row.get(2)?,
    masked_word: row.get(3)?,
    explanation: row.get(4)?,
    incorrect_variant: row.get(5)?,
    is_for_quiz: row.get(6)?,
  })
}

pub fn insert_orthogram(conn: &Connection, def: &OrthogramDef) -> Result<()> {
  let letters = def
    .letters
    .as_ref()
    .map(|l| l.join(","))
    .unwrap_or_else(|| DEFAULT_LETTERS_CSV.to_string());
  conn.execute(
    "INSERT INTO orthograms (id, name, rule, letters) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET name = excluded.name, rule = excluded.rule, letters = excluded.letters",
    params![def.id, def.name, def.rule, letters],
  )?;
  Ok(())
}

pub fn insert_example(conn: &Connection, orthogram_id: &str, def: &ExampleDef) -> Result<i64> {
  conn.execute(
    "INSERT INTO orthogram_examples
       (orthogram_id, text, masked_word, explanation, incorrect_variant, is_for_quiz)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      orthogram_id,
      def.text,
      def.masked,
      def.explanation,
      def.incorrect_variant,
      def.quiz
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn count_examples(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM orthogram_examples", [], |row| row.get(0))
}

pub fn get_orthogram(conn: &Connection, id: &str) -> Result<Option<Orthogram>> {
  conn
    .query_row(
      "SELECT id, name, rule, letters FROM orthograms WHERE id = ?1",
      [id],
      |row| {
        let letters: String = row.get(3)?;
        Ok(Orthogram {
          id: row.get(0)?,
          name: row.get(1)?,
          rule: row.get(2)?,
          letters: parse_letters_csv(&letters),
        })
      },
    )
    .optional()
}

pub fn list_orthograms(conn: &Connection) -> Result<Vec<Orthogram>> {
  let mut stmt = conn.prepare("SELECT id, name, rule, letters FROM orthograms ORDER BY CAST(id AS INTEGER), id")?;
  let rows = stmt.query_map([], |row| {
    let letters: String = row.get(3)?;
    Ok(Orthogram {
      id: row.get(0)?,
      name: row.get(1)?,
      rule: row.get(2)?,
      letters: parse_letters_csv(&letters),
    })
  })?;
  rows.collect()
}

/// Letters stored for an orthogram, `None` if it is unknown.
pub fn orthogram_letters(conn: &Connection, id: &str) -> Result<Option<Vec<String>>> {
  Ok(get_orthogram(conn, id)?.map(|o| o.letters))
}

/// Up to `limit` random active examples of one orthogram.
pub fn random_examples(conn: &Connection, orthogram_id: &str, limit: usize) -> Result<Vec<OrthogramExample>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {} FROM orthogram_examples
     WHERE orthogram_id = ?1 AND is_active = 1
     ORDER BY RANDOM() LIMIT ?2",
    EXAMPLE_COLUMNS
  ))?;
  let rows = stmt.query_map(params![orthogram_id, limit as i64], example_from_row)?;
  rows.collect()
}

pub fn get_example(conn: &Connection, id: i64) -> Result<Option<OrthogramExample>> {
  conn
    .query_row(
      &format!("SELECT {} FROM orthogram_examples WHERE id = ?1", EXAMPLE_COLUMNS),
      [id],
      example_from_row,
    )
    .optional()
}

/// Other active example texts of an orthogram, skipping `exclude` in any case.
pub fn analogous_examples(conn: &Connection, orthogram_id: &str, exclude: &str, limit: usize) -> Result<Vec<String>> {
  let exclude = exclude.to_lowercase();
  let mut stmt = conn.prepare(
    "SELECT text FROM orthogram_examples
     WHERE orthogram_id = ?1 AND is_active = 1
     ORDER BY id",
  )?;
  let texts = stmt
    .query_map([orthogram_id], |row| row.get::<_, String>(0))?
    .collect::<Result<Vec<_>>>()?;
  Ok(
    texts
      .into_iter()
      .filter(|t| t.to_lowercase() != exclude)
      .take(limit)
      .collect(),
  )
}

/// A random active quiz example of the given orthogram.
pub fn random_quiz_example(conn: &Connection, orthogram_id: &str) -> Result<Option<OrthogramExample>> {
  conn
    .query_row(
      &format!(
        "SELECT {} FROM orthogram_examples
         WHERE orthogram_id = ?1 AND is_for_quiz = 1 AND is_active = 1
           AND incorrect_variant IS NOT NULL
         ORDER BY RANDOM() LIMIT 1",
        EXAMPLE_COLUMNS
      ),
      [orthogram_id],
      example_from_row,
    )
    .optional()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  fn example(text: &str, masked: &str, quiz: bool) -> ExampleDef {
    ExampleDef {
      text: text.to_string(),
      masked: masked.to_string(),
      explanation: None,
      incorrect_variant: quiz.then(|| format!("{}!", text)),
      quiz,
    }
  }

  fn orthogram(id: &str, letters: Option<Vec<&str>>) -> OrthogramDef {
    OrthogramDef {
      id: id.to_string(),
      name: format!("Орфограмма {}", id),
      rule: String::new(),
      letters: letters.map(|l| l.into_iter().map(String::from).collect()),
      examples: Vec::new(),
    }
  }

  #[test]
  fn test_orthogram_letters_default_and_custom() {
    let env = TestEnv::new().unwrap();
    insert_orthogram(&env.conn, &orthogram("2", None)).unwrap();
    insert_orthogram(&env.conn, &orthogram("1500", Some(vec!["н", "нн"]))).unwrap();

    assert_eq!(
      orthogram_letters(&env.conn, "2").unwrap(),
      Some(vec!["а".to_string(), "о".to_string(), "е".to_string(), "и".to_string(), "я".to_string()])
    );
    assert_eq!(
      orthogram_letters(&env.conn, "1500").unwrap(),
      Some(vec!["н".to_string(), "нн".to_string()])
    );
    assert_eq!(orthogram_letters(&env.conn, "404").unwrap(), None);
  }

  #[test]
  fn test_list_orders_numerically() {
    let env = TestEnv::new().unwrap();
    for id in ["661", "2", "15"] {
      insert_orthogram(&env.conn, &orthogram(id, None)).unwrap();
    }
    let ids: Vec<String> = list_orthograms(&env.conn).unwrap().into_iter().map(|o| o.id).collect();
    assert_eq!(ids, vec!["2", "15", "661"]);
  }

  #[test]
  fn test_random_examples_limit_and_filter() {
    let env = TestEnv::new().unwrap();
    insert_orthogram(&env.conn, &orthogram("2", None)).unwrap();
    insert_orthogram(&env.conn, &orthogram("3", None)).unwrap();
    for word in ["вода", "гора", "сова"] {
      insert_example(&env.conn, "2", &example(word, "в*2*да", false)).unwrap();
    }
    let hidden = insert_example(&env.conn, "2", &example("трава", "тр*2*ва", false)).unwrap();
    env
      .conn
      .execute("UPDATE orthogram_examples SET is_active = 0 WHERE id = ?1", [hidden])
      .unwrap();
    insert_example(&env.conn, "3", &example("лес", "л*3*с", false)).unwrap();

    assert_eq!(random_examples(&env.conn, "2", 2).unwrap().len(), 2);
    let all = random_examples(&env.conn, "2", 10).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|e| e.orthogram_id == "2" && e.text != "трава"));
    assert_eq!(count_examples(&env.conn).unwrap(), 5);
  }

  #[test]
  fn test_quiz_example() {
    let env = TestEnv::new().unwrap();
    insert_orthogram(&env.conn, &orthogram("661", None)).unwrap();
    assert_eq!(random_quiz_example(&env.conn, "661").unwrap(), None);

    insert_example(&env.conn, "661", &example("в течение", "в течени*661*", false)).unwrap();
    assert_eq!(random_quiz_example(&env.conn, "661").unwrap(), None);

    let id = insert_example(&env.conn, "661", &example("в течение", "в течени*661*", true)).unwrap();
    let quiz = random_quiz_example(&env.conn, "661").unwrap().unwrap();
    assert_eq!(quiz.id, id);
    assert_eq!(get_example(&env.conn, id).unwrap(), Some(quiz));
  }

  #[test]
  fn test_analogous_examples_skip_the_word() {
    let env = TestEnv::new().unwrap();
    insert_orthogram(&env.conn, &orthogram("1500", None)).unwrap();
    for word in ["Деревянный дом", "оловянный", "стеклянный", "серебряный", "кожаный"] {
      insert_example(&env.conn, "1500", &example(word, word, false)).unwrap();
    }
    let similar = analogous_examples(&env.conn, "1500", "деревянный ДОМ", 3).unwrap();
    assert_eq!(similar, vec!["оловянный", "стеклянный", "серебряный"]);
    assert!(analogous_examples(&env.conn, "404", "x", 3).unwrap().is_empty());
  }
}
