//! Candidate letters for exercise widgets.
//!
//! Every mask id maps to the set of letters (or punctuation choices) the
//! student picks from. All rules live in one [`LetterTable`], loaded from
//! `content/letters.json`, with built-in fallbacks for every exam task.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{read_content, ContentLoadError};

/// Generic vowel set used when nothing more specific is known.
pub const DEFAULT_LETTERS: [&str; 5] = ["а", "о", "е", "и", "я"];

/// Stored in `orthograms.letters` when the catalog gives no set.
pub const DEFAULT_LETTERS_CSV: &str = "а,о,е,и,я";

/// Exam tasks whose masks are `{task}-{n}` with per-position subgroups.
const GROUPED_TASKS: [u8; 5] = [11, 12, 13, 14, 15];

/// Punctuation tasks: every mask is "comma" or "no comma".
const PUNCTUATION_TASKS: [&str; 5] = ["16", "17", "18", "19", "20"];

/// Parsed mask id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseId {
    /// `9-N`: position N of task 9, three positions per group
    Task9 { position: usize },
    /// `10_B-N`: task 10 position drawn from orthogram `B`
    Task10 { key: String, base: String },
    /// `11-N` .. `15-N`
    Grouped { task: u8, key: String },
    /// Anything starting with 16..20
    Punctuation,
    /// `21-N`
    Task21,
    /// Plain orthogram id, optionally with a `-N` suffix
    Orthogram { base: String },
}

impl ExerciseId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some(rest) = raw.strip_prefix("9-") {
            // Unparseable positions fall into the first group
            let position = rest.parse().unwrap_or(0);
            return ExerciseId::Task9 { position };
        }

        if let Some(rest) = raw.strip_prefix("10_") {
            let base = rest.split('-').next().unwrap_or_default().to_string();
            return ExerciseId::Task10 {
                key: raw.to_string(),
                base,
            };
        }

        for task in GROUPED_TASKS {
            if raw.starts_with(&format!("{}-", task)) {
                return ExerciseId::Grouped {
                    task,
                    key: raw.to_string(),
                };
            }
        }

        if PUNCTUATION_TASKS.iter().any(|prefix| raw.starts_with(prefix)) {
            return ExerciseId::Punctuation;
        }

        if raw.starts_with("21-") {
            return ExerciseId::Task21;
        }

        let base = raw.split('-').next().unwrap_or(raw).to_string();
        ExerciseId::Orthogram { base }
    }

    /// Group index for a task 9 position (1-based, three per group).
    fn task9_group(position: usize) -> usize {
        position.saturating_sub(1) / 3
    }
}

/// Mask id to subgroup key, and subgroup key to letters, for one task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskGroups {
    #[serde(default)]
    pub groups: HashMap<String, String>,
    #[serde(default)]
    pub letters: HashMap<String, Vec<String>>,
    /// Used when the mask has no subgroup
    #[serde(default)]
    pub fallback: Option<Vec<String>>,
}

impl TaskGroups {
    fn subgroup(&self, key: &str) -> Option<&Vec<String>> {
        self.groups.get(key).and_then(|group| self.letters.get(group))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_vowels() -> Vec<String> {
    strings(&DEFAULT_LETTERS)
}

fn default_task9_groups() -> Vec<Vec<String>> {
    vec![
        strings(&["о", "а", "е", "и", "я", "у", "ю"]),
        strings(&["о", "а"]),
        strings(&["е", "и", "я"]),
        strings(&["ё", "о"]),
        strings(&["и", "ы"]),
    ]
}

fn default_task10_fallback() -> HashMap<String, Vec<String>> {
    [
        ("10", vec!["с", "з", "д", "т", "а", "о"]),
        ("11", vec!["з", "с"]),
        ("28", vec!["и", "ы"]),
        ("29", vec!["е", "и"]),
        ("6", vec!["ъ", "ь", "/"]),
    ]
    .into_iter()
    .map(|(base, letters)| (base.to_string(), strings(&letters)))
    .collect()
}

/// Built-in letters per grouped task, used when the table has none.
fn task_fallback(task: u8) -> Vec<String> {
    match task {
        11 => strings(&["е", "и", "я", "а", "о", "ё", "ы", "ч", "щ", "к", "ск"]),
        12 => strings(&["е", "у", "ю", "и", "а", "я", "ё", "о", "ы", "ч", "щ", "к", "ск"]),
        13 => strings(&["|", "/"]),
        14 => strings(&["|", "/", "-"]),
        15 => strings(&["н", "нн"]),
        _ => default_vowels(),
    }
}

fn default_punctuation() -> Vec<String> {
    strings(&[",", "х"])
}

fn default_punktum_21() -> Vec<String> {
    strings(&["5", "8", "9.1", "9.2", "10", "13", "16", "18", "19"])
}

/// Consolidated letter-set table.
#[derive(Debug, Clone, Deserialize)]
pub struct LetterTable {
    #[serde(default = "default_vowels")]
    pub vowels: Vec<String>,
    #[serde(default = "default_task9_groups")]
    pub task9_groups: Vec<Vec<String>>,
    /// Task 10 subgroups (mask id `10_B-N`)
    #[serde(default)]
    pub task10: TaskGroups,
    /// Task 10 fallback by base orthogram
    #[serde(default = "default_task10_fallback")]
    pub task10_fallback: HashMap<String, Vec<String>>,
    /// Tasks 11-15 keyed by task number
    #[serde(default)]
    pub tasks: HashMap<String, TaskGroups>,
    #[serde(default = "default_punctuation")]
    pub punctuation: Vec<String>,
    #[serde(default = "default_punktum_21")]
    pub punktum_21: Vec<String>,
    /// Per-orthogram overrides, checked before the database
    #[serde(default)]
    pub orthograms: HashMap<String, Vec<String>>,
}

impl Default for LetterTable {
    fn default() -> Self {
        Self {
            vowels: default_vowels(),
            task9_groups: default_task9_groups(),
            task10: TaskGroups::default(),
            task10_fallback: default_task10_fallback(),
            tasks: HashMap::new(),
            punctuation: default_punctuation(),
            punktum_21: default_punktum_21(),
            orthograms: HashMap::new(),
        }
    }
}

impl LetterTable {
    pub fn from_json(json: &str) -> Result<Self, ContentLoadError> {
        let table: LetterTable =
            serde_json::from_str(json).map_err(|e| ContentLoadError::ParseError(e.to_string()))?;
        if table.vowels.is_empty() || table.task9_groups.is_empty() {
            return Err(ContentLoadError::InvalidContent(
                "vowels and task9_groups must not be empty".to_string(),
            ));
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, ContentLoadError> {
        let json = read_content(path)?;
        Self::from_json(&json)
    }

    /// Letters for `id` that the table alone can decide.
    ///
    /// `None` means the id is a plain orthogram with no override, so the
    /// caller should consult the database.
    pub fn lookup(&self, id: &ExerciseId) -> Option<Vec<String>> {
        match id {
            ExerciseId::Task9 { position } => {
                let group = ExerciseId::task9_group(*position);
                let letters = self
                    .task9_groups
                    .get(group)
                    .unwrap_or(&self.task9_groups[0]);
                Some(letters.clone())
            }
            ExerciseId::Task10 { key, base } => Some(
                self.task10
                    .subgroup(key)
                    .or_else(|| self.task10_fallback.get(base))
                    .cloned()
                    .unwrap_or_else(|| self.vowels.clone()),
            ),
            ExerciseId::Grouped { task, key } => {
                let groups = self.tasks.get(&task.to_string());
                if let Some(letters) = groups.and_then(|g| g.subgroup(key)) {
                    return Some(letters.clone());
                }
                tracing::debug!("No subgroup for mask {}, using the full task {} set", key, task);
                Some(
                    groups
                        .and_then(|g| g.fallback.clone())
                        .unwrap_or_else(|| task_fallback(*task)),
                )
            }
            ExerciseId::Punctuation => Some(self.punctuation.clone()),
            ExerciseId::Task21 => Some(self.punktum_21.clone()),
            ExerciseId::Orthogram { base } => self.orthograms.get(base).cloned(),
        }
    }

    /// Letters for a raw mask id, asking `stored` for orthograms the table
    /// does not cover. Falls back to the generic vowels.
    pub fn resolve(&self, raw: &str, stored: impl FnOnce(&str) -> Option<Vec<String>>) -> Vec<String> {
        let id = ExerciseId::parse(raw);
        if let Some(letters) = self.lookup(&id) {
            return letters;
        }
        let ExerciseId::Orthogram { base } = &id else {
            return self.vowels.clone();
        };
        stored(base)
            .filter(|letters| !letters.is_empty())
            .unwrap_or_else(|| self.vowels.clone())
    }
}

/// Split a stored comma-separated letter list.
pub fn parse_letters_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
