//! Drill content: orthogram catalog, exercise masks, letter sets, answer
//! checking and exam scoring.
//!
//! Content files live under `content/` (see [`crate::paths`]). The catalog is
//! seeded into SQLite on start-up; the letter table is kept in memory.

pub mod advice;
pub mod answers;
pub mod letters;
pub mod masks;
pub mod scoring;

pub use answers::{canonical_selection, check_mask, MaskResult};
pub use letters::{ExerciseId, LetterTable};
pub use masks::{find_masks, mask_fills, render_practice_line, Mask};

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Error loading a content file.
#[derive(Debug)]
pub enum ContentLoadError {
    IoError(String),
    ParseError(String),
    InvalidContent(String),
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentLoadError::IoError(e) => write!(f, "IO error: {}", e),
            ContentLoadError::ParseError(e) => write!(f, "Parse error: {}", e),
            ContentLoadError::InvalidContent(e) => write!(f, "Invalid content: {}", e),
        }
    }
}

impl std::error::Error for ContentLoadError {}

/// Read a whole content file, tagging errors with its path.
pub(crate) fn read_content(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError::IoError(format!("{}: {}", path.display(), e)))
}

/// Load and validate the dartboard layout.
pub fn load_board(path: &Path) -> Result<target_game::BoardConfig, ContentLoadError> {
    let json = read_content(path)?;
    target_game::BoardConfig::from_json(&json)
        .map_err(|e| ContentLoadError::InvalidContent(format!("{}: {}", path.display(), e)))
}

// ============================================================================
// Orthogram catalog (`content/orthograms.json`)
// ============================================================================

/// One example sentence or word for an orthogram.
#[derive(Debug, Clone, Deserialize)]
pub struct ExampleDef {
    /// Correctly spelled text
    pub text: String,
    /// Same text with the tested letters replaced by `*ID*` masks
    pub masked: String,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Misspelled variant offered as the wrong quiz option
    #[serde(default)]
    pub incorrect_variant: Option<String>,
    #[serde(default)]
    pub quiz: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrthogramDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rule: String,
    /// Widget candidates; the database default applies when absent
    #[serde(default)]
    pub letters: Option<Vec<String>>,
    #[serde(default)]
    pub examples: Vec<ExampleDef>,
}

/// Accepted spelling for the planning word check.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrectAnswerDef {
    pub orthogram_number: i64,
    pub word: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub orthograms: Vec<OrthogramDef>,
    #[serde(default)]
    pub correct_answers: Vec<CorrectAnswerDef>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, ContentLoadError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| ContentLoadError::ParseError(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, ContentLoadError> {
        let json = read_content(path)?;
        Self::from_json(&json).map_err(|e| match e {
            ContentLoadError::ParseError(msg) => {
                ContentLoadError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Every example must carry at least one mask, and ids must be unique.
    fn validate(&self) -> Result<(), ContentLoadError> {
        let mut seen = std::collections::HashSet::new();
        for orthogram in &self.orthograms {
            if !seen.insert(orthogram.id.as_str()) {
                return Err(ContentLoadError::InvalidContent(format!(
                    "duplicate orthogram id {}",
                    orthogram.id
                )));
            }
            for example in &orthogram.examples {
                if find_masks(&example.masked).is_empty() {
                    return Err(ContentLoadError::InvalidContent(format!(
                        "example \"{}\" of orthogram {} has no mask",
                        example.text, orthogram.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn example_count(&self) -> usize {
        self.orthograms.iter().map(|o| o.examples.len()).sum()
    }
}
