//! Answer normalisation and checking for smiley widgets.
//!
//! Widgets show human-friendly choices while stored answers use a compact
//! form: a comma is `!`, "no comma" (`х`) is `?` and "written together"
//! (`|`) is `\`. Both sides are mapped to that form before comparing.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// Icon of a widget nobody clicked.
pub const UNSELECTED: &str = "😊";

/// Map a widget selection to the stored answer form.
///
/// An untouched widget yields an empty answer, which never matches.
pub fn canonical_selection(selection: &str) -> String {
    let selection = selection.trim();
    match selection {
        "" | UNSELECTED => String::new(),
        "," => "!".to_string(),
        "х" | "Х" => "?".to_string(),
        "|" => "\\".to_string(),
        other => other.nfc().collect::<String>().to_lowercase(),
    }
}

/// Map the text a mask covers in the correct spelling to the stored answer
/// form, using the widget's candidates to tell what an empty gap means.
pub fn canonical_fill(fill: &str, candidates: &[String]) -> String {
    let offers = |choice: &str| candidates.iter().any(|c| c == choice);
    match fill {
        "," => "!".to_string(),
        "" if offers("х") => "?".to_string(),
        "" if offers("|") => "\\".to_string(),
        "" if offers("/") => "/".to_string(),
        " " if offers("/") => "/".to_string(),
        other => other.to_string(),
    }
}

/// Result for one mask.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskResult {
    pub mask_id: String,
    pub is_correct: bool,
    /// Expected choice as shown on the widget
    pub expected: String,
}

/// Widget label for a stored answer, the inverse of [`canonical_selection`].
pub fn display_choice(canonical: &str) -> String {
    match canonical {
        "!" => ",".to_string(),
        "?" => "х".to_string(),
        "\\" => "|".to_string(),
        other => other.to_string(),
    }
}

/// Compare a selection against the fill of one mask.
pub fn check_mask(mask_id: &str, selection: &str, fill: &str, candidates: &[String]) -> MaskResult {
    let expected = canonical_fill(fill, candidates);
    let given = canonical_selection(selection);
    MaskResult {
        mask_id: mask_id.to_string(),
        is_correct: !given.is_empty() && given == expected,
        expected: display_choice(&expected),
    }
}

/// Normalise a word the student wrote for the planning word check.
pub fn normalize_word(word: &str) -> String {
    word.trim().nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_selection() {
        assert_eq!(canonical_selection(","), "!");
        assert_eq!(canonical_selection("х"), "?");
        assert_eq!(canonical_selection("|"), "\\");
        assert_eq!(canonical_selection("😊"), "");
        assert_eq!(canonical_selection(" О "), "о");
        assert_eq!(canonical_selection("нн"), "нн");
    }

    #[test]
    fn test_letter_mask() {
        let vowels = set(&["а", "о"]);
        assert!(check_mask("1.0", "о", "о", &vowels).is_correct);
        let wrong = check_mask("1.0", "а", "о", &vowels);
        assert!(!wrong.is_correct);
        assert_eq!(wrong.expected, "о");
    }

    #[test]
    fn test_unselected_is_incorrect() {
        let punct = set(&[",", "х"]);
        // Even where the right answer is "no comma"
        assert!(!check_mask("1.0", "😊", "", &punct).is_correct);
        assert!(!check_mask("1.0", "", "", &set(&["а"])).is_correct);
    }

    #[test]
    fn test_punctuation_mask() {
        let punct = set(&[",", "х"]);
        assert!(check_mask("1.0", ",", ",", &punct).is_correct);
        assert!(check_mask("1.0", "х", "", &punct).is_correct);
        let missed = check_mask("1.0", "х", ",", &punct);
        assert!(!missed.is_correct);
        assert_eq!(missed.expected, ",");
    }

    #[test]
    fn test_together_apart_hyphen() {
        let choices = set(&["|", "/", "-"]);
        assert!(check_mask("1.0", "|", "", &choices).is_correct);
        assert!(check_mask("1.0", "/", " ", &choices).is_correct);
        assert!(check_mask("1.0", "-", "-", &choices).is_correct);
        let wrong = check_mask("1.0", "/", "", &choices);
        assert!(!wrong.is_correct);
        assert_eq!(wrong.expected, "|");
    }

    #[test]
    fn test_missing_sign_is_slash() {
        let signs = set(&["ъ", "ь", "/"]);
        assert!(check_mask("1.0", "/", "", &signs).is_correct);
        assert!(check_mask("1.0", "ъ", "ъ", &signs).is_correct);
        assert!(!check_mask("1.0", "ь", "", &signs).is_correct);
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  вокзал \n"), "вокзал");
        assert_eq!(normalize_word("и\u{0306}од"), "йод");
    }
}
