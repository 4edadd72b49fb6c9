//! Exam scoring: essay score validation and primary to secondary conversion.

use serde::Serialize;

/// Highest essay score.
pub const ESSAY_MAX_SCORE: u32 = 22;

/// Highest primary score covered by the conversion scale.
pub const PRIMARY_MAX_SCORE: u32 = 50;

/// Secondary score for each primary score 0..=50.
const SECONDARY_SCALE: [u32; 51] = [
    0, 3, 5, 8, 10, 12, 15, 17, 20, 22, // 0-9
    24, 27, 29, 32, 34, 36, 37, 39, 40, 42, // 10-19
    43, 45, 46, 48, 49, 51, 52, 54, 55, 57, // 20-29
    58, 60, 61, 63, 64, 66, 67, 69, 70, 72, // 30-39
    73, 75, 78, 81, 83, 86, 89, 91, 94, 97, // 40-49
    100,
];

/// Essay score after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EssayScore {
    pub value: u32,
    /// Input was present but not a number
    pub invalid: bool,
    /// Input was outside `0..=22` and got clamped
    pub clamped: bool,
}

/// Parse the essay score the way a number field is read: leading integer,
/// anything after it ignored. Empty input is a silent zero.
pub fn parse_essay_score(raw: &str) -> EssayScore {
    let raw = raw.trim();
    if raw.is_empty() {
        return EssayScore { value: 0, invalid: false, clamped: false };
    }

    let (negative, digits) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        tracing::debug!("Essay score \"{}\" is not a number", raw);
        return EssayScore { value: 0, invalid: true, clamped: false };
    }

    if negative {
        // Any negative number clamps to zero; "-0" does not count
        let clamped = digits.bytes().any(|b| b != b'0');
        return EssayScore { value: 0, invalid: false, clamped };
    }

    // Overlong digit strings are simply above the maximum
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    if value > u64::from(ESSAY_MAX_SCORE) {
        EssayScore { value: ESSAY_MAX_SCORE, invalid: false, clamped: true }
    } else {
        EssayScore { value: value as u32, invalid: false, clamped: false }
    }
}

/// Secondary (100-point) score for a primary score.
pub fn secondary_score(primary: u32) -> u32 {
    SECONDARY_SCALE
        .get(primary as usize)
        .copied()
        .unwrap_or(100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExamScore {
    pub test_score: u32,
    pub essay: EssayScore,
    pub primary: u32,
    pub secondary: u32,
}

/// Combine the test part with the essay into primary and secondary scores.
pub fn exam_score(test_score: u32, essay_raw: Option<&str>) -> ExamScore {
    let essay = essay_raw.map(parse_essay_score).unwrap_or(EssayScore {
        value: 0,
        invalid: false,
        clamped: false,
    });
    let primary = test_score.saturating_add(essay.value);
    ExamScore {
        test_score,
        essay,
        primary,
        secondary: secondary_score(primary),
    }
}
