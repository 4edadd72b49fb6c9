//! Exercise masks.
//!
//! Example text marks each tested spot with `*ID*`, where `ID` names the
//! orthogram or task position that decides the candidate letters, e.g.
//! `в течени*661* часа` or `пр*9-4*красный`. On the page every mask becomes a
//! smiley widget the student clicks to pick a letter.

use askama::Template;
use unicode_normalization::UnicodeNormalization;

/// One `*ID*` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mask<'a> {
    pub id: &'a str,
    /// Byte offset of the opening `*`
    pub start: usize,
    /// Byte offset just past the closing `*`
    pub end: usize,
}

/// Masks in order of appearance. An unmatched `*` is plain text.
pub fn find_masks(text: &str) -> Vec<Mask<'_>> {
    let mut masks = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('*') {
        let start = pos + offset;
        let Some(len) = text[start + 1..].find('*') else {
            break;
        };
        if len == 0 {
            // "**": the first star is literal, the second may open a mask
            pos = start + 1;
            continue;
        }
        let end = start + 1 + len + 1;
        masks.push(Mask {
            id: &text[start + 1..start + 1 + len],
            start,
            end,
        });
        pos = end;
    }

    masks
}

/// Literal text around the masks: always `masks.len() + 1` pieces.
fn literals<'a>(text: &'a str, masks: &[Mask<'a>]) -> Vec<&'a str> {
    let mut pieces = Vec::with_capacity(masks.len() + 1);
    let mut pos = 0;
    for mask in masks {
        pieces.push(&text[pos..mask.start]);
        pos = mask.end;
    }
    pieces.push(&text[pos..]);
    pieces
}

fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// What each mask of `masked` stands for in the correctly spelled `answer`.
///
/// Comparison is case-insensitive on NFC-normalised text. Returns `None` when
/// the literal parts of `masked` do not line up with `answer`, or when two
/// masks touch and the split between them is ambiguous.
pub fn mask_fills(masked: &str, answer: &str) -> Option<Vec<String>> {
    let masked = normalize(masked);
    let answer = normalize(answer);
    let masks = find_masks(&masked);
    if masks.is_empty() {
        return None;
    }
    let pieces = literals(&masked, &masks);

    let first = pieces[0];
    let last = pieces[pieces.len() - 1];
    if answer.len() < first.len() + last.len()
        || !answer.starts_with(first)
        || !answer.ends_with(last)
    {
        return None;
    }

    let body = &answer[first.len()..answer.len() - last.len()];
    let mut fills = Vec::with_capacity(masks.len());
    let mut rest = body;
    for literal in &pieces[1..pieces.len() - 1] {
        if literal.is_empty() {
            return None;
        }
        let at = rest.find(literal)?;
        fills.push(rest[..at].to_string());
        rest = &rest[at + literal.len()..];
    }
    fills.push(rest.to_string());

    Some(fills)
}

/// Fill of a single-mask example.
pub fn correct_fill(masked: &str, answer: &str) -> Option<String> {
    let mut fills = mask_fills(masked, answer)?;
    if fills.len() == 1 { fills.pop() } else { None }
}

/// Clickable letter picker for one mask.
#[derive(Template)]
#[template(path = "widgets/smiley.html")]
pub struct SmileyTemplate<'a> {
    pub orth_id: &'a str,
    /// Key the check request uses for this mask, e.g. `"12.0"`
    pub mask_key: Option<String>,
    pub letters: Vec<String>,
}

/// Render one practice line: text is HTML-escaped and every mask becomes a
/// smiley widget with the candidates returned by `candidates`.
///
/// With `key_prefix` set, the n-th widget is tagged `data-mask-id="{prefix}.{n}"`.
pub fn render_practice_line(
    text: &str,
    mut candidates: impl FnMut(&str) -> Vec<String>,
    key_prefix: Option<&str>,
) -> Result<String, askama::Error> {
    let masks = find_masks(text);
    let pieces = literals(text, &masks);

    let mut html = String::with_capacity(text.len() * 2);
    for (index, mask) in masks.iter().enumerate() {
        html.push_str(&html_escape::encode_text(pieces[index]));
        let widget = SmileyTemplate {
            orth_id: mask.id,
            mask_key: key_prefix.map(|prefix| format!("{}.{}", prefix, index)),
            letters: candidates(mask.id),
        };
        html.push_str(&widget.render()?);
    }
    html.push_str(&html_escape::encode_text(pieces[pieces.len() - 1]));

    Ok(html)
}

/// Replace every mask with the smiley placeholder, for plain-text questions.
pub fn blank_masks(text: &str) -> String {
    let masks = find_masks(text);
    let pieces = literals(text, &masks);
    pieces.join("😊")
}
