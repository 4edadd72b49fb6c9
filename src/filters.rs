//! Askama template filters

use crate::content::masks::find_masks;

// Compile-time asset hashes written by build.rs
include!(concat!(env!("OUT_DIR"), "/asset_hashes.rs"));

/// Append cache-busting hash to static asset URLs.
///
/// Usage in templates:
/// ```html
/// <link rel="stylesheet" href="{{ "/static/css/styles.css"|asset_url }}">
/// ```
#[askama::filter_fn]
pub fn asset_url(path: impl std::fmt::Display, _: &dyn askama::Values) -> askama::Result<String> {
    Ok(versioned(&path.to_string()))
}

fn versioned(path: &str) -> String {
    match path {
        "/static/css/styles.css" => format!("{}?v={}", path, STYLES_CSS_HASH),
        _ => path.to_string(),
    }
}

/// Escape `text` and turn `*word*` into `<strong>word</strong>`.
///
/// The result is HTML; pipe it through `safe`:
/// `{{ orthogram.rule|bold_words|safe }}`
#[askama::filter_fn]
pub fn bold_words(text: impl std::fmt::Display, _: &dyn askama::Values) -> askama::Result<String> {
    Ok(emphasize(&text.to_string()))
}

fn emphasize(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 16);
    let mut pos = 0;
    for mark in find_masks(text) {
        html.push_str(&html_escape::encode_text(&text[pos..mark.start]));
        html.push_str("<strong>");
        html.push_str(&html_escape::encode_text(mark.id));
        html.push_str("</strong>");
        pos = mark.end;
    }
    html.push_str(&html_escape::encode_text(&text[pos..]));
    html
}
