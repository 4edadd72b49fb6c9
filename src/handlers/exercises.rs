//! Orthogram practice: generated exercises with smiley widgets, answer
//! checks, letter sets and the daily quiz.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::notes::student_id;
use super::{db_unavailable, json_error, DB_ERROR_HTML};
use crate::config::{
    DEFAULT_EXERCISE_COUNT, MAX_EXERCISE_COUNT, QUIZ_ORTHOGRAM, REPORT_DAYS, SIMILAR_WORDS, WEAK_ORTHOGRAMS,
};
use crate::content::advice::{
    exercise_advice, mistakes_explanation, quiz_question, weekly_report as build_weekly_report,
};
use crate::content::answers::normalize_word;
use crate::content::masks::{blank_masks, find_masks, mask_fills};
use crate::content::{check_mask, render_practice_line, MaskResult};
use crate::db::{self, try_lock, LogOnError, Orthogram, OrthogramExample};
use crate::filters;
use crate::state::AppState;

/// One rendered example line.
pub struct PracticeLine {
    pub example_id: i64,
    pub html: String,
}

/// Exercise block returned to the page (`.article-practice`).
#[derive(Template)]
#[template(path = "widgets/exercise.html")]
pub struct ExerciseTemplate {
    pub orthogram_id: String,
    pub lines: Vec<PracticeLine>,
}

#[derive(Template)]
#[template(path = "practice.html")]
pub struct PracticeTemplate {
    pub orthogram: Orthogram,
    pub exercise_html: String,
}

/// Widget on a generated exercise.
#[derive(Debug, Serialize)]
pub struct MaskInfo {
    pub mask_id: String,
    pub orth_id: String,
    pub example_id: i64,
}

/// Render up to `count` random examples of an orthogram.
fn build_exercise(
    state: &AppState,
    conn: &Connection,
    orthogram_id: &str,
    count: usize,
) -> Result<Option<(String, Vec<MaskInfo>)>, Response> {
    let examples = db::random_examples(conn, orthogram_id, count).map_err(|e| {
        tracing::error!("Failed to load examples for orthogram {}: {}", orthogram_id, e);
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load examples")
    })?;
    if examples.is_empty() {
        return Ok(None);
    }

    let mut lines = Vec::with_capacity(examples.len());
    let mut masks = Vec::new();
    for example in &examples {
        let prefix = example.id.to_string();
        let html = render_practice_line(
            &example.masked_word,
            |mask_id| state.letters_for(conn, mask_id),
            Some(&prefix),
        )
        .map_err(|e| {
            tracing::error!("Failed to render example {}: {}", example.id, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render exercise")
        })?;

        masks.extend(find_masks(&example.masked_word).iter().enumerate().map(|(i, mask)| MaskInfo {
            mask_id: format!("{}.{}", example.id, i),
            orth_id: mask.id.to_string(),
            example_id: example.id,
        }));
        lines.push(PracticeLine {
            example_id: example.id,
            html,
        });
    }

    let template = ExerciseTemplate {
        orthogram_id: orthogram_id.to_string(),
        lines,
    };
    let html = template.render().map_err(|e| {
        tracing::error!("Failed to render exercise block: {}", e);
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render exercise")
    })?;

    Ok(Some((html, masks)))
}

pub async fn practice_page(State(state): State<AppState>, Path(orthogram_id): Path<String>) -> Response {
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return Html(DB_ERROR_HTML.to_string()).into_response(),
    };

    let Some(orthogram) = db::get_orthogram(&conn, &orthogram_id).log_warn("Failed to load orthogram").flatten()
    else {
        return (StatusCode::NOT_FOUND, Html("<p>Орфограмма не найдена.</p>".to_string())).into_response();
    };

    let exercise_html = match build_exercise(&state, &conn, &orthogram_id, DEFAULT_EXERCISE_COUNT) {
        Ok(Some((html, _))) => html,
        Ok(None) => "<p>Упражнений пока нет.</p>".to_string(),
        Err(_) => "<p>Не удалось загрузить упражнение.</p>".to_string(),
    };

    let template = PracticeTemplate {
        orthogram,
        exercise_html,
    };
    Html(template.render().unwrap_or_default()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub orthogram_id: String,
    pub count: Option<usize>,
}

pub async fn generate_exercise(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let count = request
        .count
        .unwrap_or(DEFAULT_EXERCISE_COUNT)
        .clamp(1, MAX_EXERCISE_COUNT);

    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    match build_exercise(&state, &conn, request.orthogram_id.trim(), count) {
        Ok(Some((html, masks))) => {
            (StatusCode::OK, Json(serde_json::json!({ "html": html, "masks": masks }))).into_response()
        }
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            format!("No exercises for orthogram {}", request.orthogram_id),
        ),
        Err(response) => response,
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckExerciseRequest {
    /// Widget selection keyed by `data-mask-id` (`"{example}.{n}"`)
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct CheckExerciseResponse {
    pub results: Vec<MaskResult>,
    pub correct_count: usize,
    pub total: usize,
    pub advice: String,
    /// One line per wrong word, then words to remember
    pub explanation: String,
    pub similar_words: Vec<String>,
}

/// `"12.0"` -> (12, 0)
fn parse_mask_key(key: &str) -> Option<(i64, usize)> {
    let (example, index) = key.split_once('.')?;
    Some((example.trim().parse().ok()?, index.trim().parse().ok()?))
}

/// Check one widget against its example. `None` when the key or example
/// cannot be resolved.
fn check_one(
    state: &AppState,
    conn: &Connection,
    example: &OrthogramExample,
    index: usize,
    key: &str,
    selection: &str,
) -> Option<MaskResult> {
    let masks = find_masks(&example.masked_word);
    let mask = masks.get(index)?;
    let Some(fills) = mask_fills(&example.masked_word, &example.text) else {
        tracing::warn!(
            "Example {} mask does not line up with its text \"{}\"",
            example.id,
            example.text
        );
        return None;
    };
    let candidates = state.letters_for(conn, mask.id);
    Some(check_mask(key, selection, &fills[index], &candidates))
}

/// Why an example's word is spelled the way it is.
fn example_explanation(conn: &Connection, example: &OrthogramExample) -> String {
    match &example.explanation {
        Some(text) if !text.is_empty() => text.clone(),
        _ => db::get_orthogram(conn, &example.orthogram_id)
            .log_warn("Failed to load orthogram rule")
            .flatten()
            .map(|o| o.rule)
            .unwrap_or_default(),
    }
}

pub async fn check_exercise(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CheckExerciseRequest>,
) -> Response {
    if request.answers.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "No answers given");
    }

    let (jar, student) = student_id(jar);
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    // Widget order on the page: by example, then by position
    let mut ordered: BTreeMap<(i64, usize), (&String, &String)> = BTreeMap::new();
    let mut unresolved = Vec::new();
    for (key, selection) in &request.answers {
        match parse_mask_key(key) {
            Some(position) => {
                ordered.insert(position, (key, selection));
            }
            None => unresolved.push(key.clone()),
        }
    }

    let mut examples: HashMap<i64, Option<OrthogramExample>> = HashMap::new();
    let mut results = Vec::with_capacity(request.answers.len());
    let mut first_mistake: Option<String> = None;
    let mut wrong_examples: Vec<i64> = Vec::new();
    let answered_at = Utc::now();

    for ((example_id, index), (key, selection)) in ordered {
        let example = examples
            .entry(example_id)
            .or_insert_with(|| db::get_example(&conn, example_id).log_warn("Failed to load example").flatten());

        let checked = example.as_ref().and_then(|ex| {
            check_one(&state, &conn, ex, index, key, selection).map(|result| (ex, result))
        });

        match checked {
            Some((ex, result)) => {
                db::record_answer(&conn, &student, &ex.orthogram_id, Some(ex.id), result.is_correct, answered_at)
                    .log_warn_default("Failed to record answer");
                if !result.is_correct {
                    if first_mistake.is_none() {
                        first_mistake = Some(ex.orthogram_id.clone());
                    }
                    if !wrong_examples.contains(&ex.id) {
                        wrong_examples.push(ex.id);
                    }
                }
                results.push(result);
            }
            None => unresolved.push(key.clone()),
        }
    }

    // Unknown widgets count as wrong answers with nothing to show
    unresolved.sort();
    for key in unresolved {
        tracing::warn!("Cannot check unknown mask {}", key);
        if first_mistake.is_none() {
            first_mistake = Some(String::new());
        }
        results.push(MaskResult {
            mask_id: key,
            is_correct: false,
            expected: String::new(),
        });
    }

    let wrong: Vec<&OrthogramExample> = wrong_examples
        .iter()
        .filter_map(|id| examples.get(id).and_then(Option::as_ref))
        .collect();
    let mistakes: Vec<(String, String)> = wrong
        .iter()
        .map(|ex| (ex.text.clone(), example_explanation(&conn, ex)))
        .collect();
    let similar_words = wrong
        .first()
        .map(|ex| {
            db::analogous_examples(&conn, &ex.orthogram_id, &ex.text, SIMILAR_WORDS)
                .log_warn_default("Failed to load similar words")
        })
        .unwrap_or_default();

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    let response = CheckExerciseResponse {
        total: results.len(),
        correct_count,
        advice: exercise_advice(first_mistake.as_deref()),
        explanation: mistakes_explanation(&mistakes, &similar_words),
        similar_words,
        results,
    };
    (jar, Json(response)).into_response()
}

/// Last week's answers for the current student.
pub async fn weekly_report(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, student) = student_id(jar);
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    let since = Utc::now() - Duration::days(REPORT_DAYS);
    let (total, correct) = match db::answer_totals(&conn, &student, since) {
        Ok(totals) => totals,
        Err(e) => {
            tracing::error!("Failed to count answers for {}: {}", student, e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build report");
        }
    };
    let weak = if total > 0 {
        db::weak_orthograms(&conn, &student, since, WEAK_ORTHOGRAMS).log_warn_default("Failed to rank orthograms")
    } else {
        Vec::new()
    };

    (jar, Json(build_weekly_report(total, correct, weak))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CheckAnswersRequest {
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WordResult {
    pub word: String,
    pub is_correct: bool,
}

/// Check planning words against the accepted spellings.
pub async fn check_answers(
    State(state): State<AppState>,
    Json(request): Json<CheckAnswersRequest>,
) -> Response {
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    let mut results = Vec::with_capacity(request.words.len());
    for word in request.words {
        let is_correct = match db::is_correct_word(&conn, &normalize_word(&word)) {
            Ok(found) => found,
            Err(e) => return json_error(StatusCode::BAD_REQUEST, e),
        };
        results.push(WordResult { word, is_correct });
    }

    (StatusCode::OK, Json(serde_json::json!({ "results": results }))).into_response()
}

pub async fn orthogram_letters(State(state): State<AppState>, Path(orth_id): Path<String>) -> Response {
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };
    let letters = state.letters_for(&conn, &orth_id);
    (StatusCode::OK, Json(serde_json::json!({ "letters": letters }))).into_response()
}

#[derive(Debug, Serialize)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub explanation: String,
    pub orthogram_id: String,
}

pub async fn daily_quiz(State(state): State<AppState>) -> Response {
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    let example = match db::random_quiz_example(&conn, QUIZ_ORTHOGRAM) {
        Ok(Some(example)) => example,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "No quiz question available"),
        Err(e) => {
            tracing::error!("Failed to load quiz example: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load quiz");
        }
    };

    let explanation = match &example.explanation {
        Some(text) if !text.is_empty() => text.clone(),
        _ => db::get_orthogram(&conn, &example.orthogram_id)
            .log_warn("Failed to load quiz orthogram")
            .flatten()
            .map(|o| o.rule)
            .unwrap_or_default(),
    };

    let mut options = vec![QuizOption {
        text: example.text.clone(),
        is_correct: true,
    }];
    if let Some(wrong) = &example.incorrect_variant {
        options.push(QuizOption {
            text: wrong.clone(),
            is_correct: false,
        });
    }
    options.shuffle(&mut rand::rng());

    let question = QuizQuestion {
        question: quiz_question(&blank_masks(&example.masked_word)),
        options,
        explanation,
        orthogram_id: example.orthogram_id,
    };
    (StatusCode::OK, Json(question)).into_response()
}

/// Planning summary for the assistant panel.
pub async fn assistant_summary(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, student) = student_id(jar);
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    let count = db::planning_words(&conn, &student)
        .log_warn_default("Failed to load planning words")
        .len();
    let summary = format!(
        "У тебя {} слов в планинге. Выполняй упражнения, чтобы я мог отслеживать твой прогресс!",
        count
    );

    (
        jar,
        Json(serde_json::json!({ "planning_words": count, "summary": summary })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mask_key() {
        assert_eq!(parse_mask_key("12.0"), Some((12, 0)));
        assert_eq!(parse_mask_key(" 7 . 3 "), Some((7, 3)));
        assert_eq!(parse_mask_key("12"), None);
        assert_eq!(parse_mask_key("a.0"), None);
        assert_eq!(parse_mask_key("1.-1"), None);
    }
}
