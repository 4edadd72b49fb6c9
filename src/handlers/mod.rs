pub mod diagnostic;
pub mod exercises;
pub mod game;
pub mod notes;

use askama::Template;
use axum::{
  extract::State,
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  Json,
};

use crate::db::{self, try_lock, LogOnError, Orthogram};
use crate::filters;
use crate::state::AppState;

/// Shown in place of a page when the database cannot be reached
pub const DB_ERROR_HTML: &str = "<p>База данных недоступна. Попробуйте позже.</p>";

/// JSON error body with the given status
pub(crate) fn json_error(status: StatusCode, message: impl std::fmt::Display) -> Response {
  (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

pub(crate) fn db_unavailable() -> Response {
  json_error(StatusCode::SERVICE_UNAVAILABLE, db::DbLockError)
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub orthograms: Vec<Orthogram>,
  pub segment_count: usize,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
  let conn = match try_lock(&state.db) {
    Ok(conn) => conn,
    Err(_) => return Html(DB_ERROR_HTML.to_string()),
  };

  let template = IndexTemplate {
    orthograms: db::list_orthograms(&conn).log_warn_default("Failed to list orthograms"),
    segment_count: state.board.segments.len(),
  };

  Html(template.render().unwrap_or_default())
}

pub use diagnostic::exam_score;
pub use exercises::{
  assistant_summary, check_answers, check_exercise, daily_quiz, generate_exercise,
  orthogram_letters, practice_page, weekly_report,
};
pub use game::{create_game, game_action, game_config, game_page, game_snapshot};
pub use notes::{load_examples, save_example};
