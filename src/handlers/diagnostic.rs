//! Exam diagnostic scoring.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::content::scoring::{self, ESSAY_MAX_SCORE, PRIMARY_MAX_SCORE};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
  /// Primary points from the test part
  pub test_score: u32,
  /// Essay score as typed by the student
  pub essay: Option<String>,
}

pub async fn exam_score(Json(request): Json<ScoreRequest>) -> impl IntoResponse {
  let score = scoring::exam_score(request.test_score, request.essay.as_deref());

  let mut warnings = Vec::new();
  if score.essay.invalid {
    warnings.push(format!("Пожалуйста, введите число от 0 до {}", ESSAY_MAX_SCORE));
  } else if score.essay.clamped && score.essay.value == ESSAY_MAX_SCORE {
    warnings.push(format!("Максимальный балл за сочинение - {}", ESSAY_MAX_SCORE));
  }
  tracing::debug!("Exam score: primary {} secondary {}", score.primary, score.secondary);

  (
    StatusCode::OK,
    Json(serde_json::json!({
      "score": score,
      "max_primary": PRIMARY_MAX_SCORE,
      "max_secondary": 100,
      "warnings": warnings,
    })),
  )
}
