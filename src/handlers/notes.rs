//! Planning notes saved per student.
//!
//! Students are anonymous: a random id in the `student_id` cookie ties the
//! notes to a browser.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::db_unavailable;
use crate::config::STUDENT_COOKIE;
use crate::db::{self, try_lock};

/// Length of a student id in hex characters
const STUDENT_ID_LEN: usize = 32;

fn is_valid_student_id(id: &str) -> bool {
    id.len() == STUDENT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Student id from the cookie, minting a new one (and cookie) when missing.
pub fn student_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(STUDENT_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| is_valid_student_id(id))
    {
        return (jar, id);
    }

    let id = hex::encode(rand::random::<[u8; 16]>());
    tracing::debug!("New student {}", id);
    let cookie = Cookie::build((STUDENT_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(365))
        .build();
    (jar.add(cookie), id)
}

#[derive(Debug, Deserialize)]
pub struct SaveExampleForm {
    pub field_name: Option<String>,
    #[serde(default)]
    pub content: String,
}

pub async fn save_example(
    State(state): State<crate::state::AppState>,
    jar: CookieJar,
    Form(form): Form<SaveExampleForm>,
) -> Response {
    let Some(field_name) = form.field_name.filter(|f| !f.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "status": "error" }))).into_response();
    };

    let (jar, student) = student_id(jar);
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    match db::save_example(&conn, &student, field_name.trim(), &form.content) {
        Ok(()) => (jar, Json(serde_json::json!({ "status": "success" }))).into_response(),
        Err(e) => {
            tracing::error!("Failed to save example {}: {}", field_name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "status": "error" })),
            )
                .into_response()
        }
    }
}

pub async fn load_examples(State(state): State<crate::state::AppState>, jar: CookieJar) -> Response {
    let (jar, student) = student_id(jar);
    let conn = match try_lock(&state.db) {
        Ok(conn) => conn,
        Err(_) => return db_unavailable(),
    };

    match db::load_examples(&conn, &student) {
        Ok(examples) => (jar, Json(examples)).into_response(),
        Err(e) => {
            tracing::error!("Failed to load examples: {}", e);
            super::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load examples")
        }
    }
}
