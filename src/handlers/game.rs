//! Dartboard game: page, board config and hosted game sessions.
//!
//! The page normally runs the game in WASM. Hosted sessions run the same
//! `GameState` on the server for clients without WASM and for tests.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use target_game::{ActionArgs, ActionError, GameError, GameState};

use super::{db_unavailable, json_error};
use crate::config::{GAME_IDLE_MINUTES, MAX_GAME_SESSIONS};
use crate::filters;
use crate::state::{evict_games, AppState, HostedGame};

#[derive(Template)]
#[template(path = "game.html")]
pub struct GameTemplate {
    /// Board file embedded for the WASM module
    pub board_json: String,
    pub tally_capacity: usize,
    pub segments: Vec<(String, String)>,
}

pub async fn game_page(State(state): State<AppState>) -> Html<String> {
    let segments = state
        .board
        .segments
        .iter()
        .map(|s| (s.name.clone(), s.title.clone().unwrap_or_else(|| s.name.clone())))
        .collect();

    let template = GameTemplate {
        board_json: state.board_json.to_string(),
        tally_capacity: state.tally_capacity,
        segments,
    };

    Html(template.render().unwrap_or_default())
}

pub async fn game_config(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.board_json.to_string(),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CreateGameQuery {
    /// Fixed seed for reproducible word order
    pub seed: Option<u64>,
}

pub async fn create_game(
    State(state): State<AppState>,
    Query(query): Query<CreateGameQuery>,
) -> Response {
    let seed = query.seed.unwrap_or_else(rand::random);
    let game = match GameState::new(&state.board, state.tally_capacity, seed) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("Cannot start game: {}", e);
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, e);
        }
    };

    let mut games = match state.lock_games() {
        Ok(games) => games,
        Err(_) => return db_unavailable(),
    };
    let now = Utc::now();
    let dropped = evict_games(&mut games, now, Duration::minutes(GAME_IDLE_MINUTES), MAX_GAME_SESSIONS);
    if dropped > 0 {
        tracing::info!("Dropped {} old games, {} still active", dropped, games.len());
    }

    let session_id = hex::encode(rand::random::<[u8; 16]>());
    let snapshot = game.snapshot();
    games.insert(session_id.clone(), HostedGame::new(game, now));
    tracing::debug!("Started game {}", session_id);

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session_id,
            "snapshot": snapshot,
        })),
    )
        .into_response()
}

pub async fn game_snapshot(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    let mut games = match state.lock_games() {
        Ok(games) => games,
        Err(_) => return db_unavailable(),
    };
    match games.get_mut(&session_id) {
        Some(hosted) => (StatusCode::OK, Json(hosted.touch(Utc::now()).snapshot())).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Game not found"),
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(flatten)]
    pub args: ActionArgs,
}

/// HTTP status for a rejected action.
fn action_status(error: &ActionError) -> StatusCode {
    match error {
        ActionError::Unknown(_) | ActionError::MissingArgument { .. } => StatusCode::BAD_REQUEST,
        ActionError::Game(GameError::Segment(target_game::SegmentError::Unknown(_))) => {
            StatusCode::BAD_REQUEST
        }
        ActionError::Game(_) => StatusCode::CONFLICT,
        ActionError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn game_action(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Response {
    let mut games = match state.lock_games() {
        Ok(games) => games,
        Err(_) => return db_unavailable(),
    };
    let Some(hosted) = games.get_mut(&session_id) else {
        return json_error(StatusCode::NOT_FOUND, "Game not found");
    };
    let game = hosted.touch(Utc::now());

    match state.dispatcher.dispatch_named(game, &request.action, &request.args) {
        Ok(event) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "event": event,
                "snapshot": game.snapshot(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::debug!("Game {} rejected \"{}\": {}", session_id, request.action, e);
            json_error(action_status(&e), e)
        }
    }
}
