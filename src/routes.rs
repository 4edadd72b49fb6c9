//! HTTP routes.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::paths;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Dartboard game
        .route("/game", get(handlers::game_page))
        .route("/api/game/config", get(handlers::game_config))
        .route("/api/game", post(handlers::create_game))
        .route("/api/game/{id}", get(handlers::game_snapshot))
        .route("/api/game/{id}/action", post(handlers::game_action))
        // Orthogram practice
        .route("/practice/{orthogram}", get(handlers::practice_page))
        .route("/api/generate-exercise", post(handlers::generate_exercise))
        .route("/api/check-exercise", post(handlers::check_exercise))
        .route("/api/check-answers", post(handlers::check_answers))
        .route("/api/orthogram/{id}/letters/", get(handlers::orthogram_letters))
        .route("/api/daily-quiz", get(handlers::daily_quiz))
        .route("/api/assistant", get(handlers::assistant_summary))
        .route("/api/weekly-report", get(handlers::weekly_report))
        .route("/api/diagnostic/score", post(handlers::exam_score))
        // Planning notes
        .route("/save-example", post(handlers::save_example))
        .route("/load-examples", get(handlers::load_examples))
        .nest_service("/static", ServeDir::new(paths::STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
