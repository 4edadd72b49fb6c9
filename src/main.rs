use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orfo_drill::config::Settings;
use orfo_drill::content::{load_board, Catalog, LetterTable};
use orfo_drill::state::AppState;
use orfo_drill::{db, routes};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "orfo_drill=debug,target_game=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");

  match Catalog::load(&settings.catalog_path) {
    Ok(catalog) => {
      let mut conn = pool.lock().expect("Database lock failed during startup");
      db::seed_catalog(&mut conn, &catalog).expect("Failed to seed orthogram catalog");
    }
    Err(e) => tracing::warn!("Orthogram catalog not loaded: {}", e),
  }

  let board = load_board(&settings.board_path).expect("Failed to load dartboard");

  let letters = LetterTable::load(&settings.letters_path).unwrap_or_else(|e| {
    tracing::warn!("Using built-in letter sets: {}", e);
    LetterTable::default()
  });

  let state = AppState::new(pool, board, letters, settings.tally_capacity);
  let app = routes::app(state);

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
