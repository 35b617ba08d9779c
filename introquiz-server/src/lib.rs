//! introquiz-server library - intro quiz web service
//!
//! Serves the quiz pages and the two JSON endpoints the quiz page calls.

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;

pub mod api;
pub mod error;
pub mod quiz;
pub mod session;

use session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Song catalog (read-only while serving)
    pub db: SqlitePool,
    /// Per-session score records
    pub sessions: SessionStore,
    /// Directory served under `/audio`
    pub audio_dir: PathBuf,
}

impl AppState {
    /// Create new application state with an empty session store
    pub fn new(db: SqlitePool, audio_dir: PathBuf) -> Self {
        Self::with_sessions(db, audio_dir, SessionStore::new())
    }

    /// Create application state around an existing session store
    pub fn with_sessions(db: SqlitePool, audio_dir: PathBuf, sessions: SessionStore) -> Self {
        Self {
            db,
            sessions,
            audio_dir,
        }
    }
}

/// Build application router
///
/// Pages and quiz endpoints run behind the session middleware; health,
/// build info and assets do not.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    let session_routes = Router::new()
        .route("/", get(api::top_page))
        .route("/quiz", get(api::quiz_page))
        .route("/result", get(api::result_page))
        .route("/playlist", get(api::playlist_page))
        .route("/settings", get(api::settings_page))
        .route("/get_next_question", post(api::get_next_question))
        .route("/submit_scores", post(api::submit_scores))
        .layer(middleware::from_fn(session::ensure_session));

    let public = Router::new()
        .route("/static/quiz.js", get(api::serve_quiz_js))
        .route("/static/settings.js", get(api::serve_settings_js))
        .route("/static/playlist.js", get(api::serve_playlist_js))
        .route("/static/style.css", get(api::serve_style_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .nest_service("/audio", ServeDir::new(&state.audio_dir))
        .merge(api::health_routes());

    Router::new()
        .merge(session_routes)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
