//! HTML pages and static assets
//!
//! Pages are compiled in. Placeholders of the form `{{NAME}}` are filled
//! before serving; every page gets the footer text.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension,
};

use crate::quiz::compute_result;
use crate::session::SessionId;
use crate::AppState;

/// Footer shown on every page
pub const FOOTER_TEXT: &str = "©2025 琉球大学工学部工学科知能情報コース";

const TOP_HTML: &str = include_str!("../../ui/top.html");
const QUIZ_HTML: &str = include_str!("../../ui/quiz.html");
const RESULT_HTML: &str = include_str!("../../ui/result.html");
const PLAYLIST_HTML: &str = include_str!("../../ui/playlist.html");
const SETTINGS_HTML: &str = include_str!("../../ui/settings.html");
const QUIZ_JS: &str = include_str!("../../ui/static/quiz.js");
const SETTINGS_JS: &str = include_str!("../../ui/static/settings.js");
const PLAYLIST_JS: &str = include_str!("../../ui/static/playlist.js");
const STYLE_CSS: &str = include_str!("../../ui/static/style.css");

/// Fill `{{KEY}}` placeholders; the footer is always supplied
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    let mut html = template.replace("{{FOOTER_TEXT}}", FOOTER_TEXT);
    for (key, value) in values {
        html = html.replace(&format!("{{{{{}}}}}", key), value);
    }
    html
}

/// GET /
pub async fn top_page() -> Html<String> {
    Html(render(TOP_HTML, &[]))
}

/// GET /quiz
pub async fn quiz_page() -> Html<String> {
    Html(render(QUIZ_HTML, &[]))
}

/// GET /result
///
/// Shows the last scores submitted by this session.
pub async fn result_page(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Html<String> {
    let result = compute_result(&state.sessions, session_id);

    Html(render(
        RESULT_HTML,
        &[
            ("PLAYER1_SCORE", result.player1_score.to_string()),
            ("PLAYER2_SCORE", result.player2_score.to_string()),
            ("WINNER", result.winner.to_string()),
        ],
    ))
}

/// GET /playlist
pub async fn playlist_page() -> Html<String> {
    Html(render(PLAYLIST_HTML, &[]))
}

/// GET /settings
pub async fn settings_page() -> Html<String> {
    Html(render(SETTINGS_HTML, &[]))
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// GET /static/quiz.js
pub async fn serve_quiz_js() -> Response {
    asset("application/javascript", QUIZ_JS)
}

/// GET /static/settings.js
pub async fn serve_settings_js() -> Response {
    asset("application/javascript", SETTINGS_JS)
}

/// GET /static/playlist.js
pub async fn serve_playlist_js() -> Response {
    asset("application/javascript", PLAYLIST_JS)
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    asset("text/css", STYLE_CSS)
}
