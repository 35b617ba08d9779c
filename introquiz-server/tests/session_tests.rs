//! Session cookie tests for introquiz-server
//!
//! Scores are stored per session; the session id travels in the
//! `introquiz_session` cookie issued on first contact.

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use introquiz_common::db::init_memory_database;
use introquiz_server::session::{SessionStore, DEFAULT_SESSION_TTL, SESSION_COOKIE};
use introquiz_server::{build_router, AppState};
use serde_json::json;
use std::io::Write;
use tower::util::ServiceExt;

async fn setup_app() -> Router {
    let pool = init_memory_database().await.unwrap();
    build_router(AppState::new(pool, std::env::temp_dir()))
}

/// `name=value` part of the Set-Cookie header, if one was issued
fn issued_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

async fn new_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = issued_cookie(&response).expect("first visit should issue a cookie");
    assert!(cookie.starts_with(SESSION_COOKIE));
    cookie
}

async fn submit(app: &Router, cookie: &str, p1: serde_json::Value, p2: serde_json::Value) {
    let request = Request::post("/submit_scores")
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"player1Score": p1, "player2Score": p2}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn result_html(app: &Router, cookie: &str) -> String {
    let request = Request::get("/result")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(issued_cookie(&response).is_none(), "known session must not be reissued");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_player1_wins() {
    let app = setup_app().await;
    let cookie = new_session(&app).await;

    submit(&app, &cookie, json!(5), json!(3)).await;

    let html = result_html(&app, &cookie).await;
    assert!(html.contains(r#"<td id="player1-score">5</td>"#));
    assert!(html.contains(r#"<td id="player2-score">3</td>"#));
    assert!(html.contains("player 1 wins"));
}

#[tokio::test]
async fn test_latest_submission_overwrites() {
    let app = setup_app().await;
    let cookie = new_session(&app).await;

    submit(&app, &cookie, json!(5), json!(3)).await;
    submit(&app, &cookie, json!(2), json!(2)).await;

    let html = result_html(&app, &cookie).await;
    assert!(html.contains(r#"<p id="winner">tie</p>"#));

    // Reading the result twice changes nothing
    assert_eq!(html, result_html(&app, &cookie).await);
}

#[tokio::test]
async fn test_bad_score_values_default_to_zero() {
    let app = setup_app().await;
    let cookie = new_session(&app).await;

    submit(&app, &cookie, json!("abc"), json!(4)).await;

    let html = result_html(&app, &cookie).await;
    assert!(html.contains(r#"<td id="player1-score">0</td>"#));
    assert!(html.contains("player 2 wins"));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = setup_app().await;
    let alice = new_session(&app).await;
    let bob = new_session(&app).await;
    assert_ne!(alice, bob);

    submit(&app, &alice, json!(9), json!(1)).await;

    let html = result_html(&app, &bob).await;
    assert!(html.contains(r#"<td id="player1-score">0</td>"#));
    assert!(html.contains(r#"<p id="winner">tie</p>"#));
}

#[tokio::test]
async fn test_audio_served_from_audio_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("0001.mp3")).unwrap();
    file.write_all(b"ID3fake").unwrap();

    let pool = init_memory_database().await.unwrap();
    let app = build_router(AppState::new(pool, dir.path().to_path_buf()));

    let response = app
        .clone()
        .oneshot(Request::get("/audio/0001.mp3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/audio/missing.mp3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cookieless_submits_stay_within_capacity() {
    let pool = init_memory_database().await.unwrap();
    let sessions = SessionStore::with_limits(DEFAULT_SESSION_TTL, 50);
    let app = build_router(AppState::with_sessions(
        pool,
        std::env::temp_dir(),
        sessions.clone(),
    ));

    // Every request without a cookie starts a new session
    for _ in 0..500 {
        let request = Request::post("/submit_scores")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"player1Score": 1, "player2Score": 2}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(sessions.len(), 50);
}
