//! HTTP API handlers for introquiz-server

pub mod buildinfo;
pub mod health;
pub mod pages;
pub mod quiz;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use pages::{
    playlist_page, quiz_page, result_page, serve_playlist_js, serve_quiz_js, serve_settings_js,
    serve_style_css, settings_page, top_page,
};
pub use quiz::{get_next_question, submit_scores};
