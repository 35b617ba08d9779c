//! Quiz JSON endpoints
//!
//! Bodies are parsed leniently: missing fields and non-numeric values fall
//! back to defaults, only an absent or unparseable body is rejected.

use axum::{body::Bytes, extract::State, Extension, Json};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

use crate::error::ApiError;
use crate::quiz::{self, QuizQuestion};
use crate::session::SessionId;
use crate::AppState;

/// Acknowledgement for a score submission
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Integer from a JSON number or numeric string
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Exclusion set from `{"exclude": [...]}`; anything else yields an empty set
fn exclusion_set(body: &Value) -> HashSet<i64> {
    body.get("exclude")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(coerce_int).collect())
        .unwrap_or_default()
}

/// POST /get_next_question
///
/// Body `{"exclude": [id, ...]}`, optional. 404 when no song is left.
pub async fn get_next_question(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QuizQuestion>, ApiError> {
    let exclude = if body.iter().all(u8::is_ascii_whitespace) {
        HashSet::new()
    } else {
        exclusion_set(&parse_body(&body)?)
    };

    let mut rng = StdRng::from_entropy();
    let question = quiz::next_question(&state.db, &exclude, &mut rng).await?;

    Ok(Json(question))
}

/// POST /submit_scores
///
/// Body `{"player1Score": n, "player2Score": n}`; missing or non-numeric
/// scores count as 0.
pub async fn submit_scores(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Missing request body".to_string()));
    }

    let payload = parse_body(&body)?;
    if !payload.is_object() {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    let score = |key: &str| payload.get(key).and_then(coerce_int).unwrap_or(0);
    let (player1, player2) = (score("player1Score"), score("player2Score"));

    quiz::submit_scores(&state.sessions, session_id, player1, player2);
    info!("Session {} scores saved: {} - {}", session_id, player1, player2);

    Ok(Json(MessageResponse {
        message: "Scores saved".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exclusion_set_coercion() {
        let body = json!({"exclude": [1, "2", 3.0, null, "x", 1]});
        let set = exclusion_set(&body);
        let expected: HashSet<i64> = [1, 2, 3].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_exclusion_set_absent() {
        assert!(exclusion_set(&json!({})).is_empty());
        assert!(exclusion_set(&json!({"exclude": null})).is_empty());
        assert!(exclusion_set(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(&json!(5)), Some(5));
        assert_eq!(coerce_int(&json!(" 12 ")), Some(12));
        assert_eq!(coerce_int(&json!("ten")), None);
        assert_eq!(coerce_int(&json!(true)), None);
    }
}
