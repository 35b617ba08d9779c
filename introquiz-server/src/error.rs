//! API error type
//!
//! Every failure reaches the caller as `{"error": message}` with a status
//! code; nothing here is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No eligible song remains for the request (404)
    #[error("{0}")]
    NotFound(String),

    /// Missing or unparseable request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Underlying store unreachable or corrupt (500)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<introquiz_common::Error> for ApiError {
    fn from(err: introquiz_common::Error) -> Self {
        use introquiz_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::StorageUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::StorageUnavailable(msg) => {
                error!("Request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::NotFound("No available songs left.".to_string()).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::BadRequest("empty body".to_string()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let db = ApiError::from(introquiz_common::Error::Database(sqlx::Error::PoolClosed));
        assert!(matches!(db, ApiError::StorageUnavailable(_)));
        assert_eq!(db.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_common_error_conversion() {
        let err = ApiError::from(introquiz_common::Error::NotFound("gone".to_string()));
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "gone"));
    }
}
