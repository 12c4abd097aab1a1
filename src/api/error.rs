use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Failure reported to an HTTP client.
///
/// `Internal` messages are generic on purpose; the underlying cause is
/// logged where the error is raised.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "success": false, "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}
