//! Request-scoped error definitions.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Errors that can occur while serving a request.
///
/// Every variant maps to a terminal HTTP response; none of them are
/// fatal to the process. Each request is isolated.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Required configuration is missing (e.g. upstream token).
    #[error("configuration error: {0}")]
    Config(String),

    /// Shared-secret check failed.
    #[error("Unauthorized")]
    Unauthorized,

    /// Client exceeded its request budget.
    #[error("Too Many Requests")]
    RateLimited,

    /// Upstream API answered with a non-2xx status.
    #[error("upstream returned {status} {status_text}")]
    Upstream { status: u16, status_text: String },

    /// Network or decode failure talking to the upstream API.
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure encoding an outbound response body.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// No route matched the request path.
    #[error("Not found. Try /song/{{id}} or /artist/{{id}}")]
    NotFound,

    /// Request method is neither GET nor OPTIONS.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ProxyError {
    /// HTTP status this error terminates the request with.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Unauthorized => StatusCode::UNAUTHORIZED,
            ProxyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::NotFound => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 405 is plain text; everything else is a JSON error body.
        // All error responses carry the CORS allow-origin header so
        // browser clients can read them.
        if matches!(self, ProxyError::MethodNotAllowed) {
            return (
                status,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                "Method not allowed",
            )
                .into_response();
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (
            status,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body.to_string(),
        )
            .into_response()
    }
}
