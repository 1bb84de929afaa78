//! Shared-secret gate middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ProxyError;

/// Header clients must present the shared secret in.
pub const PROXY_SECRET_HEADER: &str = "x-proxy-secret";

/// State for the shared-secret gate.
#[derive(Clone)]
pub struct AuthState {
    /// The configured secret. `None` rejects every request.
    pub shared_secret: Option<String>,
}

/// Middleware enforcing the shared-secret header on every request,
/// regardless of path or method.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(PROXY_SECRET_HEADER)
        .and_then(|h| h.to_str().ok());

    match (state.shared_secret.as_deref(), supplied) {
        (Some(expected), Some(given)) if constant_time_eq(expected, given) => {
            next.run(request).await
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with bad or missing secret");
            ProxyError::Unauthorized.into_response()
        }
    }
}

/// Compare secrets without short-circuiting on the first differing
/// byte. Length differences still return early; the secret length is
/// not considered sensitive here.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
