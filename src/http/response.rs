//! Response construction and transformation.
//!
//! # Responsibilities
//! - Build JSON responses with CORS and cache-control headers
//! - Build the CORS preflight response
//! - Replay cached responses with the cache marker header
//!
//! # Design Decisions
//! - Every response carries `Access-Control-Allow-Origin: *` so
//!   browser clients can read success and error bodies alike
//! - `X-Proxy-Cache` distinguishes replayed responses (HIT) from
//!   freshly fetched ones (MISS); the stored copy carries neither

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::cache::CachedEntry;
use crate::security::auth::PROXY_SECRET_HEADER;

/// Marker header: HIT when replayed from cache, MISS when fetched.
pub const CACHE_STATUS_HEADER: &str = "x-proxy-cache";

/// Plain JSON response (root info payload): CORS, no cache headers.
pub fn json(value: &serde_json::Value) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        value.to_string(),
    )
        .into_response()
}

/// Successful fetch response: JSON body plus the shared-edge and
/// browser cache directives and the MISS marker.
pub fn cacheable_json(body: Vec<u8>, cache_control: &str) -> Response {
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        body,
    )
        .into_response();

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    headers.insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static("MISS"),
    );
    response
}

/// The `Cache-Control` directive pair for successful fetches.
pub fn cache_control(edge_ttl_secs: u64, browser_ttl_secs: u64) -> String {
    format!(
        "public, s-maxage={}, max-age={}",
        edge_ttl_secs, browser_ttl_secs
    )
}

/// CORS preflight response: empty 200 with the allowed surface.
pub fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                "GET, OPTIONS",
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, X-Proxy-Secret",
            ),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
        .into_response()
}

/// Replay a cached response byte-for-byte, adding the HIT marker.
pub fn replay_cached(entry: &CachedEntry) -> Response {
    let mut response = (
        StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK),
        entry.body.clone(),
    )
        .into_response();

    let headers = response.headers_mut();
    for (name, value) in &entry.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static("HIT"),
    );
    response
}

/// Static payload served at the root path.
pub fn info_payload() -> serde_json::Value {
    serde_json::json!({
        "message": "Lyrics proxy. Pass the shared secret in the X-Proxy-Secret header.",
        "endpoints": {
            "song": "/song/{id}",
            "artist": "/artist/{id}",
        }
    })
}

/// Headers worth replaying from cache (everything except the marker,
/// which the replay path sets itself).
pub fn replayable_headers(cache_control: &str) -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("cache-control".to_string(), cache_control.to_string()),
    ]
}
