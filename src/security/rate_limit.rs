//! Per-client rate limiting middleware.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RateLimitConfig;
use crate::error::ProxyError;
use crate::observability::metrics;

/// Header carrying the originating client IP.
pub const CLIENT_IP_HEADER: &str = "x-real-ip";

/// Key used when the originating-IP header is absent.
const ANONYMOUS_KEY: &str = "anonymous";

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// State for the per-client rate limiter.
///
/// Answers allow/deny per client key, the same contract an external
/// limiter collaborator would provide.
pub struct RateLimiterState {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    rps: f64,
    burst: f64,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            rps: config.requests_per_second as f64,
            burst: config.burst_size as f64,
        }
    }

    /// Check whether the client identified by `key` may proceed.
    pub fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst));

        bucket.try_acquire(self.burst, self.rps)
    }
}

/// Middleware function for per-client rate limiting.
///
/// The client key is the originating-IP header, falling back to a
/// shared anonymous key when absent. The gate only exists when a
/// limiter is configured; without one, requests pass untouched.
pub async fn rate_limit_middleware(
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get(CLIENT_IP_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or(ANONYMOUS_KEY)
        .to_string();

    if state.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited(&key);
        ProxyError::RateLimited.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(rps: u32, burst: u32) -> RateLimiterState {
        RateLimiterState::new(&RateLimitConfig {
            enabled: true,
            requests_per_second: rps,
            burst_size: burst,
        })
    }

    #[test]
    fn test_burst_then_deny() {
        let state = limiter(1, 3);

        assert!(state.check("1.2.3.4"));
        assert!(state.check("1.2.3.4"));
        assert!(state.check("1.2.3.4"));
        assert!(!state.check("1.2.3.4"));
    }

    #[test]
    fn test_keys_are_independent() {
        let state = limiter(1, 1);

        assert!(state.check("1.2.3.4"));
        assert!(!state.check("1.2.3.4"));
        // A different client still has its own budget.
        assert!(state.check("5.6.7.8"));
    }

    #[test]
    fn test_refill_restores_budget() {
        let state = limiter(1000, 1);

        assert!(state.check("1.2.3.4"));
        assert!(!state.check("1.2.3.4"));
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(state.check("1.2.3.4"));
    }
}
