//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → auth.rs (shared-secret gate, 401 on mismatch)
//!     → rate_limit.rs (per-client token bucket, 429 on exhaustion)
//!     → Pass to the pipeline handler
//! ```
//!
//! # Design Decisions
//! - Both gates run before any cache lookup; cached content is never
//!   served to callers that fail them
//! - Auth fails closed: an unconfigured secret rejects everything
//! - Rate limiting fails open: an unconfigured limiter skips the gate

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthState, PROXY_SECRET_HEADER};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
