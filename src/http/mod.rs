//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware gates)
//!     → request.rs (request ID generation/propagation)
//!     → [secret gate, rate-limit gate]
//!     → server.rs pipeline handler (cache gate, method gate, routing,
//!       upstream fetch, cache write-through)
//!     → response.rs (headers, CORS, cache markers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
