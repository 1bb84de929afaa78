//! Lyrics Edge Proxy Library

pub mod cache;
pub mod config;
pub mod error;
pub mod flatten;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use flatten::{flatten, DomNode, FlatNode, Span, Style};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
