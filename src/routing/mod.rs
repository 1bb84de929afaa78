//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → matcher.rs (evaluate the fixed route set)
//!     → Return: matched Route or NoMatch
//! ```
//!
//! # Design Decisions
//! - The route set is fixed: root, /song/{id}, /artist/{id}
//! - Ids must be all ASCII digits; anything else is NoMatch, not a
//!   distinct validation error
//! - No regex in hot path (byte checks only)
//! - Deterministic: same path always matches the same route

pub mod matcher;

pub use matcher::{match_path, Route};
