//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listener
//! - One broadcast channel fans the shutdown signal out to every task

pub mod shutdown;

pub use shutdown::Shutdown;
