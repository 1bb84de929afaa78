//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → structured log events (tracing, initialized in main)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log lines via tower-http layers
//! - Metrics are cheap (atomic increments)
//! - Recording is a no-op until the exporter is installed, so the
//!   library stays usable without a metrics endpoint

pub mod metrics;
