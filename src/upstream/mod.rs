//! Upstream lyrics API subsystem.
//!
//! # Data Flow
//! ```text
//! Route (song/artist + id)
//!     → client.rs (one authenticated GET, no retries)
//!     → types.rs (envelope parse, record projection)
//!     → flatten (description DOM → blocks)
//!     → SongRecord / ArtistRecord
//! ```
//!
//! # Design Decisions
//! - Exactly one upstream call per proxy request
//! - Non-2xx upstream statuses surface as typed errors, never panics
//! - Records are flat projections; only the fields the edge re-serves

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{AlbumRecord, ArtistRecord, SongRecord};
