//! Route matching logic.
//!
//! # Responsibilities
//! - Match the root path (including the empty path)
//! - Match `/song/<digits>` and `/artist/<digits>` exactly
//! - Reject everything else with an explicit no-match
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Ids are captured as opaque strings; the digits check is the only
//!   validation, so malformed ids fall through to no-match
//! - Trailing slashes are not normalized away

/// A matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Root info payload.
    Root,
    /// Song fetch with its all-digits id.
    Song(String),
    /// Artist fetch with its all-digits id.
    Artist(String),
}

/// Match a request path against the fixed route set.
pub fn match_path(path: &str) -> Option<Route> {
    if path.is_empty() || path == "/" {
        return Some(Route::Root);
    }

    if let Some(id) = path.strip_prefix("/song/") {
        if is_digits(id) {
            return Some(Route::Song(id.to_string()));
        }
    }

    if let Some(id) = path.strip_prefix("/artist/") {
        if is_digits(id) {
            return Some(Route::Artist(id.to_string()));
        }
    }

    None
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
