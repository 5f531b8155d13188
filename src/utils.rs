use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::types::Selection;

/// Longest `Retry-After` the client is willing to sleep through.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// Parses the `created` timestamps TIDAL attaches to favorites, e.g.
/// `2020-06-10T09:33:04.000+0000`. Anything unparseable counts as unknown.
pub fn parse_tidal_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Seconds to wait according to a `Retry-After` header, if present.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Builds a selection from command-line flags; `all` or no flag at all
/// selects every category.
pub fn selection_from_flags(
    tracks: bool,
    albums: bool,
    artists: bool,
    playlists: bool,
    all: bool,
) -> Selection {
    let selection = Selection {
        tracks,
        albums,
        artists,
        playlists,
    };
    if all || selection.is_empty() {
        return Selection::all();
    }
    selection
}

/// Makes a device-flow verification URI clickable.
pub fn ensure_scheme(uri: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        uri.to_string()
    } else {
        format!("https://{}", uri)
    }
}
