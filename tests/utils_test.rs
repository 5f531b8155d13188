use std::time::Duration;

use chrono::{Datelike, Timelike};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use tidalshift::types::Selection;
use tidalshift::utils::*;

#[test]
fn test_parse_tidal_timestamp() {
    let parsed = parse_tidal_timestamp("2020-06-10T09:33:04.000+0000").unwrap();

    assert_eq!(parsed.year(), 2020);
    assert_eq!(parsed.month(), 6);
    assert_eq!(parsed.day(), 10);
    assert_eq!(parsed.hour(), 9);
}

#[test]
fn test_parse_tidal_timestamp_with_offset() {
    let parsed = parse_tidal_timestamp("2021-01-01T01:30:00.000+0200").unwrap();

    // normalized to UTC
    assert_eq!(parsed.year(), 2020);
    assert_eq!(parsed.hour(), 23);
}

#[test]
fn test_parse_tidal_timestamp_rfc3339() {
    assert!(parse_tidal_timestamp("2022-11-05T18:00:00Z").is_some());
}

#[test]
fn test_parse_tidal_timestamp_invalid() {
    assert!(parse_tidal_timestamp("").is_none());
    assert!(parse_tidal_timestamp("yesterday").is_none());
    assert!(parse_tidal_timestamp("2020-13-45").is_none());
}

#[test]
fn test_retry_after() {
    let mut headers = HeaderMap::new();
    assert_eq!(retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("17"));
    assert_eq!(retry_after(&headers), Some(Duration::from_secs(17)));

    headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
    assert_eq!(retry_after(&headers), None);
}

#[test]
fn test_max_retry_after() {
    assert_eq!(MAX_RETRY_AFTER, Duration::from_secs(120));
}

#[test]
fn test_selection_from_flags_defaults_to_all() {
    assert_eq!(
        selection_from_flags(false, false, false, false, false),
        Selection::all()
    );
    assert_eq!(
        selection_from_flags(true, false, false, false, true),
        Selection::all()
    );
}

#[test]
fn test_selection_from_flags_explicit() {
    let selection = selection_from_flags(true, false, false, true, false);

    assert!(selection.tracks);
    assert!(selection.playlists);
    assert!(!selection.albums);
    assert!(!selection.artists);
}

#[test]
fn test_ensure_scheme() {
    assert_eq!(ensure_scheme("link.tidal.com/ABCDE"), "https://link.tidal.com/ABCDE");
    assert_eq!(
        ensure_scheme("https://link.tidal.com/ABCDE"),
        "https://link.tidal.com/ABCDE"
    );
    assert_eq!(ensure_scheme("http://localhost:8080"), "http://localhost:8080");
}
