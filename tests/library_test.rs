use std::fs;

use tidalshift::{
    engine::describe,
    management::{
        FAILURE_LOG_HEADER, FailureLog, LibraryPaths, LineEntry, LineFile, MetadataCache,
        PlaylistDocument, parse_lines,
    },
    types::{Category, Identity, LibraryItem, PlaylistRecord, PlaylistSummary, TrackReference},
};

// ---------------------------------------------------------------------------
// Line files
// ---------------------------------------------------------------------------

#[test]
fn test_parse_mixed_legacy_lines() {
    let content = "123 :: Album: Album1 | Artist: Artist1\n456\n\n   \n789 :: Artist: Someone\n";
    let entries = parse_lines(content);

    assert_eq!(
        entries,
        vec![
            LineEntry::new("123", "Album: Album1 | Artist: Artist1"),
            LineEntry::bare("456"),
            LineEntry::new("789", "Artist: Someone"),
        ]
    );
}

#[test]
fn test_parse_trims_identity_and_description() {
    let entry = LineEntry::parse("  42   ::   Track: Song | Artist: X  ").unwrap();

    assert_eq!(entry.id, Identity::new("42"));
    assert_eq!(entry.description.as_deref(), Some("Track: Song | Artist: X"));
    assert!(LineEntry::parse("   ").is_none());
}

#[test]
fn test_parse_splits_on_first_separator_only() {
    let entry = LineEntry::parse("7 :: Album: A :: B | Artist: C").unwrap();

    assert_eq!(entry.id, Identity::new("7"));
    assert_eq!(entry.description.as_deref(), Some("Album: A :: B | Artist: C"));
}

#[test]
fn test_line_entry_to_line() {
    assert_eq!(LineEntry::new("1", "Artist: X").to_line(), "1 :: Artist: X");
    assert_eq!(LineEntry::bare("2").to_line(), "2");
}

#[tokio::test]
async fn test_line_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = LineFile::new(dir.path().join("nested").join("album_id_list.txt"));
    let entries: Vec<LineEntry> = (0..40)
        .map(|n| LineEntry::new(n.to_string(), format!("Album: A{} | Artist: B", n)))
        .collect();

    file.persist(&entries).await.unwrap();
    let loaded = file.load().await.unwrap().unwrap();

    assert_eq!(loaded, entries);
}

#[tokio::test]
async fn test_line_file_overwrites_previous_export() {
    let dir = tempfile::tempdir().unwrap();
    let file = LineFile::new(dir.path().join("artist_id_list.txt"));

    file.persist(&[LineEntry::bare("1"), LineEntry::bare("2")])
        .await
        .unwrap();
    file.persist(&[LineEntry::bare("3")]).await.unwrap();

    assert_eq!(fs::read_to_string(file.path()).unwrap(), "3\n");
}

#[tokio::test]
async fn test_missing_files_load_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let paths = LibraryPaths::new(dir.path());

    let lines = LineFile::new(paths.category_file(Category::Tracks)).load().await;
    let playlists = PlaylistDocument::new(paths.playlists_file()).load().await;

    assert!(lines.unwrap().is_none());
    assert!(playlists.unwrap().is_none());
}

#[test]
fn test_library_paths_file_names() {
    let paths = LibraryPaths::new("/data");

    assert!(paths.category_file(Category::Albums).ends_with("album_id_list.txt"));
    assert!(paths.category_file(Category::Artists).ends_with("artist_id_list.txt"));
    assert!(paths.category_file(Category::Tracks).ends_with("track_id_list.txt"));
    assert!(paths.playlists_file().ends_with("playlists_export.json"));
    assert!(paths.failures_file().ends_with("failed_items.txt"));
}

// ---------------------------------------------------------------------------
// Playlist document
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_playlist_document_writes_described_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let document = PlaylistDocument::new(dir.path().join("playlists_export.json"));
    let records = vec![PlaylistRecord {
        name: "Mix".to_string(),
        description: None,
        tracks: vec![TrackReference::Described {
            id: Identity::new("5"),
            meta: "Song - Artist".to_string(),
        }],
    }];

    document.persist(&records).await.unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(document.path()).unwrap()).unwrap();
    assert_eq!(json[0]["name"], "Mix");
    assert_eq!(json[0]["tracks"][0]["id"], "5");
    assert_eq!(json[0]["tracks"][0]["meta"], "Song - Artist");
}

#[tokio::test]
async fn test_playlist_document_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlists_export.json");
    fs::write(&path, "{ not json").unwrap();

    let result = PlaylistDocument::new(path).load().await;

    assert!(result.is_err());
}

#[test]
fn test_track_reference_accepts_both_shapes() {
    let tracks: Vec<TrackReference> =
        serde_json::from_str(r#"["10", 11, {"id": "12", "meta": "A - B"}]"#).unwrap();

    assert_eq!(tracks[0], TrackReference::Bare(Identity::new("10")));
    assert_eq!(tracks[1].id(), &Identity::new("11"));
    assert_eq!(tracks[1].description(), None);
    assert_eq!(tracks[2].description(), Some("A - B"));
}

// ---------------------------------------------------------------------------
// Identities and ownership
// ---------------------------------------------------------------------------

#[test]
fn test_identity_compares_as_string() {
    let from_number: Identity = serde_json::from_str("42").unwrap();
    let from_text: Identity = serde_json::from_str("\" 42 \"").unwrap();

    assert_eq!(from_number, from_text);
    assert_eq!(Identity::from(42u64), Identity::new("42"));
    assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"42\"");
}

#[test]
fn test_playlist_ownership() {
    let user = Identity::from(42u64);
    let owned = PlaylistSummary {
        id: Identity::new("a"),
        name: "Mine".to_string(),
        description: None,
        creator: Some(Identity::new("42")),
    };
    let foreign = PlaylistSummary {
        creator: Some(Identity::new("43")),
        ..owned.clone()
    };
    let anonymous = PlaylistSummary {
        creator: None,
        ..owned.clone()
    };

    assert!(owned.is_owned_by(&user));
    assert!(!foreign.is_owned_by(&user));
    assert!(!anonymous.is_owned_by(&user));
}

// ---------------------------------------------------------------------------
// Descriptions and cache
// ---------------------------------------------------------------------------

#[test]
fn test_describe_categories() {
    let album = LibraryItem::new("1", "Album1").with_artist("Artist1");
    let artist = LibraryItem::new("2", "Artist2");
    let track = LibraryItem::new("3", "Song");
    let full_track = LibraryItem::new("4", "Song")
        .with_artist("Band")
        .with_album("Record");

    assert_eq!(
        describe(Category::Albums, &album),
        "Album: Album1 | Artist: Artist1"
    );
    assert_eq!(describe(Category::Artists, &artist), "Artist: Artist2");
    assert_eq!(
        describe(Category::Tracks, &track),
        "Track: Song | Artist: Unknown Artist"
    );
    assert_eq!(
        describe(Category::Tracks, &full_track),
        "Track: Song | Artist: Band | Album: Record"
    );
}

#[test]
fn test_cache_last_write_wins() {
    let mut cache = MetadataCache::new();
    let id = Identity::new("9");

    assert_eq!(cache.describe_or(&id, || "fallback".to_string()), "fallback");

    cache.insert(id.clone(), "first");
    cache.insert(id.clone(), "second");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&id), Some("second"));
    assert_eq!(cache.describe_or(&id, || "fallback".to_string()), "second");
}

// ---------------------------------------------------------------------------
// Failure log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_failure_log_reset_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let log = FailureLog::new(dir.path().join("failed_items.txt"));

    log.record("Artist: Old", &"stale").await.unwrap();
    log.reset().await.unwrap();

    assert_eq!(fs::read_to_string(log.path()).unwrap(), FAILURE_LOG_HEADER);
    assert!(FAILURE_LOG_HEADER.starts_with("Failed Transfer Report:\n"));
    assert_eq!(log.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failure_log_appends_records() {
    let dir = tempfile::tempdir().unwrap();
    let log = FailureLog::new(dir.path().join("failed_items.txt"));

    log.reset().await.unwrap();
    log.record("Album: A | Artist: B", &"404 not found")
        .await
        .unwrap();
    log.record("ID: 7 (no metadata)", &format!("status {}", 500))
        .await
        .unwrap();

    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(
        content,
        format!(
            "{}Album: A | Artist: B\n   -> Reason: 404 not found\nID: 7 (no metadata)\n   -> Reason: status 500\n",
            FAILURE_LOG_HEADER
        )
    );
    assert_eq!(log.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_failure_log_count_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = FailureLog::new(dir.path().join("failed_items.txt"));

    assert_eq!(log.count().await.unwrap(), 0);
}
