use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Opaque reference to a track, album, artist, playlist or user.
///
/// The service hands out identities as JSON numbers for some resources and
/// strings for others, so every identity is normalized to its trimmed string
/// form on construction. Two identities compare equal when their string
/// forms match, which makes `Identity::from(42)` equal to `Identity::from("42")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Identity(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Identity::new(raw)
    }
}

impl From<String> for Identity {
    fn from(raw: String) -> Self {
        Identity::new(raw)
    }
}

impl From<u64> for Identity {
    fn from(raw: u64) -> Self {
        Identity(raw.to_string())
    }
}

impl From<i64> for Identity {
    fn from(raw: i64) -> Self {
        Identity(raw.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentity {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawIdentity::deserialize(deserializer)? {
            RawIdentity::Unsigned(n) => Identity::from(n),
            RawIdentity::Signed(n) => Identity::from(n),
            RawIdentity::Text(s) => Identity::new(s),
        })
    }
}

/// The collection categories the engine moves around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Albums,
    Artists,
    Tracks,
    Playlists,
}

impl Category {
    /// Plural label used in log lines and progress messages.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Albums => "albums",
            Category::Artists => "artists",
            Category::Tracks => "favorite tracks",
            Category::Playlists => "playlists",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Albums => "Albums",
            Category::Artists => "Artists",
            Category::Tracks => "Tracks",
            Category::Playlists => "Playlists",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which of the two logged-in accounts an operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Account {
    Source,
    Destination,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Source => f.write_str("source"),
            Account::Destination => f.write_str("destination"),
        }
    }
}

/// The set of categories selected for one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub tracks: bool,
    pub albums: bool,
    pub artists: bool,
    pub playlists: bool,
}

impl Selection {
    pub fn all() -> Self {
        Selection {
            tracks: true,
            albums: true,
            artists: true,
            playlists: true,
        }
    }

    pub fn only(category: Category) -> Self {
        let mut selection = Selection::default();
        match category {
            Category::Albums => selection.albums = true,
            Category::Artists => selection.artists = true,
            Category::Tracks => selection.tracks = true,
            Category::Playlists => selection.playlists = true,
        }
        selection
    }

    pub fn is_empty(&self) -> bool {
        !(self.tracks || self.albums || self.artists || self.playlists)
    }
}

/// One favorite album, artist or track, or one track inside a playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub id: Identity,
    pub name: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
}

impl LibraryItem {
    pub fn new(id: impl Into<Identity>, name: impl Into<String>) -> Self {
        LibraryItem {
            id: id.into(),
            name: name.into(),
            artist: None,
            album: None,
            date_added: None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn added_at(mut self, date_added: DateTime<Utc>) -> Self {
        self.date_added = Some(date_added);
        self
    }

    pub fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or("Unknown Artist")
    }
}

/// One page of a listing whose entries are not all kept.
///
/// `served` counts every entry the service returned for the page, including
/// the ones that were dropped while converting (videos inside a playlist).
/// Paging must advance by `served`, never by `items.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub served: usize,
}

/// A playlist as listed in the account's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSummary {
    pub id: Identity,
    pub name: String,
    pub description: Option<String>,
    pub creator: Option<Identity>,
}

impl PlaylistSummary {
    /// A playlist is only owned when its creator is known and matches the user.
    pub fn is_owned_by(&self, user: &Identity) -> bool {
        self.creator.as_ref() == Some(user)
    }
}

/// A track entry inside an exported playlist document.
///
/// Older exports stored bare identities, newer ones store the identity next
/// to a human-readable description. Both shapes are read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackReference {
    Described {
        id: Identity,
        #[serde(alias = "description")]
        meta: String,
    },
    Bare(Identity),
}

impl TrackReference {
    pub fn id(&self) -> &Identity {
        match self {
            TrackReference::Described { id, .. } => id,
            TrackReference::Bare(id) => id,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TrackReference::Described { meta, .. } => Some(meta),
            TrackReference::Bare(_) => None,
        }
    }
}

/// A playlist as persisted in the playlist export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackReference>,
}

/// Outcome of a per-item loop (adds or removals) for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: usize,
    pub succeeded: usize,
}

impl Tally {
    pub fn new(total: usize) -> Self {
        Tally {
            total,
            succeeded: 0,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub albums: Option<usize>,
    pub artists: Option<usize>,
    pub tracks: Option<usize>,
    pub playlists: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloneTally {
    pub total: usize,
    pub created: usize,
    pub tracks_failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub albums: Option<Tally>,
    pub artists: Option<Tally>,
    pub tracks: Option<Tally>,
    pub playlists: Option<CloneTally>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaylistDeletion {
    pub total: usize,
    pub deleted: usize,
    pub unfollowed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub albums: Option<Tally>,
    pub artists: Option<Tally>,
    pub tracks: Option<Tally>,
    pub playlists: Option<PlaylistDeletion>,
}

#[derive(Tabled)]
pub struct ExportFileRow {
    pub category: String,
    pub file: String,
    pub entries: String,
}

#[derive(Tabled)]
pub struct SummaryRow {
    pub category: String,
    pub outcome: String,
}

impl SummaryRow {
    pub fn new(category: &str, outcome: String) -> Self {
        Self {
            category: category.to_string(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
    pub user_id: Identity,
    pub country_code: String,
}

// TIDAL v1 wire types

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub expires_in: u64,
    pub interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub user: Option<TokenUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUser {
    pub user_id: Identity,
    pub country_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub total_number_of_items: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteEntry<T> {
    pub created: Option<String>,
    pub item: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    pub created: Option<String>,
    pub playlist: WirePlaylist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub item: WireTrack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireArtist {
    pub id: Identity,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAlbumRef {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAlbum {
    pub id: Identity,
    pub title: String,
    pub artist: Option<WireArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTrack {
    pub id: Identity,
    pub title: String,
    pub artist: Option<WireArtist>,
    pub album: Option<WireAlbumRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireCreator {
    pub id: Option<Identity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePlaylist {
    pub uuid: Identity,
    pub title: String,
    pub description: Option<String>,
    pub creator: Option<WireCreator>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: Identity,
    pub country_code: String,
}
