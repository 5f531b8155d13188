//! # TIDAL Integration Module
//!
//! The engine never talks HTTP. It consumes the [`LibraryApi`] capability set
//! below, which is implemented for the TIDAL v1 REST API by
//! [`client::TidalClient`] and by in-memory fakes in the test suite.
//!
//! ```text
//! Engine (export, import, clone, delete)
//!          ↓
//! LibraryApi (count, page, add, remove, playlists)
//!          ↓
//! TidalClient (reqwest, bearer token, retries)
//!          ↓
//! TIDAL v1 REST API
//! ```
//!
//! [`auth`] implements the device-code login that produces the cached
//! tokens the client runs on.

pub mod auth;
pub mod client;

use async_trait::async_trait;

use crate::{
    Res,
    types::{Category, Identity, LibraryItem, Page, PlaylistSummary},
};

/// Everything the engine needs from one account on the remote service.
///
/// Every call is a suspension point. Implementations may fail any call;
/// the engine decides whether that failure is per-item or fatal.
///
/// # Paging
///
/// Listing methods take a `limit` and an `offset` counted in service-side
/// entries. The engine asks for the next page at `offset + served`, so an
/// implementation that drops entries while converting them must still
/// report how many it was served (see [`Page`]).
///
/// # Example
///
/// ```ignore
/// async fn favorite_album_count(api: &dyn LibraryApi) -> Res<usize> {
///     api.count(Category::Albums).await
/// }
/// ```
#[async_trait]
pub trait LibraryApi: Send + Sync {
    /// Whether the session behind this account is valid.
    ///
    /// Never fails: any error while checking the session counts as "not
    /// logged in". Export, import and delete refuse to start without it.
    async fn is_logged_in(&self) -> bool;

    /// Identity of the acting user, compared against playlist creators.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)` - The user the session belongs to
    /// - `Err(_)` - The session could not be resolved; the caller treats no
    ///   playlist as owned
    async fn user_id(&self) -> Res<Identity>;

    /// Number of items in a category, playlists included.
    ///
    /// The count is advisory. Paging also stops at the first empty page, so
    /// an overstated count costs one extra request and nothing more.
    async fn count(&self, category: Category) -> Res<usize>;

    /// One page of favorite albums, artists or tracks.
    ///
    /// # Arguments
    ///
    /// * `category` - Albums, artists or tracks; playlists are listed through
    ///   [`LibraryApi::playlists`]
    /// * `limit` - Maximum number of entries to return
    /// * `offset` - Position of the first entry
    ///
    /// # Returns
    ///
    /// The items of the page, possibly fewer than `limit`. An empty page
    /// means the collection is exhausted.
    async fn items(&self, category: Category, limit: usize, offset: usize)
    -> Res<Vec<LibraryItem>>;

    /// One page of the playlists in the account's collection, both created
    /// and followed ones.
    async fn playlists(&self, limit: usize, offset: usize) -> Res<Vec<PlaylistSummary>>;

    /// One page of the tracks inside a playlist.
    ///
    /// # Arguments
    ///
    /// * `playlist` - Identity of the playlist
    /// * `limit` - Maximum number of entries to return
    /// * `offset` - Position of the first entry, counted over every entry of
    ///   the playlist including non-track ones
    ///
    /// # Returns
    ///
    /// A [`Page`] holding the tracks of the page. `served` counts every entry
    /// returned by the service, so a page made only of videos has no items
    /// but a non-zero `served`. A `served` of zero ends the listing.
    async fn playlist_tracks(
        &self,
        playlist: &Identity,
        limit: usize,
        offset: usize,
    ) -> Res<Page<LibraryItem>>;

    /// Adds an item to the favorites of a category.
    async fn add(&self, category: Category, id: &Identity) -> Res<()>;

    /// Removes an item from the favorites of a category. For playlists this
    /// unfollows without deleting.
    async fn remove(&self, category: Category, id: &Identity) -> Res<()>;

    /// Creates an empty playlist owned by the acting user.
    ///
    /// # Returns
    ///
    /// The identity of the new playlist, used for subsequent track adds.
    async fn create_playlist(&self, name: &str, description: &str) -> Res<Identity>;

    /// Appends tracks to a playlist in one call.
    ///
    /// The call is all-or-nothing from the engine's point of view: any error
    /// makes the engine retry the tracks one at a time.
    async fn add_playlist_tracks(&self, playlist: &Identity, tracks: &[Identity]) -> Res<()>;

    /// Deletes the playlist resource itself. Only valid for playlists the
    /// acting user created.
    async fn delete_playlist(&self, playlist: &Identity) -> Res<()>;
}
