use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ETAG, IF_NONE_MATCH},
};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    Res, config,
    management::TokenManager,
    tidal::LibraryApi,
    types::{
        Account, Category, FavoriteEntry, Identity, LibraryItem, Page, PagedResponse,
        PlaylistEntry, PlaylistItemEntry, PlaylistSummary, SessionInfo, WireAlbum, WireArtist,
        WirePlaylist, WireTrack,
    },
    utils,
};

/// [`LibraryApi`] over the TIDAL v1 REST API for one logged-in account.
///
/// Each request carries a bearer token from the account's cached
/// [`TokenManager`], refreshed shortly before it expires, and the account's
/// `countryCode`. Favorites live under `users/{id}/favorites/...`, the
/// playlist collection under `users/{id}/playlistsAndFavoritePlaylists`.
///
/// # Retry Logic
///
/// - `502 Bad Gateway` is retried after 10 seconds, indefinitely
/// - `429 Too Many Requests` is retried after the advertised `Retry-After`
///   as long as it does not exceed [`utils::MAX_RETRY_AFTER`]; a longer wait
///   fails the request so the engine can record it and move on
///
/// # Example
///
/// ```ignore
/// let source = TidalClient::connect(Account::Source).await?;
/// let mut engine = Engine::new(paths, reporter, cancel);
/// let report = engine.export(&source, Selection::all()).await?;
/// ```
pub struct TidalClient {
    http: Client,
    api_url: String,
    user_id: Identity,
    country_code: String,
    tokens: Mutex<TokenManager>,
}

impl TidalClient {
    /// Builds a client from the cached token of `account`.
    ///
    /// # Arguments
    ///
    /// * `account` - Which of the two logged-in accounts to act on
    ///
    /// # Returns
    ///
    /// - `Ok(TidalClient)` - Ready to use; no request has been sent yet
    /// - `Err(String)` - No readable token cache exists for the account, in
    ///   which case the user has to run `tidalshift login` first
    pub async fn connect(account: Account) -> Result<Self, String> {
        let tokens = TokenManager::load(account).await?;
        Ok(Self::new(config::tidal_api_url(), tokens))
    }

    /// Builds a client against `api_url` acting as the owner of `tokens`.
    ///
    /// The user identity and country code are taken from the token, so no
    /// session request is needed before the first call.
    pub fn new(api_url: impl Into<String>, tokens: TokenManager) -> Self {
        let token = tokens.current_token();
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            user_id: token.user_id.clone(),
            country_code: token.country_code.clone(),
            tokens: Mutex::new(tokens),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn favorites_path(&self, category: Category) -> String {
        let segment = match category {
            Category::Albums => "albums",
            Category::Artists => "artists",
            Category::Tracks => "tracks",
            Category::Playlists => "playlists",
        };
        format!("users/{}/favorites/{}", self.user_id, segment)
    }

    /// Sends a request with a fresh bearer token and the account's country
    /// code. 502 responses are retried after 10 seconds, 429 responses after
    /// the advertised `Retry-After` unless it is abnormally long.
    ///
    /// `build` is called again for every attempt since a `RequestBuilder`
    /// cannot be replayed.
    async fn send<F>(&self, build: F) -> Res<Response>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        loop {
            let token = self.tokens.lock().await.get_valid_token().await;
            let response = build(&self.http)
                .bearer_auth(token)
                .query(&[("countryCode", self.country_code.as_str())])
                .send()
                .await?;

            match response.status() {
                StatusCode::BAD_GATEWAY => {
                    sleep(Duration::from_secs(10)).await;
                    continue; // retry
                }
                StatusCode::TOO_MANY_REQUESTS => match utils::retry_after(response.headers()) {
                    Some(wait) if wait <= utils::MAX_RETRY_AFTER => {
                        sleep(wait).await;
                        continue;
                    }
                    Some(wait) => {
                        return Err(format!(
                            "rate limited, Retry-After of {} seconds exceeds the {} second limit",
                            wait.as_secs(),
                            utils::MAX_RETRY_AFTER.as_secs()
                        )
                        .into());
                    }
                    None => {}
                },
                _ => {}
            }

            return Ok(response.error_for_status()?);
        }
    }

    async fn page<T>(&self, path: &str, limit: usize, offset: usize) -> Res<PagedResponse<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .send(|http| {
                http.get(&url).query(&[
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ])
            })
            .await?;
        Ok(response.json::<PagedResponse<T>>().await?)
    }

    fn playlists_path(&self) -> String {
        format!("users/{}/playlistsAndFavoritePlaylists", self.user_id)
    }
}

fn album_item(entry: FavoriteEntry<WireAlbum>) -> LibraryItem {
    LibraryItem {
        id: entry.item.id,
        name: entry.item.title,
        artist: entry.item.artist.map(|a| a.name),
        album: None,
        date_added: entry.created.as_deref().and_then(utils::parse_tidal_timestamp),
    }
}

fn artist_item(entry: FavoriteEntry<WireArtist>) -> LibraryItem {
    LibraryItem {
        id: entry.item.id,
        name: entry.item.name,
        artist: None,
        album: None,
        date_added: entry.created.as_deref().and_then(utils::parse_tidal_timestamp),
    }
}

fn track_item(track: WireTrack, created: Option<&str>) -> LibraryItem {
    LibraryItem {
        id: track.id,
        name: track.title,
        artist: track.artist.map(|a| a.name),
        album: track.album.map(|a| a.title),
        date_added: created.and_then(utils::parse_tidal_timestamp),
    }
}

fn playlist_summary(playlist: WirePlaylist) -> PlaylistSummary {
    PlaylistSummary {
        id: playlist.uuid,
        name: playlist.title,
        description: playlist.description,
        creator: playlist.creator.and_then(|c| c.id),
    }
}

#[async_trait]
impl LibraryApi for TidalClient {
    async fn is_logged_in(&self) -> bool {
        let url = self.url("sessions");
        match self.send(|http| http.get(&url)).await {
            Ok(response) => response.json::<SessionInfo>().await.is_ok(),
            Err(_) => false,
        }
    }

    async fn user_id(&self) -> Res<Identity> {
        let url = self.url("sessions");
        let session = self
            .send(|http| http.get(&url))
            .await?
            .json::<SessionInfo>()
            .await?;
        Ok(session.user_id)
    }

    async fn count(&self, category: Category) -> Res<usize> {
        let path = match category {
            Category::Playlists => self.playlists_path(),
            _ => self.favorites_path(category),
        };
        let page = self.page::<serde_json::Value>(&path, 1, 0).await?;
        Ok(page.total_number_of_items as usize)
    }

    async fn items(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> Res<Vec<LibraryItem>> {
        let path = self.favorites_path(category);
        let items: Vec<LibraryItem> = match category {
            Category::Albums => self
                .page::<FavoriteEntry<WireAlbum>>(&path, limit, offset)
                .await?
                .items
                .into_iter()
                .map(album_item)
                .collect(),
            Category::Artists => self
                .page::<FavoriteEntry<WireArtist>>(&path, limit, offset)
                .await?
                .items
                .into_iter()
                .map(artist_item)
                .collect(),
            Category::Tracks => self
                .page::<FavoriteEntry<WireTrack>>(&path, limit, offset)
                .await?
                .items
                .into_iter()
                .map(|entry| track_item(entry.item, entry.created.as_deref()))
                .collect(),
            Category::Playlists => {
                return Err("playlists are listed through LibraryApi::playlists".into());
            }
        };
        Ok(items)
    }

    async fn playlists(&self, limit: usize, offset: usize) -> Res<Vec<PlaylistSummary>> {
        let page = self
            .page::<PlaylistEntry>(&self.playlists_path(), limit, offset)
            .await?;
        Ok(page
            .items
            .into_iter()
            .map(|entry| playlist_summary(entry.playlist))
            .collect())
    }

    async fn playlist_tracks(
        &self,
        playlist: &Identity,
        limit: usize,
        offset: usize,
    ) -> Res<Page<LibraryItem>> {
        let path = format!("playlists/{}/items", playlist);
        let page = self
            .page::<PlaylistItemEntry>(&path, limit, offset)
            .await?;

        // videos share the item list with tracks
        let served = page.items.len();
        let items = page
            .items
            .into_iter()
            .filter(|entry| entry.kind == "track")
            .map(|entry| track_item(entry.item, None))
            .collect();
        Ok(Page { items, served })
    }

    async fn add(&self, category: Category, id: &Identity) -> Res<()> {
        let field = match category {
            Category::Albums => "albumIds",
            Category::Artists => "artistIds",
            Category::Tracks => "trackIds",
            Category::Playlists => "uuids",
        };
        let url = self.url(&self.favorites_path(category));
        self.send(|http| http.post(&url).form(&[(field, id.as_str())]))
            .await?;
        Ok(())
    }

    async fn remove(&self, category: Category, id: &Identity) -> Res<()> {
        let url = self.url(&format!("{}/{}", self.favorites_path(category), id));
        self.send(|http| http.delete(&url)).await?;
        Ok(())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Res<Identity> {
        let url = self.url(&format!("users/{}/playlists", self.user_id));
        let playlist = self
            .send(|http| {
                http.post(&url)
                    .form(&[("title", name), ("description", description)])
            })
            .await?
            .json::<WirePlaylist>()
            .await?;
        Ok(playlist.uuid)
    }

    async fn add_playlist_tracks(&self, playlist: &Identity, tracks: &[Identity]) -> Res<()> {
        // modifications must carry the playlist's current ETag
        let url = self.url(&format!("playlists/{}", playlist));
        let response = self.send(|http| http.get(&url)).await?;
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or("playlist response carried no ETag")?;

        let ids = tracks
            .iter()
            .map(Identity::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let items_url = self.url(&format!("playlists/{}/items", playlist));
        self.send(|http| {
            http.post(&items_url)
                .header(IF_NONE_MATCH, etag.as_str())
                .form(&[
                    ("trackIds", ids.as_str()),
                    ("onArtifactNotFound", "FAIL"),
                    ("onDupes", "FAIL"),
                ])
        })
        .await?;
        Ok(())
    }

    async fn delete_playlist(&self, playlist: &Identity) -> Res<()> {
        let url = self.url(&format!("playlists/{}", playlist));
        self.send(|http| http.delete(&url)).await?;
        Ok(())
    }
}
