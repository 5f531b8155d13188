#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Mutex,
};

use async_trait::async_trait;
use tidalshift::{
    Res,
    engine::{CancelToken, Engine, Event, Level, Reporter},
    management::LibraryPaths,
    tidal::LibraryApi,
    types::{Category, Identity, LibraryItem, Page, PlaylistSummary},
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Everything the fake account holds, plus a record of every call made to it.
#[derive(Default)]
pub struct State {
    pub logged_in: bool,
    pub user: Option<Identity>,

    pub favorites: HashMap<Category, Vec<LibraryItem>>,
    pub playlists: Vec<PlaylistSummary>,
    /// `None` entries stand for videos, which are listed but never kept.
    pub playlist_tracks: HashMap<Identity, Vec<Option<LibraryItem>>>,

    /// Overrides the count reported for a category.
    pub reported_counts: HashMap<Category, usize>,
    pub failing_counts: HashSet<Category>,
    pub failing_listings: HashSet<Category>,
    pub failing_playlists: HashSet<Identity>,
    pub rejected_adds: HashSet<Identity>,
    pub rejected_removals: HashSet<Identity>,
    pub rejected_tracks: HashSet<Identity>,
    pub failing_creates: HashSet<String>,

    pub page_requests: Vec<(Category, usize, usize)>,
    pub playlist_requests: Vec<(Identity, usize)>,
    pub added: Vec<(Category, Identity)>,
    pub removed: Vec<(Category, Identity)>,
    pub deleted_playlists: Vec<Identity>,
    pub created: Vec<(Identity, String, String)>,
    pub track_adds: Vec<(Identity, Vec<Identity>)>,
    pub playlist_contents: HashMap<Identity, Vec<Identity>>,
}

pub struct FakeLibrary {
    pub state: Mutex<State>,
    cancel_after_first_page: Option<CancelToken>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                logged_in: true,
                ..State::default()
            }),
            cancel_after_first_page: None,
        }
    }

    pub fn logged_out() -> Self {
        let fake = Self::new();
        fake.state.lock().unwrap().logged_in = false;
        fake
    }

    /// Raises `token` right after the first listing page has been served.
    pub fn cancelling(mut self, token: CancelToken) -> Self {
        self.cancel_after_first_page = Some(token);
        self
    }

    pub fn with_favorites(self, category: Category, items: Vec<LibraryItem>) -> Self {
        self.state.lock().unwrap().favorites.insert(category, items);
        self
    }

    pub fn with_playlist(self, summary: PlaylistSummary, tracks: Vec<LibraryItem>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .playlist_tracks
                .insert(summary.id.clone(), tracks.into_iter().map(Some).collect());
            state.playlists.push(summary);
        }
        self
    }

    /// Inserts a video entry at `position` of an existing playlist.
    pub fn with_video_at(self, playlist: &str, position: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .playlist_tracks
            .entry(Identity::new(playlist))
            .or_default()
            .insert(position, None);
        self
    }

    pub fn with_user(self, user: impl Into<Identity>) -> Self {
        self.state.lock().unwrap().user = Some(user.into());
        self
    }

    pub fn added(&self, category: Category) -> Vec<Identity> {
        self.state
            .lock()
            .unwrap()
            .added
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, id)| id.clone())
            .collect()
    }

    fn after_page(&self) {
        if let Some(token) = &self.cancel_after_first_page {
            token.cancel();
        }
    }
}

#[async_trait]
impl LibraryApi for FakeLibrary {
    async fn is_logged_in(&self) -> bool {
        self.state.lock().unwrap().logged_in
    }

    async fn user_id(&self) -> Res<Identity> {
        self.state
            .lock()
            .unwrap()
            .user
            .clone()
            .ok_or_else(|| "session expired".into())
    }

    async fn count(&self, category: Category) -> Res<usize> {
        let state = self.state.lock().unwrap();
        if state.failing_counts.contains(&category) {
            return Err("count unavailable".into());
        }
        if let Some(count) = state.reported_counts.get(&category) {
            return Ok(*count);
        }
        Ok(match category {
            Category::Playlists => state.playlists.len(),
            _ => state.favorites.get(&category).map_or(0, Vec::len),
        })
    }

    async fn items(
        &self,
        category: Category,
        limit: usize,
        offset: usize,
    ) -> Res<Vec<LibraryItem>> {
        let page = {
            let mut state = self.state.lock().unwrap();
            state.page_requests.push((category, limit, offset));
            if state.failing_listings.contains(&category) {
                return Err("503 service unavailable".into());
            }
            state
                .favorites
                .get(&category)
                .map(|items| items.iter().skip(offset).take(limit).cloned().collect())
                .unwrap_or_default()
        };
        self.after_page();
        Ok(page)
    }

    async fn playlists(&self, limit: usize, offset: usize) -> Res<Vec<PlaylistSummary>> {
        let page = {
            let mut state = self.state.lock().unwrap();
            state
                .page_requests
                .push((Category::Playlists, limit, offset));
            if state.failing_listings.contains(&Category::Playlists) {
                return Err("503 service unavailable".into());
            }
            state
                .playlists
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect()
        };
        self.after_page();
        Ok(page)
    }

    async fn playlist_tracks(
        &self,
        playlist: &Identity,
        limit: usize,
        offset: usize,
    ) -> Res<Page<LibraryItem>> {
        let mut state = self.state.lock().unwrap();
        state.playlist_requests.push((playlist.clone(), offset));
        if state.failing_playlists.contains(playlist) {
            return Err(format!("playlist {} is unavailable", playlist).into());
        }
        let entries: Vec<Option<LibraryItem>> = state
            .playlist_tracks
            .get(playlist)
            .map(|tracks| tracks.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(Page {
            served: entries.len(),
            items: entries.into_iter().flatten().collect(),
        })
    }

    async fn add(&self, category: Category, id: &Identity) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state.added.push((category, id.clone()));
        if state.rejected_adds.contains(id) {
            return Err("404 not found".into());
        }
        Ok(())
    }

    async fn remove(&self, category: Category, id: &Identity) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        if state.rejected_removals.contains(id) {
            return Err("403 forbidden".into());
        }
        state.removed.push((category, id.clone()));
        Ok(())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Res<Identity> {
        let mut state = self.state.lock().unwrap();
        if state.failing_creates.contains(name) {
            return Err("playlist limit reached".into());
        }
        let id = Identity::new(format!("new-{}", state.created.len() + 1));
        state
            .created
            .push((id.clone(), name.to_string(), description.to_string()));
        Ok(id)
    }

    async fn add_playlist_tracks(&self, playlist: &Identity, tracks: &[Identity]) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        state.track_adds.push((playlist.clone(), tracks.to_vec()));
        if let Some(bad) = tracks.iter().find(|id| state.rejected_tracks.contains(*id)) {
            return Err(format!("track {} is not available", bad).into());
        }
        state
            .playlist_contents
            .entry(playlist.clone())
            .or_default()
            .extend(tracks.iter().cloned());
        Ok(())
    }

    async fn delete_playlist(&self, playlist: &Identity) -> Res<()> {
        let mut state = self.state.lock().unwrap();
        if state.rejected_removals.contains(playlist) {
            return Err("403 forbidden".into());
        }
        state.deleted_playlists.push(playlist.clone());
        Ok(())
    }
}

/// An engine rooted at `dir` with a fresh failure log.
pub async fn engine(dir: &Path) -> (Engine, UnboundedReceiver<Event>) {
    engine_with_cancel(dir, CancelToken::new()).await
}

pub async fn engine_with_cancel(
    dir: &Path,
    cancel: CancelToken,
) -> (Engine, UnboundedReceiver<Event>) {
    let (reporter, events) = Reporter::channel();
    let engine = Engine::new(LibraryPaths::new(dir), reporter, cancel);
    engine.start_session().await.unwrap();
    (engine, events)
}

/// Log messages received so far at `level`.
pub fn messages(events: &mut UnboundedReceiver<Event>, level: Level) -> Vec<String> {
    let mut found = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Event::Log { level: l, message } = event {
            if l == level {
                found.push(message);
            }
        }
    }
    found
}

pub fn album(id: &str, name: &str, artist: &str) -> LibraryItem {
    LibraryItem::new(id, name).with_artist(artist)
}

pub fn track(id: &str, name: &str, artist: &str) -> LibraryItem {
    LibraryItem::new(id, name).with_artist(artist)
}

pub fn playlist(id: &str, name: &str, creator: Option<Identity>) -> PlaylistSummary {
    PlaylistSummary {
        id: Identity::new(id),
        name: name.to_string(),
        description: None,
        creator,
    }
}
