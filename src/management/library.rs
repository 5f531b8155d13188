use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use crate::{
    error::EngineError,
    types::{Category, Identity, PlaylistRecord},
};

pub const SEPARATOR: &str = " :: ";

pub const ALBUMS_FILE: &str = "album_id_list.txt";
pub const ARTISTS_FILE: &str = "artist_id_list.txt";
pub const TRACKS_FILE: &str = "track_id_list.txt";
pub const PLAYLISTS_FILE: &str = "playlists_export.json";
pub const FAILURES_FILE: &str = "failed_items.txt";

/// Locations of every file the engine reads or writes, relative to one root.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    root: PathBuf,
}

impl LibraryPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn category_file(&self, category: Category) -> PathBuf {
        let name = match category {
            Category::Albums => ALBUMS_FILE,
            Category::Artists => ARTISTS_FILE,
            Category::Tracks => TRACKS_FILE,
            Category::Playlists => PLAYLISTS_FILE,
        };
        self.root.join(name)
    }

    pub fn playlists_file(&self) -> PathBuf {
        self.category_file(Category::Playlists)
    }

    pub fn failures_file(&self) -> PathBuf {
        self.root.join(FAILURES_FILE)
    }
}

/// One line of a simple-category export: `<identity> :: <description>`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEntry {
    pub id: Identity,
    pub description: Option<String>,
}

impl LineEntry {
    pub fn new(id: impl Into<Identity>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: Some(description.into()),
        }
    }

    pub fn bare(id: impl Into<Identity>) -> Self {
        Self {
            id: id.into(),
            description: None,
        }
    }

    /// Parses a single line. Blank lines yield `None`; a line without the
    /// separator is an identity-only entry written by older exports.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line.split_once(SEPARATOR) {
            Some((id, description)) => Some(Self::new(id, description.trim())),
            None => Some(Self::bare(line)),
        }
    }

    pub fn to_line(&self) -> String {
        match &self.description {
            Some(description) => format!("{}{}{}", self.id, SEPARATOR, description),
            None => self.id.to_string(),
        }
    }
}

pub fn parse_lines(content: &str) -> Vec<LineEntry> {
    content.lines().filter_map(LineEntry::parse).collect()
}

/// A simple-category export file (albums, artists or tracks).
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the whole file, so stale lines from a previous export of the
    /// same category never survive.
    pub async fn persist(&self, entries: &[LineEntry]) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let mut content = String::new();
        for entry in entries {
            content.push_str(&entry.to_line());
            content.push('\n');
        }
        async_fs::write(&self.path, content).await
    }

    /// Returns `Ok(None)` when the file does not exist.
    pub async fn load(&self) -> Result<Option<Vec<LineEntry>>, Error> {
        match async_fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(parse_lines(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// The structured playlist export document.
pub struct PlaylistDocument {
    path: PathBuf,
}

impl PlaylistDocument {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn persist(&self, playlists: &[PlaylistRecord]) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(playlists)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn load(&self) -> Result<Option<Vec<PlaylistRecord>>, EngineError> {
        let json = match async_fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EngineError::IoError(e)),
        };

        Ok(Some(serde_json::from_str(&json)?))
    }
}
