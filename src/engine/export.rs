use crate::{
    engine::{Engine, fetcher::PLAYLIST_PAGE_SIZE},
    error::EngineError,
    management::{LineEntry, LineFile, PlaylistDocument},
    tidal::LibraryApi,
    types::{
        Account, Category, ExportReport, LibraryItem, PlaylistRecord, Selection, TrackReference,
    },
};

/// Description written next to an identity in a simple-category export.
///
/// # Example
///
/// ```ignore
/// let album = LibraryItem::new("123", "Album1").with_artist("Artist1");
/// assert_eq!(describe(Category::Albums, &album), "Album: Album1 | Artist: Artist1");
/// ```
pub fn describe(category: Category, item: &LibraryItem) -> String {
    match category {
        Category::Albums => format!(
            "Album: {} | Artist: {}",
            item.name,
            item.artist_or_unknown()
        ),
        Category::Artists => format!("Artist: {}", item.name),
        Category::Tracks => {
            let mut description =
                format!("Track: {} | Artist: {}", item.name, item.artist_or_unknown());
            if let Some(album) = &item.album {
                description.push_str(&format!(" | Album: {}", album));
            }
            description
        }
        Category::Playlists => format!("Playlist: {}", item.name),
    }
}

impl Engine {
    /// Writes every selected category of `source` to its export file.
    ///
    /// Categories run in the order albums, artists, tracks, playlists.
    /// Albums, artists and tracks are written oldest first as
    /// `<id> :: <description>` lines; playlists go to a JSON document with
    /// one described entry per track. Every description also lands in the
    /// metadata cache for a following import.
    ///
    /// # Arguments
    ///
    /// * `source` - The account to read from
    /// * `selection` - Categories to export
    ///
    /// # Returns
    ///
    /// - `Ok(ExportReport)` - Number of entries written per category, `None`
    ///   for categories not selected or skipped because their listing failed
    /// - `Err(EngineError::NotLoggedIn(Account::Source))` - Nothing was read
    /// - `Err(EngineError::Cancelled)` - Categories finished before the flag
    ///   was seen keep their files
    /// - `Err(EngineError::IoError(_))` - An export file could not be written
    ///
    /// # Example
    ///
    /// ```ignore
    /// let report = engine.export(&source, Selection::only(Category::Albums)).await?;
    /// println!("{} albums written", report.albums.unwrap_or(0));
    /// ```
    pub async fn export(
        &mut self,
        source: &dyn LibraryApi,
        selection: Selection,
    ) -> Result<ExportReport, EngineError> {
        if !source.is_logged_in().await {
            self.reporter.error("Source account not logged in!");
            return Err(EngineError::NotLoggedIn(Account::Source));
        }

        self.reporter.info("Starting Export...");
        let mut report = ExportReport::default();

        if selection.albums {
            report.albums = self.export_simple(source, Category::Albums).await?;
        }
        if selection.artists {
            report.artists = self.export_simple(source, Category::Artists).await?;
        }
        if selection.tracks {
            report.tracks = self.export_simple(source, Category::Tracks).await?;
        }
        if selection.playlists {
            report.playlists = self.export_playlists(source).await?;
        }

        self.reporter.success("Export Completed.");
        Ok(report)
    }

    /// Returns `Ok(None)` when the category listing could not be fetched.
    async fn export_simple(
        &mut self,
        source: &dyn LibraryApi,
        category: Category,
    ) -> Result<Option<usize>, EngineError> {
        self.reporter.info(format!("Exporting {}...", category.title()));

        let fetched = self
            .fetcher()
            .fetch_all(
                category.label(),
                source.count(category),
                |limit, offset| source.items(category, limit, offset),
            )
            .await;
        let mut items = match fetched {
            Ok(items) => items,
            Err(EngineError::RemoteError(e)) => {
                self.reporter
                    .error(format!("Skipping {}: {}", category.label(), e));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // oldest first, unknown dates before everything else
        items.sort_by_key(|item| item.date_added);

        let mut entries = Vec::with_capacity(items.len());
        for item in &items {
            let description = describe(category, item);
            self.cache.insert(item.id.clone(), description.clone());
            entries.push(LineEntry::new(item.id.clone(), description));
        }

        let file = LineFile::new(self.paths.category_file(category));
        file.persist(&entries).await?;

        self.reporter.success(format!(
            "Exported {} {}.",
            entries.len(),
            category.label()
        ));
        Ok(Some(entries.len()))
    }

    async fn export_playlists(
        &mut self,
        source: &dyn LibraryApi,
    ) -> Result<Option<usize>, EngineError> {
        self.reporter.info("Exporting Playlists...");

        let fetched = self
            .fetcher()
            .fetch_all(
                Category::Playlists.label(),
                source.count(Category::Playlists),
                |limit, offset| source.playlists(limit, offset),
            )
            .await;
        let playlists = match fetched {
            Ok(playlists) => playlists,
            Err(EngineError::RemoteError(e)) => {
                self.reporter.error(format!("Skipping playlists: {}", e));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let total = playlists.len();
        let mut records = Vec::with_capacity(total);

        for (index, playlist) in playlists.iter().enumerate() {
            self.cancel.check()?;
            self.reporter.progress(
                (index + 1) as u64,
                total as u64,
                format!("Scanning playlist: {}", playlist.name),
            );

            let fetched = self
                .fetcher()
                .with_page_size(PLAYLIST_PAGE_SIZE)
                .drain(|limit, offset| source.playlist_tracks(&playlist.id, limit, offset))
                .await;
            let tracks = match fetched {
                Ok(tracks) => tracks,
                Err(EngineError::Cancelled) => return Err(EngineError::Cancelled),
                Err(e) => {
                    self.reporter.warning(format!(
                        "Failed to fetch playlist {}: {}",
                        playlist.name, e
                    ));
                    continue;
                }
            };

            let mut references = Vec::with_capacity(tracks.len());
            for track in tracks {
                let meta = format!(
                    "{} - {}",
                    track.name,
                    track.artist.as_deref().unwrap_or("Unknown")
                );
                self.cache.insert(
                    track.id.clone(),
                    format!("Track in PL '{}': {}", playlist.name, meta),
                );
                references.push(TrackReference::Described { id: track.id, meta });
            }

            records.push(PlaylistRecord {
                name: playlist.name.clone(),
                description: playlist.description.clone(),
                tracks: references,
            });
        }

        PlaylistDocument::new(self.paths.playlists_file())
            .persist(&records)
            .await?;

        self.reporter
            .success(format!("Exported {} playlists.", records.len()));
        Ok(Some(records.len()))
    }
}
