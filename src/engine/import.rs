use crate::{
    engine::Engine,
    error::EngineError,
    management::LineFile,
    tidal::LibraryApi,
    types::{Account, Category, ImportReport, Selection, Tally},
};

impl Engine {
    /// Re-adds every selected category from its export file to `destination`.
    ///
    /// Simple categories are added one identity at a time, in file order;
    /// playlists are cloned. Categories run in the order albums, artists,
    /// playlists, tracks. A missing or unreadable export file skips only its
    /// category.
    ///
    /// # Arguments
    ///
    /// * `destination` - The account to write to
    /// * `selection` - Categories to import
    ///
    /// # Returns
    ///
    /// - `Ok(ImportReport)` - Per-category tallies; failed adds are recorded
    ///   in the failure log with the best description the cache has
    /// - `Err(EngineError::NotLoggedIn(Account::Destination))` - Nothing was
    ///   added
    /// - `Err(EngineError::Cancelled)` - Adds made so far are kept
    ///
    /// # Example
    ///
    /// ```ignore
    /// let report = engine.import(&destination, Selection::all()).await?;
    /// if let Some(tracks) = report.tracks {
    ///     println!("{}/{} tracks added", tracks.succeeded, tracks.total);
    /// }
    /// ```
    pub async fn import(
        &mut self,
        destination: &dyn LibraryApi,
        selection: Selection,
    ) -> Result<ImportReport, EngineError> {
        if !destination.is_logged_in().await {
            self.reporter.error("Destination account not logged in!");
            return Err(EngineError::NotLoggedIn(Account::Destination));
        }

        self.reporter.info("Starting Import...");
        let mut report = ImportReport::default();

        if selection.albums {
            report.albums = self.import_simple(destination, Category::Albums).await?;
        }
        if selection.artists {
            report.artists = self.import_simple(destination, Category::Artists).await?;
        }
        if selection.playlists {
            report.playlists = self.clone_playlists(destination).await?;
        }
        if selection.tracks {
            report.tracks = self.import_simple(destination, Category::Tracks).await?;
        }

        self.reporter.success("Import Completed.");
        Ok(report)
    }

    async fn import_simple(
        &mut self,
        destination: &dyn LibraryApi,
        category: Category,
    ) -> Result<Option<Tally>, EngineError> {
        let file = LineFile::new(self.paths.category_file(category));
        let entries = match file.load().await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                self.reporter.warning(format!(
                    "File {} not found. Skipping {}.",
                    file.path().display(),
                    category.label()
                ));
                return Ok(None);
            }
            Err(e) => {
                self.reporter.error(format!(
                    "Could not read {}: {}. Skipping {}.",
                    file.path().display(),
                    e,
                    category.label()
                ));
                return Ok(None);
            }
        };

        // repopulates the cache on import-only runs
        for entry in &entries {
            if let Some(description) = &entry.description {
                self.cache.insert(entry.id.clone(), description.clone());
            }
        }

        let mut tally = Tally::new(entries.len());
        self.reporter
            .info(format!("Adding {} {}...", tally.total, category.label()));

        for (index, entry) in entries.iter().enumerate() {
            self.cancel.check()?;
            self.reporter.progress(
                (index + 1) as u64,
                tally.total as u64,
                format!("Adding {}: {}/{}", category.label(), index + 1, tally.total),
            );

            match destination.add(category, &entry.id).await {
                Ok(()) => tally.succeeded += 1,
                Err(e) => {
                    let description = self.cache.describe_or(&entry.id, || {
                        format!("ID: {} (no metadata)", entry.id)
                    });
                    self.record_failure(&description, &e).await;
                }
            }
        }

        self.reporter.success(format!(
            "Added {}/{} {}.",
            tally.succeeded,
            tally.total,
            category.label()
        ));
        Ok(Some(tally))
    }
}
