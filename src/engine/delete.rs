use crate::{
    engine::Engine,
    error::EngineError,
    tidal::LibraryApi,
    types::{
        Account, Category, DeleteReport, LibraryItem, PlaylistDeletion, PlaylistSummary, Selection,
        Tally,
    },
};

impl Engine {
    /// Removes every selected category from `account`.
    ///
    /// Favorites are removed item by item. Playlists the user created are
    /// deleted outright; any other playlist, including one whose creator is
    /// unknown, is only unfollowed.
    ///
    /// # Arguments
    ///
    /// * `account` - The account to clean
    /// * `selection` - Categories to remove, in the order albums, artists,
    ///   tracks, playlists
    ///
    /// # Returns
    ///
    /// - `Ok(DeleteReport)` - Per-category tallies; failed removals are
    ///   recorded in the failure log
    /// - `Err(EngineError::NotLoggedIn(Account::Source))` - Nothing was
    ///   removed
    /// - `Err(EngineError::Cancelled)` - Removals made so far stay removed
    ///
    /// # Example
    ///
    /// ```ignore
    /// let report = engine
    ///     .delete(&source, Selection::only(Category::Playlists))
    ///     .await?;
    /// if let Some(playlists) = report.playlists {
    ///     println!("{} deleted, {} unfollowed", playlists.deleted, playlists.unfollowed);
    /// }
    /// ```
    pub async fn delete(
        &mut self,
        account: &dyn LibraryApi,
        selection: Selection,
    ) -> Result<DeleteReport, EngineError> {
        if !account.is_logged_in().await {
            self.reporter
                .error("Account not logged in! Please login to the account you want to clean.");
            return Err(EngineError::NotLoggedIn(Account::Source));
        }

        self.reporter.info("Starting Deletion...");
        let mut report = DeleteReport::default();

        if selection.albums {
            report.albums = self.delete_simple(account, Category::Albums).await?;
        }
        if selection.artists {
            report.artists = self.delete_simple(account, Category::Artists).await?;
        }
        if selection.tracks {
            report.tracks = self.delete_simple(account, Category::Tracks).await?;
        }
        if selection.playlists {
            report.playlists = self.delete_playlists(account).await?;
        }

        self.reporter.success("Deletion Completed.");
        Ok(report)
    }

    async fn delete_simple(
        &mut self,
        account: &dyn LibraryApi,
        category: Category,
    ) -> Result<Option<Tally>, EngineError> {
        let fetched = self
            .fetcher()
            .fetch_all(
                category.label(),
                account.count(category),
                |limit, offset| account.items(category, limit, offset),
            )
            .await;
        let items: Vec<LibraryItem> = match fetched {
            Ok(items) => items,
            Err(EngineError::RemoteError(e)) => {
                self.reporter
                    .error(format!("Skipping {}: {}", category.label(), e));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let mut tally = Tally::new(items.len());
        if items.is_empty() {
            return Ok(Some(tally));
        }

        self.reporter
            .info(format!("Deleting {} {}...", tally.total, category.label()));

        for (index, item) in items.iter().enumerate() {
            self.cancel.check()?;
            self.reporter.progress(
                (index + 1) as u64,
                tally.total as u64,
                format!("Deleting {}: {}", category.label(), item.name),
            );

            match account.remove(category, &item.id).await {
                Ok(()) => tally.succeeded += 1,
                Err(e) => {
                    let description = format!(
                        "Could not remove {} '{}' (ID: {})",
                        category.label(),
                        item.name,
                        item.id
                    );
                    self.record_failure(&description, &e).await;
                }
            }
        }

        self.reporter.success(format!(
            "Removed {}/{} {}.",
            tally.succeeded,
            tally.total,
            category.label()
        ));
        Ok(Some(tally))
    }

    async fn delete_playlists(
        &mut self,
        account: &dyn LibraryApi,
    ) -> Result<Option<PlaylistDeletion>, EngineError> {
        let fetched = self
            .fetcher()
            .fetch_all(
                Category::Playlists.label(),
                account.count(Category::Playlists),
                |limit, offset| account.playlists(limit, offset),
            )
            .await;
        let playlists: Vec<PlaylistSummary> = match fetched {
            Ok(playlists) => playlists,
            Err(EngineError::RemoteError(e)) => {
                self.reporter.error(format!("Skipping playlists: {}", e));
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let mut outcome = PlaylistDeletion {
            total: playlists.len(),
            ..PlaylistDeletion::default()
        };
        if playlists.is_empty() {
            return Ok(Some(outcome));
        }

        // without a known user nothing is provably owned
        let user = match account.user_id().await {
            Ok(user) => Some(user),
            Err(e) => {
                self.reporter.warning(format!(
                    "Could not determine the current user, playlists will only be unfollowed: {}",
                    e
                ));
                None
            }
        };

        self.reporter
            .info(format!("Processing {} playlists...", outcome.total));

        for (index, playlist) in playlists.iter().enumerate() {
            self.cancel.check()?;
            self.reporter.progress(
                (index + 1) as u64,
                outcome.total as u64,
                format!("Processing playlist: {}", playlist.name),
            );

            let owned = user.as_ref().is_some_and(|u| playlist.is_owned_by(u));
            let result = if owned {
                account.delete_playlist(&playlist.id).await
            } else {
                account.remove(Category::Playlists, &playlist.id).await
            };

            match result {
                Ok(()) if owned => outcome.deleted += 1,
                Ok(()) => outcome.unfollowed += 1,
                Err(e) => {
                    let description = format!("Playlist: {} (ID: {})", playlist.name, playlist.id);
                    self.record_failure(&description, &e).await;
                }
            }
        }

        self.reporter.success(format!(
            "Playlists: {} deleted, {} unfollowed.",
            outcome.deleted, outcome.unfollowed
        ));
        Ok(Some(outcome))
    }
}
