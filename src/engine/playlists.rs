use crate::{
    engine::Engine,
    error::EngineError,
    management::PlaylistDocument,
    tidal::LibraryApi,
    types::{CloneTally, Identity, PlaylistRecord, TrackReference},
};

impl Engine {
    /// Recreates every playlist of the export document on `destination`.
    pub(crate) async fn clone_playlists(
        &mut self,
        destination: &dyn LibraryApi,
    ) -> Result<Option<CloneTally>, EngineError> {
        let document = PlaylistDocument::new(self.paths.playlists_file());
        let records = match document.load().await {
            Ok(Some(records)) => records,
            Ok(None) => {
                self.reporter.warning(format!(
                    "Playlists export file {} not found. Skipping playlists.",
                    document.path().display()
                ));
                return Ok(None);
            }
            Err(e) => {
                self.reporter.error(format!(
                    "Could not read {}: {}. Skipping playlists.",
                    document.path().display(),
                    e
                ));
                return Ok(None);
            }
        };

        let mut tally = CloneTally {
            total: records.len(),
            ..CloneTally::default()
        };
        self.reporter
            .info(format!("Cloning {} playlists...", tally.total));

        for (index, record) in records.iter().enumerate() {
            self.cancel.check()?;
            self.reporter.progress(
                (index + 1) as u64,
                tally.total as u64,
                format!("Cloning playlist: {}", record.name),
            );
            self.clone_playlist(destination, record, &mut tally).await?;
        }

        self.reporter.success(format!(
            "Cloned {}/{} playlists.",
            tally.created, tally.total
        ));
        Ok(Some(tally))
    }

    /// Creates one playlist, then populates it with a single bulk add. When
    /// the bulk add is rejected every track is retried on its own, so one bad
    /// identity never costs the rest of the playlist.
    ///
    /// Only cancellation is returned as an error; everything else is recorded.
    async fn clone_playlist(
        &mut self,
        destination: &dyn LibraryApi,
        record: &PlaylistRecord,
        tally: &mut CloneTally,
    ) -> Result<(), EngineError> {
        let description = record.description.as_deref().unwrap_or_default();
        let playlist = match destination.create_playlist(&record.name, description).await {
            Ok(playlist) => playlist,
            Err(e) => {
                self.reporter.error(format!(
                    "CRITICAL: Failed to create playlist '{}'",
                    record.name
                ));
                self.record_failure(&format!("Playlist: {}", record.name), &e)
                    .await;
                return Ok(());
            }
        };
        tally.created += 1;

        if record.tracks.is_empty() {
            return Ok(());
        }

        let track_ids = self.normalize_tracks(record);

        if let Err(e) = destination.add_playlist_tracks(&playlist, &track_ids).await {
            self.reporter.warning(format!(
                "Batch add failed for '{}' ({}), trying one by one...",
                record.name, e
            ));

            for id in &track_ids {
                self.cancel.check()?;

                if let Err(e) = destination
                    .add_playlist_tracks(&playlist, std::slice::from_ref(id))
                    .await
                {
                    let description = self.cache.describe_or(id, || {
                        format!("Track ID: {} in playlist '{}'", id, record.name)
                    });
                    self.record_failure(&description, &e).await;
                    tally.tracks_failed += 1;
                }
            }
        }

        Ok(())
    }

    /// Reduces both track entry shapes to bare identities, caching any
    /// description that came with them.
    fn normalize_tracks(&mut self, record: &PlaylistRecord) -> Vec<Identity> {
        record
            .tracks
            .iter()
            .map(|track| {
                if let TrackReference::Described { id, meta } = track {
                    self.cache.insert(
                        id.clone(),
                        format!("Track: {} (in PL '{}')", meta, record.name),
                    );
                }
                track.id().clone()
            })
            .collect()
    }
}
