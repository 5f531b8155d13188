//! # Engine
//!
//! Orchestrates export, import, full transfer and deletion against one or two
//! [`LibraryApi`] accounts. One [`Engine`] owns all state of a session: the
//! metadata cache, the failure log, the event reporter and the cancellation
//! token. Operations run strictly sequentially; the caller is free to drive
//! the engine from a background task and consume its [`Event`]s elsewhere.
//!
//! Failure policy:
//! - per-item and per-playlist failures are logged, written to the failure
//!   log, counted, and the loop continues
//! - a category whose listing cannot be fetched is skipped
//! - cancellation and a missing login end the operation with an error;
//!   files and log records written so far stay valid

mod delete;
mod export;
mod fetcher;
mod import;
mod playlists;
mod progress;

use std::fmt::Display;

pub use export::describe;
pub use fetcher::{Fetcher, PAGE_SIZE, PLAYLIST_PAGE_SIZE};
pub use progress::{CancelToken, Event, Level, Progress, Reporter};

use crate::{
    error::EngineError,
    management::{FailureLog, LibraryPaths, MetadataCache},
    tidal::LibraryApi,
    types::{ExportReport, ImportReport, Selection},
};

/// Owner of one migration or cleanup session.
///
/// Holds the export file locations, the metadata cache shared by export and
/// import, the failure log, the event [`Reporter`] and the [`CancelToken`].
/// Operations take `&mut self`, so one engine runs one operation at a time.
///
/// # Example
///
/// ```ignore
/// let (reporter, mut events) = Reporter::channel();
/// let cancel = CancelToken::new();
/// let mut engine = Engine::new(LibraryPaths::new(config::data_dir()), reporter, cancel.clone());
/// engine.start_session().await?;
///
/// let (exported, imported) = engine
///     .transfer(&source, &destination, Selection::all())
///     .await?;
/// ```
pub struct Engine {
    paths: LibraryPaths,
    cache: MetadataCache,
    failures: FailureLog,
    reporter: Reporter,
    cancel: CancelToken,
}

impl Engine {
    /// Creates an engine rooted at `paths`.
    ///
    /// # Arguments
    ///
    /// * `paths` - Where export files and the failure log live
    /// * `reporter` - Receives every log line and progress snapshot; use
    ///   [`Reporter::silent`] to discard them
    /// * `cancel` - Polled at every checkpoint; raising it from another task
    ///   stops the running operation with [`EngineError::Cancelled`]
    ///
    /// The failure log is not touched until [`Engine::start_session`].
    pub fn new(paths: LibraryPaths, reporter: Reporter, cancel: CancelToken) -> Self {
        let failures = FailureLog::new(paths.failures_file());
        Self {
            paths,
            cache: MetadataCache::new(),
            failures,
            reporter,
            cancel,
        }
    }

    /// Starts a fresh session by truncating the failure log. Operations run
    /// afterwards on the same engine append to it.
    pub async fn start_session(&self) -> Result<(), EngineError> {
        self.failures.reset().await?;
        Ok(())
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn failure_log(&self) -> &FailureLog {
        &self.failures
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Exports from `source`, then imports the freshly written files into
    /// `destination`, sharing one cache and one failure log.
    ///
    /// # Arguments
    ///
    /// * `source` - Account the library is read from
    /// * `destination` - Account the library is written to
    /// * `selection` - Categories to move; the same set applies to both halves
    ///
    /// # Returns
    ///
    /// - `Ok((ExportReport, ImportReport))` - Both halves ran to completion;
    ///   per-item failures are counted in the reports and written to the log
    /// - `Err(EngineError::NotLoggedIn(_))` - Either account has no valid
    ///   session. A missing destination login is only noticed after export
    /// - `Err(EngineError::Cancelled)` - Stopped at a checkpoint; files
    ///   written so far stay on disk
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (exported, imported) = engine
    ///     .transfer(&source, &destination, Selection::all())
    ///     .await?;
    /// ```
    pub async fn transfer(
        &mut self,
        source: &dyn LibraryApi,
        destination: &dyn LibraryApi,
        selection: Selection,
    ) -> Result<(ExportReport, ImportReport), EngineError> {
        let exported = self.export(source, selection).await?;
        let imported = self.import(destination, selection).await?;
        Ok((exported, imported))
    }

    fn fetcher(&self) -> Fetcher<'_> {
        Fetcher::new(&self.reporter, &self.cancel)
    }

    async fn record_failure(&self, description: &str, reason: &(dyn Display + Sync)) {
        self.reporter.error(format!("{} -> {}", description, reason));
        if let Err(e) = self.failures.record(description, reason).await {
            self.reporter.warning(format!(
                "Could not write to {}: {}",
                self.failures.path().display(),
                e
            ));
        }
    }
}
