use std::future::Future;

use crate::{
    Res,
    engine::progress::{CancelToken, Reporter},
    error::EngineError,
    types::Page,
};

/// Page size for favorites and playlist listings.
pub const PAGE_SIZE: usize = 50;
/// Page size for the tracks inside one playlist.
pub const PLAYLIST_PAGE_SIZE: usize = 100;

/// Drains paged collections from the remote service.
///
/// A fetcher borrows the engine's reporter and cancellation token, so every
/// page emits progress and every page boundary is a cancellation checkpoint.
///
/// # Example
///
/// ```ignore
/// let albums = Fetcher::new(&reporter, &cancel)
///     .fetch_all("albums", api.count(Category::Albums), |limit, offset| {
///         api.items(Category::Albums, limit, offset)
///     })
///     .await?;
/// ```
pub struct Fetcher<'a> {
    reporter: &'a Reporter,
    cancel: &'a CancelToken,
    page_size: usize,
}

impl<'a> Fetcher<'a> {
    /// Creates a fetcher requesting [`PAGE_SIZE`] entries per page.
    pub fn new(reporter: &'a Reporter, cancel: &'a CancelToken) -> Self {
        Self {
            reporter,
            cancel,
            page_size: PAGE_SIZE,
        }
    }

    /// Overrides the page size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetches every item of a counted collection.
    ///
    /// # Arguments
    ///
    /// * `label` - Plural name of the collection used in log and progress
    ///   messages, e.g. `"albums"`
    /// * `count` - Future resolving to the reported size of the collection
    /// * `fetch` - Called with `(limit, offset)` for each page
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<T>)` - Every item, in the order the pages returned them
    /// - `Err(EngineError::Cancelled)` - The cancel flag was raised between
    ///   two pages
    /// - `Err(EngineError::RemoteError)` - A page request failed; the message
    ///   names the collection and the offset
    ///
    /// See [`Fetcher::fetch_into`] for the paging rules.
    pub async fn fetch_all<T, C, F, Fut>(
        &self,
        label: &str,
        count: C,
        fetch: F,
    ) -> Result<Vec<T>, EngineError>
    where
        C: Future<Output = Res<usize>>,
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Res<Vec<T>>>,
    {
        let mut items = Vec::new();
        self.fetch_into(&mut items, label, count, fetch).await?;
        Ok(items)
    }

    /// Appends every item of a counted collection to `items`.
    ///
    /// A failing count is treated as an empty collection. Pages are requested
    /// from offset 0 until the reported count is reached or a page comes back
    /// empty, advancing by the number of items actually returned. The cancel
    /// flag is checked before every page; on cancellation `items` keeps what
    /// was fetched so far.
    pub async fn fetch_into<T, C, F, Fut>(
        &self,
        items: &mut Vec<T>,
        label: &str,
        count: C,
        mut fetch: F,
    ) -> Result<(), EngineError>
    where
        C: Future<Output = Res<usize>>,
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Res<Vec<T>>>,
    {
        let total = match count.await {
            Ok(total) => total,
            Err(e) => {
                self.reporter
                    .warning(format!("Could not count {}: {}", label, e));
                0
            }
        };

        self.reporter.info(format!("Found {} {}.", total, label));
        if total == 0 {
            return Ok(());
        }

        self.reporter
            .progress(0, total as u64, format!("Fetching {}...", label));

        let mut offset = 0;
        while offset < total {
            self.cancel.check()?;

            let batch = fetch(self.page_size, offset).await.map_err(|e| {
                EngineError::RemoteError(format!(
                    "failed to fetch {} at offset {}: {}",
                    label, offset, e
                ))
            })?;
            // the reported count can be stale
            if batch.is_empty() {
                break;
            }

            offset += batch.len();
            items.extend(batch);
            self.reporter.progress(
                offset as u64,
                total as u64,
                format!("Fetching {}: {}/{}", label, offset, total),
            );
        }

        Ok(())
    }

    /// Fetches pages until the service serves an empty one. Used where no
    /// count exists, such as the tracks of a single playlist.
    ///
    /// The offset advances by [`Page::served`], so entries the collaborator
    /// dropped while converting a page are never requested twice and a page
    /// without any kept item does not end the listing.
    pub async fn drain<T, F, Fut>(&self, mut fetch: F) -> Result<Vec<T>, EngineError>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Res<Page<T>>>,
    {
        let mut items = Vec::new();
        let mut offset = 0;
        loop {
            self.cancel.check()?;

            let page = fetch(self.page_size, offset)
                .await
                .map_err(|e| EngineError::RemoteError(e.to_string()))?;
            if page.served == 0 {
                break;
            }
            offset += page.served;
            items.extend(page.items);
        }

        Ok(items)
    }
}
