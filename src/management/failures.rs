use std::{
    fmt::Display,
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use futures::io::AsyncWriteExt;

pub const HEADER: &str = "Failed Transfer Report:\n=======================\n";
const REASON_PREFIX: &str = "   -> Reason: ";

/// Append-only log of items that could not be processed.
///
/// Each failure takes two lines: the item description, then an indented
/// reason line. The file is opened and closed for every record so a crash
/// mid-run still leaves every earlier record on disk.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates the log and writes the report header. Called once per
    /// session, never between operations of the same session.
    pub async fn reset(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, HEADER).await
    }

    pub async fn record(
        &self,
        description: &str,
        reason: &(dyn Display + Sync),
    ) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let mut file = async_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let record = format!("{}\n{}{}\n", description, REASON_PREFIX, reason);
        file.write_all(record.as_bytes()).await?;
        file.flush().await
    }

    /// Number of failure records currently in the log.
    pub async fn count(&self) -> Result<usize, Error> {
        match async_fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content
                .lines()
                .filter(|l| l.starts_with(REASON_PREFIX))
                .count()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }
}
