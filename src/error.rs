use std::{fmt, io::Error};

use crate::types::Account;

/// Errors that end an engine operation early.
///
/// Per-item failures never surface here: they are logged, written to the
/// failure log and counted. What remains is cancellation, a missing
/// precondition, or a local I/O problem with the export files.
#[derive(Debug)]
pub enum EngineError {
    /// The cancellation flag was observed at a checkpoint.
    Cancelled,
    NotLoggedIn(Account),
    IoError(Error),
    SerdeError(serde_json::Error),
    RemoteError(String),
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Cancelled => write!(f, "operation cancelled by user"),
            EngineError::NotLoggedIn(account) => write!(f, "{} account not logged in", account),
            EngineError::IoError(e) => write!(f, "i/o error: {}", e),
            EngineError::SerdeError(e) => write!(f, "malformed export file: {}", e),
            EngineError::RemoteError(e) => write!(f, "remote error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<Error> for EngineError {
    fn from(err: Error) -> Self {
        EngineError::IoError(err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::SerdeError(err)
    }
}
