//! # CLI Module
//!
//! User-facing commands of tidalshift. Each command connects the cached
//! account tokens to a TIDAL client, runs one engine job through
//! [`runner`] and prints a summary table when the job completes.
//!
//! ## Commands
//!
//! - [`login`] - Device-code login for the source or destination account
//! - [`export`] - Snapshot the source library into the data directory
//! - [`import`] - Replay the snapshot into the destination account
//! - [`transfer`] - Export followed by import in one run
//! - [`delete`] - Bulk-remove library content from the source account
//! - [`info`] - Show the export files and the last failure count
//!
//! Engine events are rendered through the crate's console macros while an
//! indicatif bar tracks progress. Ctrl-C stops the running job at its next
//! checkpoint; files already written stay on disk.

mod delete;
mod info;
mod login;
mod runner;
mod transfer;

pub use delete::delete;
pub use info::info;
pub use login::login;
pub use transfer::{export, import, transfer};
