//! TIDAL library migration and cleanup.
//!
//! This library moves a user's collection (favorite tracks, albums, artists and
//! playlists) between two TIDAL accounts, or wipes selected categories from one
//! account. The heavy lifting lives in [`engine`], which talks to the remote
//! service only through the [`tidal::LibraryApi`] capability trait and reports
//! everything it does as [`engine::Event`]s.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `engine` - Export, import, playlist cloning and deletion orchestration
//! - `error` - Engine error type
//! - `management` - File-backed stores (exports, failure log, metadata cache, tokens)
//! - `tidal` - TIDAL capability trait and REST client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod management;
pub mod tidal;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by every remote capability call. The boxed error keeps the remote
/// collaborator free to fail with whatever it has (HTTP, JSON, protocol),
/// while the engine only needs its `Display` output for the failure log.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```ignore
/// info!("Found {} albums", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a recoverable error with a red cross.
///
/// Unlike [`error!`], the program keeps running. Used for per-item failures
/// reported by the engine.
#[macro_export]
macro_rules! failure {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "x".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors where recovery is not possible, such as a missing
/// token before any work has started.
///
/// # Example
///
/// ```ignore
/// error!("Failed to load token. Please run tidalshift login");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
