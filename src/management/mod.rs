mod auth;
mod cache;
mod failures;
mod library;

pub use auth::TokenManager;
pub use cache::MetadataCache;
pub use failures::FailureLog;
pub use failures::HEADER as FAILURE_LOG_HEADER;
pub use library::LibraryPaths;
pub use library::LineEntry;
pub use library::LineFile;
pub use library::PlaylistDocument;
pub use library::SEPARATOR;
pub use library::parse_lines;
