use tabled::Table;

use crate::{
    config, error, info,
    management::{FailureLog, LibraryPaths, LineFile, PlaylistDocument},
    types::{Category, ExportFileRow},
};

/// Shows which export files exist in the data directory and how much they hold.
pub async fn info() {
    let paths = LibraryPaths::new(config::data_dir());
    let mut rows = Vec::new();

    for category in [Category::Albums, Category::Artists, Category::Tracks] {
        let file = LineFile::new(paths.category_file(category));
        let entries = match file.load().await {
            Ok(Some(entries)) => entries.len().to_string(),
            Ok(None) => "missing".to_string(),
            Err(e) => format!("unreadable ({})", e),
        };
        rows.push(ExportFileRow {
            category: category.title().to_string(),
            file: file.path().display().to_string(),
            entries,
        });
    }

    let document = PlaylistDocument::new(paths.playlists_file());
    let entries = match document.load().await {
        Ok(Some(playlists)) => format!(
            "{} playlists, {} tracks",
            playlists.len(),
            playlists.iter().map(|p| p.tracks.len()).sum::<usize>()
        ),
        Ok(None) => "missing".to_string(),
        Err(e) => format!("unreadable ({})", e),
    };
    rows.push(ExportFileRow {
        category: Category::Playlists.title().to_string(),
        file: document.path().display().to_string(),
        entries,
    });

    println!("{}", Table::new(rows));

    let failures = FailureLog::new(paths.failures_file());
    match failures.count().await {
        Ok(0) => info!("No failures recorded in the last run."),
        Ok(n) => info!(
            "{} failures recorded in {}",
            n,
            failures.path().display()
        ),
        Err(e) => error!("Failed to read failure log. Err: {}", e),
    }
}
