use tabled::Table;

use crate::{
    cli::runner,
    config, error,
    error::EngineError,
    info,
    management::LibraryPaths,
    tidal::client::TidalClient,
    types::{Account, ExportReport, ImportReport, Selection, SummaryRow},
    warning,
};

pub async fn export(selection: Selection) {
    let source = connect(Account::Source).await;
    let result = runner::run(move |mut engine| async move {
        engine.export(&source, selection).await
    })
    .await;

    if let Some(report) = conclude("Export", result) {
        print_export(&report);
    }
}

pub async fn import(selection: Selection) {
    let destination = connect(Account::Destination).await;
    let result = runner::run(move |mut engine| async move {
        engine.import(&destination, selection).await
    })
    .await;

    if let Some(report) = conclude("Import", result) {
        print_import(&report);
    }
}

/// Export from the source account, then import into the destination.
pub async fn transfer(selection: Selection) {
    let source = connect(Account::Source).await;
    let destination = connect(Account::Destination).await;
    let result = runner::run(move |mut engine| async move {
        engine.transfer(&source, &destination, selection).await
    })
    .await;

    if let Some((exported, imported)) = conclude("Transfer", result) {
        print_export(&exported);
        print_import(&imported);
    }
}

pub(crate) async fn connect(account: Account) -> TidalClient {
    match TidalClient::connect(account).await {
        Ok(client) => client,
        Err(e) => {
            error!(
                "Failed to load token for the {0} account. Please run tidalshift login --account {0}\n Error: {1}",
                account, e
            );
        }
    }
}

/// Unwraps an engine result, reporting cancellation and fatal errors.
pub(crate) fn conclude<T>(operation: &str, result: Result<T, EngineError>) -> Option<T> {
    let failures = LibraryPaths::new(config::data_dir()).failures_file();
    match result {
        Ok(report) => {
            info!("Check '{}' for any failed items.", failures.display());
            Some(report)
        }
        Err(EngineError::Cancelled) => {
            warning!(
                "{} cancelled. Files and failures written so far are kept in {}.",
                operation,
                config::data_dir().display()
            );
            None
        }
        Err(e) => error!("{} failed: {}", operation, e),
    }
}

fn print_export(report: &ExportReport) {
    let rows: Vec<SummaryRow> = [
        ("Albums", report.albums),
        ("Artists", report.artists),
        ("Tracks", report.tracks),
        ("Playlists", report.playlists),
    ]
    .into_iter()
    .filter_map(|(category, exported)| {
        exported.map(|n| SummaryRow::new(category, format!("{} exported", n)))
    })
    .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}

fn print_import(report: &ImportReport) {
    let mut rows: Vec<SummaryRow> = [
        ("Albums", report.albums),
        ("Artists", report.artists),
        ("Tracks", report.tracks),
    ]
    .into_iter()
    .filter_map(|(category, tally)| {
        tally.map(|t| {
            SummaryRow::new(
                category,
                format!("{}/{} added, {} failed", t.succeeded, t.total, t.failed()),
            )
        })
    })
    .collect();

    if let Some(cloned) = report.playlists {
        rows.push(SummaryRow::new(
            "Playlists",
            format!(
                "{}/{} created, {} tracks failed",
                cloned.created, cloned.total, cloned.tracks_failed
            ),
        ));
    }

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}
