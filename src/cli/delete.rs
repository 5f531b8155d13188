use tabled::Table;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::{runner, transfer},
    error, info,
    types::{Account, DeleteReport, Selection, SummaryRow},
    warning,
};

const CONFIRMATION: &str = "DELETE";

/// Removes the selected categories from the source account.
///
/// Asks the user to type `DELETE` unless `confirmed` is set.
pub async fn delete(selection: Selection, confirmed: bool) {
    if selection.is_empty() {
        error!("Nothing selected. Pass category flags or --all to choose what to delete.");
    }

    let source = transfer::connect(Account::Source).await;

    if !confirmed && !confirm(&selection).await {
        info!("Deletion aborted.");
        return;
    }

    let result = runner::run(move |mut engine| async move {
        engine.delete(&source, selection).await
    })
    .await;

    if let Some(report) = transfer::conclude("Deletion", result) {
        print_report(&report);
    }
}

async fn confirm(selection: &Selection) -> bool {
    let selected = [
        (selection.albums, "albums"),
        (selection.artists, "artists"),
        (selection.tracks, "favorite tracks"),
        (selection.playlists, "playlists"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect::<Vec<_>>()
    .join(", ");

    warning!(
        "This permanently removes {} from the source account.",
        selected
    );
    info!("Type {} to continue:", CONFIRMATION);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await {
        Ok(Some(line)) => line.trim() == CONFIRMATION,
        _ => false,
    }
}

fn print_report(report: &DeleteReport) {
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
                format!("{}/{} removed, {} failed", t.succeeded, t.total, t.failed()),
            )
        })
    })
    .collect();

    if let Some(playlists) = report.playlists {
        rows.push(SummaryRow::new(
            "Playlists",
            format!(
                "{} deleted, {} unfollowed of {}",
                playlists.deleted, playlists.unfollowed, playlists.total
            ),
        ));
    }

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}
