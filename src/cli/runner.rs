use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config,
    engine::{CancelToken, Engine, Event, Level, Reporter},
    error::EngineError,
    failure, info,
    management::LibraryPaths,
    success, warning,
};

/// Runs one engine job on a background task and renders its events until
/// the job finishes. Ctrl-C raises the cancellation flag; the job stops at
/// its next checkpoint.
pub(crate) async fn run<T, F, Fut>(job: F) -> Result<T, EngineError>
where
    F: FnOnce(Engine) -> Fut,
    Fut: Future<Output = Result<T, EngineError>> + Send + 'static,
    T: Send + 'static,
{
    let (reporter, mut events) = Reporter::channel();
    let cancel = CancelToken::new();
    let engine = Engine::new(
        LibraryPaths::new(config::data_dir()),
        reporter,
        cancel.clone(),
    );
    engine.start_session().await?;

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warning!("Cancelling after the current step...");
            interrupt.cancel();
        }
    });

    let worker = tokio::spawn(job(engine));

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    // the channel closes once the job has dropped its engine
    while let Some(event) = events.recv().await {
        match event {
            Event::Log { level, message } => pb.suspend(|| match level {
                Level::Info => info!("{}", message),
                Level::Success => success!("{}", message),
                Level::Warning => warning!("{}", message),
                Level::Error => failure!("{}", message),
            }),
            Event::Progress(progress) => {
                pb.set_length(progress.total);
                pb.set_position(progress.current);
                pb.set_message(progress.label);
            }
        }
    }
    pb.finish_and_clear();

    worker
        .await
        .map_err(|e| EngineError::RemoteError(format!("worker task failed: {}", e)))?
}
