use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::EngineError;

/// Severity of a log line. The CLI maps each level to one console macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// A progress snapshot. Consumers only need to render the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

/// Everything the engine tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A human-readable line, e.g. `"Found 120 albums."`.
    Log { level: Level, message: String },
    /// The latest position within the current loop.
    Progress(Progress),
}

/// Cooperative cancellation flag shared between the worker and the foreground.
///
/// Only the foreground writes it; the engine polls it before each page,
/// each playlist and each item.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Checkpoint used by the engine.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Keep going
    /// - `Err(EngineError::Cancelled)` - The flag has been raised
    pub fn check(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }
}

/// Sending half of the event channel. A dropped receiver is not an error:
/// the engine keeps working and the events are discarded.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: Option<UnboundedSender<Event>>,
}

impl Reporter {
    /// Creates a reporter together with the receiving end of its channel.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (reporter, mut events) = Reporter::channel();
    /// reporter.info("Starting Export...");
    /// assert!(matches!(events.recv().await, Some(Event::Log { .. })));
    /// ```
    pub fn channel() -> (Self, UnboundedReceiver<Event>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A reporter that discards every event.
    pub fn silent() -> Self {
        Self { tx: None }
    }

    fn send(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.send(Event::Log {
            level,
            message: message.into(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(Level::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn progress(&self, current: u64, total: u64, label: impl Into<String>) {
        self.send(Event::Progress(Progress {
            current,
            total,
            label: label.into(),
        }));
    }
}
