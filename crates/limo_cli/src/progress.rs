//! Progress reporting for sync operations.
//!
//! This module provides two modes of progress reporting:
//! - Interactive mode (TTY): Animated progress bars using indicatif
//! - Logging mode (non-TTY): Structured logging using tracing
//!
//! Progress bars are organized as:
//! - Fetch bar: page fetching progress, sized once the last page is known
//! - Save bar: a counter of stars written to the local database

mod interactive;
mod logging;

use std::sync::Arc;

use console::Term;
use limo::sync::{ProgressCallback, SyncProgress};

pub use interactive::InteractiveReporter;
pub use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> Arc<ProgressCallback> {
        let reporter = Arc::clone(self);
        Arc::new(Box::new(move |event| {
            reporter.handle(event);
        }))
    }

    /// Finish all progress bars (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_events(reporter: &Arc<ProgressReporter>) {
        let callback = reporter.as_callback();
        callback(SyncProgress::Starting {
            service: "github".to_string(),
        });
        callback(SyncProgress::FetchedPage {
            page: 1,
            count: 2,
            last_page: 2,
        });
        callback(SyncProgress::Upserted {
            full_name: "o/a".to_string(),
            created: true,
        });
        callback(SyncProgress::PageFailed {
            page: 2,
            error: "boom".to_string(),
        });
        callback(SyncProgress::RecordFailed {
            error: "ID from GitHub is required".to_string(),
        });
        callback(SyncProgress::FetchComplete { pages: 2 });
        callback(SyncProgress::Finished {
            created: 1,
            updated: 0,
            errors: 2,
        });
        reporter.finish();
    }

    #[test]
    fn test_logging_reporter_handles_every_event() {
        let reporter = Arc::new(ProgressReporter::Logging(LoggingReporter::new()));
        run_events(&reporter);
    }

    #[test]
    fn test_interactive_reporter_handles_every_event() {
        let reporter = Arc::new(ProgressReporter::Interactive(InteractiveReporter::hidden()));
        run_events(&reporter);
    }

    #[test]
    fn test_interactive_reporter_finish_without_events() {
        InteractiveReporter::hidden().finish();
    }
}
