use limo::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::Starting { service } => {
                tracing::info!(service = %service, "Updating stars");
            }

            SyncProgress::FetchedPage {
                page,
                count,
                last_page,
            } => {
                tracing::debug!(page, count, last_page, "Fetched page");
            }

            SyncProgress::PageFailed { page, error } => {
                tracing::warn!(page, error = %error, "Failed to fetch page");
            }

            SyncProgress::FetchComplete { pages } => {
                tracing::info!(pages, "Fetch complete");
            }

            SyncProgress::Upserted { full_name, created } => {
                if created {
                    tracing::debug!(star = %full_name, "Created");
                } else {
                    tracing::debug!(star = %full_name, "Updated");
                }
            }

            SyncProgress::RecordFailed { error } => {
                tracing::warn!(error = %error, "Failed to save star");
            }

            SyncProgress::Finished {
                created,
                updated,
                errors,
            } => {
                tracing::info!(created, updated, errors, "Update complete");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
