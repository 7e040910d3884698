//! Progress reporting for sync runs.

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// A run is starting for a service.
    Starting {
        service: String,
    },

    /// Fetched a page of stars.
    FetchedPage {
        /// Page number (1-indexed).
        page: u32,
        /// Records on this page.
        count: usize,
        /// Last page as currently known.
        last_page: u32,
    },

    /// A page request failed. The producer moves on to the next page.
    PageFailed {
        page: u32,
        error: String,
    },

    /// All pages have been requested.
    FetchComplete {
        pages: u32,
    },

    /// A star was created or updated locally.
    Upserted {
        full_name: String,
        created: bool,
    },

    /// A single record could not be translated or stored.
    RecordFailed {
        error: String,
    },

    /// The run finished.
    Finished {
        created: usize,
        updated: usize,
        errors: usize,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
