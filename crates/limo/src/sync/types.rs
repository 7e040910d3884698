//! Sync pipeline messages, options and results.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::source::{RemoteStar, SourceError};
use crate::store::StoreError;

/// Default capacity of the producer → consumer channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// A page request or record translation that failed.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// 1-based page the failure belongs to.
    pub page: u32,
    pub error: SourceError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: {}", self.page, self.error)
    }
}

/// One item on the sync channel.
#[derive(Debug, Clone)]
pub enum StarMessage {
    Star(Box<RemoteStar>),
    Failed(FetchFailure),
}

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Remote user whose stars are fetched. Empty means the token's owner.
    pub user: String,
    /// Bound on messages buffered between producer and consumer.
    pub channel_capacity: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            user: String::new(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Outcome of one sync run.
#[derive(Debug)]
#[must_use = "SyncSummary may carry a fatal store error that should be reported"]
pub struct SyncSummary {
    /// Service name.
    pub service: String,
    /// When the run started. Becomes the service's `last_success` when the
    /// run completes and touched at least one star.
    pub started_at: DateTime<Utc>,
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    /// Store error that stopped the run early.
    pub fatal: Option<StoreError>,
}

impl SyncSummary {
    /// Stars created or updated.
    pub fn touched(&self) -> usize {
        self.created + self.updated
    }

    /// Whether the run drained the whole channel.
    pub fn is_complete(&self) -> bool {
        self.fatal.is_none()
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created: {}; Updated: {}; Errors: {}",
            self.created, self.updated, self.errors
        )
    }
}
