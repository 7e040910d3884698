//! Sync entry point.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::source::StarSource;
use crate::store::{self, StoreError};

use super::consumer::consume_stars;
use super::producer::spawn_star_producer;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{SyncOptions, SyncSummary};

/// Errors that prevent a sync run from producing a summary.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Store failure outside the upsert loop (service lookup, marking success).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The producer task panicked or was cancelled.
    #[error("Star producer failed: {0}")]
    Producer(String),
}

/// Sync the stars of `source` into the store.
///
/// The service row is found or created by the source's name. The run's start
/// time is recorded before the producer is spawned and becomes the service's
/// `last_success` only when the consumer drained the channel without a store
/// error and at least one star was created or updated.
#[tracing::instrument(skip_all, fields(service = source.name()))]
pub async fn sync_service(
    db: &DatabaseConnection,
    source: Arc<dyn StarSource>,
    token: &str,
    options: &SyncOptions,
    on_progress: Option<Arc<ProgressCallback>>,
) -> Result<SyncSummary, SyncError> {
    let (service, _) = store::find_or_create_service(db, source.name()).await?;
    emit(
        on_progress.as_deref(),
        SyncProgress::Starting {
            service: service.name.clone(),
        },
    );

    let started_at = Utc::now();
    let (handle, rx) = spawn_star_producer(
        Arc::clone(&source),
        token.to_string(),
        options.user.clone(),
        options.channel_capacity,
        on_progress.clone(),
    );

    let stats = consume_stars(db, service.id, rx, on_progress.as_deref()).await;

    match handle.await {
        Ok(pages) => tracing::debug!(pages, "Star producer finished"),
        Err(e) => {
            let message = if e.is_panic() {
                "producer panicked".to_string()
            } else {
                e.to_string()
            };
            tracing::error!(error = %message, "Star producer failed");
            return Err(SyncError::Producer(message));
        }
    }

    let summary = SyncSummary {
        service: service.name.clone(),
        started_at,
        created: stats.created,
        updated: stats.updated,
        errors: stats.errors,
        fatal: stats.fatal,
    };

    if summary.is_complete() && summary.touched() > 0 {
        store::mark_success(db, service, started_at).await?;
    } else {
        tracing::debug!(
            complete = summary.is_complete(),
            touched = summary.touched(),
            "Not advancing last success"
        );
    }

    emit(
        on_progress.as_deref(),
        SyncProgress::Finished {
            created: summary.created,
            updated: summary.updated,
            errors: summary.errors,
        },
    );
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        errors = summary.errors,
        "Sync finished"
    );

    Ok(summary)
}
