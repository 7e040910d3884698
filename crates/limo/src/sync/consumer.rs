//! Sync consumer: drains the star channel into the store.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::store::{self, StoreError, UpsertOutcome};

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::StarMessage;

/// Counters gathered by [`consume_stars`].
#[derive(Debug, Default)]
pub struct ConsumeStats {
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
    /// The store error that stopped consumption, if any.
    pub fatal: Option<StoreError>,
}

/// Upsert every star received on `rx` for `service_id` until the channel
/// closes.
///
/// Failed fetches are counted and logged. The first store error is counted,
/// recorded as fatal and ends consumption; rows already written stay. The
/// receiver is dropped on return, which stops the producer.
pub async fn consume_stars(
    db: &DatabaseConnection,
    service_id: Uuid,
    mut rx: mpsc::Receiver<StarMessage>,
    on_progress: Option<&ProgressCallback>,
) -> ConsumeStats {
    let mut stats = ConsumeStats::default();

    while let Some(message) = rx.recv().await {
        match message {
            StarMessage::Failed(failure) => {
                stats.errors += 1;
                tracing::warn!(page = failure.page, error = %failure.error, "Star fetch failed");
                emit(
                    on_progress,
                    SyncProgress::RecordFailed {
                        error: failure.to_string(),
                    },
                );
            }
            StarMessage::Star(star) => {
                match store::upsert_star(db, service_id, &star, Utc::now()).await {
                    Ok((_, outcome)) => {
                        let created = outcome == UpsertOutcome::Created;
                        if created {
                            stats.created += 1;
                        } else {
                            stats.updated += 1;
                        }
                        tracing::debug!(full_name = %star.full_name, created, "Upserted star");
                        emit(
                            on_progress,
                            SyncProgress::Upserted {
                                full_name: star.full_name.clone(),
                                created,
                            },
                        );
                    }
                    Err(e) => {
                        stats.errors += 1;
                        tracing::error!(
                            full_name = %star.full_name,
                            remote_id = %star.remote_id,
                            error = %e,
                            "Failed to store star, stopping sync"
                        );
                        emit(
                            on_progress,
                            SyncProgress::RecordFailed {
                                error: format!("{}: {e}", star.full_name),
                            },
                        );
                        stats.fatal = Some(e);
                        break;
                    }
                }
            }
        }
    }

    stats
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use super::*;
    use crate::connect_and_migrate;
    use crate::source::SourceError;
    use crate::store::find_or_create_service;
    use crate::sync::testing::star;
    use crate::sync::types::FetchFailure;

    async fn setup() -> (DatabaseConnection, Uuid) {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");
        let (service, _) = find_or_create_service(&db, "github").await.unwrap();
        (db, service.id)
    }

    async fn feed(messages: Vec<StarMessage>) -> mpsc::Receiver<StarMessage> {
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        for message in messages {
            tx.send(message).await.unwrap();
        }
        rx
    }

    fn ok(id: &str, name: &str) -> StarMessage {
        StarMessage::Star(Box::new(star(id, name)))
    }

    #[tokio::test]
    async fn counts_created_updated_and_errors() {
        let (db, service_id) = setup().await;

        let rx = feed(vec![
            ok("1", "o/a"),
            StarMessage::Failed(FetchFailure {
                page: 1,
                error: SourceError::network("reset"),
            }),
            ok("2", "o/b"),
            ok("1", "o/a"),
        ])
        .await;
        let stats = consume_stars(&db, service_id, rx, None).await;

        assert_eq!(stats.created, 2);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.errors, 1);
        assert!(stats.fatal.is_none());
    }

    #[tokio::test]
    async fn store_error_is_fatal_and_keeps_prior_rows() {
        let (db, service_id) = setup().await;

        let rx = feed(vec![ok("1", "o/a"), ok("", "o/broken"), ok("3", "o/c")]).await;
        let stats = consume_stars(&db, service_id, rx, None).await;

        assert_eq!(stats.created, 1);
        assert_eq!(stats.errors, 1);
        assert!(matches!(stats.fatal, Some(StoreError::InvalidInput { .. })));
        assert_eq!(store::count_stars(&db, None, None).await.unwrap(), 1);
    }
}
