//! Pagination producer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::source::{StarPage, StarSource};

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{FetchFailure, StarMessage};

/// Walk the starred pages of `user` and send every record down `tx`.
///
/// Pages are requested from 1 while the page number is at most the last page
/// reported so far (initially the current page). A failed request produces a
/// single [`StarMessage::Failed`] and does not change the known last page; the
/// cursor still moves on, so the failed page is not requested again.
///
/// Returns when the pages are exhausted or the receiver has gone away. The
/// channel closes when `tx` is dropped on return.
pub async fn produce_stars(
    source: Arc<dyn StarSource>,
    token: String,
    user: String,
    tx: mpsc::Sender<StarMessage>,
    on_progress: Option<Arc<ProgressCallback>>,
) -> u32 {
    let on_progress = on_progress.as_deref();
    let mut page = 1;
    let mut last_page = page;

    while page <= last_page {
        match source.fetch_stars_page(&token, &user, page).await {
            Ok(StarPage {
                stars,
                last_page: reported,
            }) => {
                last_page = reported;
                tracing::debug!(page, last_page, count = stars.len(), "Fetched star page");
                emit(
                    on_progress,
                    SyncProgress::FetchedPage {
                        page,
                        count: stars.len(),
                        last_page,
                    },
                );

                for record in stars {
                    let message = match record {
                        Ok(star) => StarMessage::Star(Box::new(star)),
                        Err(error) => StarMessage::Failed(FetchFailure { page, error }),
                    };
                    if tx.send(message).await.is_err() {
                        tracing::debug!(page, "Star receiver dropped, stopping producer");
                        return page;
                    }
                }
            }
            Err(error) => {
                tracing::warn!(page, error = %error, "Failed to fetch star page");
                emit(
                    on_progress,
                    SyncProgress::PageFailed {
                        page,
                        error: error.to_string(),
                    },
                );
                if tx
                    .send(StarMessage::Failed(FetchFailure { page, error }))
                    .await
                    .is_err()
                {
                    return page;
                }
            }
        }
        page += 1;
    }

    let pages = page - 1;
    emit(on_progress, SyncProgress::FetchComplete { pages });
    pages
}

/// Spawn [`produce_stars`] on a bounded channel of `capacity` messages.
///
/// The task yields the number of pages requested.
pub fn spawn_star_producer(
    source: Arc<dyn StarSource>,
    token: String,
    user: String,
    capacity: usize,
    on_progress: Option<Arc<ProgressCallback>>,
) -> (JoinHandle<u32>, mpsc::Receiver<StarMessage>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(produce_stars(source, token, user, tx, on_progress));
    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RemoteStar, SourceError};
    use crate::sync::testing::{ScriptedSource, star};

    async fn drain(mut rx: mpsc::Receiver<StarMessage>) -> Vec<StarMessage> {
        let mut messages = Vec::new();
        while let Some(message) = rx.recv().await {
            messages.push(message);
        }
        messages
    }

    fn describe(messages: &[StarMessage]) -> Vec<String> {
        messages
            .iter()
            .map(|m| match m {
                StarMessage::Star(s) => s.full_name.clone(),
                StarMessage::Failed(f) => format!("failed:{}", f.page),
            })
            .collect()
    }

    #[tokio::test]
    async fn emits_records_in_page_order() {
        let source = Arc::new(
            ScriptedSource::new()
                .page(1, vec![star("1", "o/a"), star("2", "o/b")], 2)
                .page(2, vec![star("3", "o/c")], 2),
        );

        let (handle, rx) = spawn_star_producer(source.clone(), "t".into(), String::new(), 1, None);
        let messages = drain(rx).await;

        assert_eq!(describe(&messages), vec!["o/a", "o/b", "o/c"]);
        assert_eq!(handle.await.unwrap(), 2);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_first_page_keeps_initial_bound() {
        // The remote has two pages, but the bound is never learned.
        let source = Arc::new(
            ScriptedSource::new()
                .raw_page(1, Err(SourceError::network("connection reset")))
                .page(2, vec![star("3", "o/c")], 2),
        );

        let (handle, rx) = spawn_star_producer(source.clone(), "t".into(), String::new(), 10, None);
        let messages = drain(rx).await;

        assert_eq!(describe(&messages), vec!["failed:1"]);
        assert_eq!(handle.await.unwrap(), 1);
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn failed_middle_page_is_skipped_not_retried() {
        let source = Arc::new(
            ScriptedSource::new()
                .page(1, vec![star("1", "o/a")], 3)
                .raw_page(2, Err(SourceError::network("timeout")))
                .page(3, vec![star("3", "o/c")], 3),
        );

        let (_, rx) = spawn_star_producer(source.clone(), "t".into(), String::new(), 10, None);
        let messages = drain(rx).await;

        assert_eq!(describe(&messages), vec!["o/a", "failed:2", "o/c"]);
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn translation_errors_are_per_record() {
        let page = StarPage {
            stars: vec![
                Ok(star("1", "o/a")),
                Err(SourceError::translation("ID from GitHub is required")),
                Ok(star("2", "o/b")),
            ],
            last_page: 1,
        };
        let source = Arc::new(ScriptedSource::new().raw_page(1, Ok(page)));

        let (_, rx) = spawn_star_producer(source, "t".into(), String::new(), 10, None);
        let messages = drain(rx).await;

        assert_eq!(describe(&messages), vec!["o/a", "failed:1", "o/b"]);
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let source = Arc::new(
            ScriptedSource::new()
                .page(1, vec![star("1", "o/a"), star("2", "o/b")], 3)
                .page(2, vec![star("3", "o/c")], 3)
                .page(3, vec![star("4", "o/d")], 3),
        );

        let (handle, rx) = spawn_star_producer(source.clone(), "t".into(), String::new(), 1, None);
        drop(rx);

        assert_eq!(handle.await.unwrap(), 1);
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn reports_progress_per_page() {
        use std::sync::Mutex;

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |event| {
            sink.lock().unwrap().push(event);
        });

        let source = Arc::new(ScriptedSource::new().page(1, Vec::<RemoteStar>::new(), 1));
        let (handle, rx) = spawn_star_producer(
            source,
            "t".into(),
            String::new(),
            10,
            Some(Arc::new(callback)),
        );
        drain(rx).await;
        handle.await.unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(
            events[0],
            SyncProgress::FetchedPage {
                page: 1,
                count: 0,
                last_page: 1
            }
        ));
        assert!(matches!(events[1], SyncProgress::FetchComplete { pages: 1 }));
    }
}
