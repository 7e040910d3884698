//! Star and unstar repositories remotely, mirroring the change locally.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::entity::prelude::StarModel;
use crate::source::{RepoRef, SourceError, StarSource};
use crate::store::{self, StoreError, UpsertOutcome};

#[derive(Debug, Error)]
pub enum StarringError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Star `repo` on the remote service and upsert it locally, attaching `tags`.
pub async fn star_repository(
    db: &DatabaseConnection,
    source: &dyn StarSource,
    token: &str,
    repo: &RepoRef,
    tags: &[String],
) -> Result<(StarModel, UpsertOutcome), StarringError> {
    let remote = source.add_star(token, repo).await?;
    let (service, _) = store::find_or_create_service(db, source.name()).await?;
    let (star, outcome) = store::upsert_star(db, service.id, &remote, Utc::now()).await?;

    for name in tags {
        let (tag, _) = store::find_or_create_tag(db, name).await?;
        store::add_tag(db, star.id, tag.id).await?;
    }

    tracing::info!(full_name = %star.full_name, service = %service.name, "Starred repository");
    Ok((star, outcome))
}

/// Unstar `repo` on the remote service and soft-delete the local star.
pub async fn unstar_repository(
    db: &DatabaseConnection,
    source: &dyn StarSource,
    token: &str,
    repo: &RepoRef,
) -> Result<StarModel, StarringError> {
    let remote = source.remove_star(token, repo).await?;
    let (service, _) = store::find_or_create_service(db, source.name()).await?;

    let star = store::find_star_by_remote_id(db, service.id, &remote.remote_id)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            context: format!("Star '{}'", repo.full_name()),
        })?;
    let star = store::soft_delete_star(db, star).await?;

    tracing::info!(full_name = %star.full_name, service = %service.name, "Deleted star");
    Ok(star)
}
