//! Mark-and-sweep pruning of stars the remote no longer reports.
//!
//! Every completed sync refreshes the stars it sees and records its start
//! time as the service's `last_success`. Live stars last touched before that
//! time were not reported by the latest full pass and are prunable.

use sea_orm::DatabaseConnection;

use crate::entity::prelude::StarModel;
use crate::store::{self, Result, StoreError};

/// List the prunable stars of the service `name` and, when `confirm` is set,
/// soft-delete them.
///
/// The returned stars are the prunable set as computed, in full-name order.
pub async fn prune_service(
    db: &DatabaseConnection,
    name: &str,
    confirm: bool,
) -> Result<Vec<StarModel>> {
    let service = store::find_service_by_name(db, name)
        .await?
        .ok_or_else(|| StoreError::service_not_found(name))?;

    if !service.has_synced() {
        tracing::info!(service = %service.name, "Service has never synced, nothing to prune");
        return Ok(Vec::new());
    }

    let prunable = store::find_prunable_stars(db, &service).await?;
    for star in &prunable {
        tracing::info!(full_name = %star.full_name, "Prunable star");
    }

    if confirm && !prunable.is_empty() {
        for star in &prunable {
            store::soft_delete_star(db, star.clone()).await?;
        }
        tracing::info!(count = prunable.len(), service = %service.name, "Pruned stars");
    }

    Ok(prunable)
}
