use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::prelude::*;

use super::errors::{Result, StoreError};

/// Find a service by exact (case-sensitive) name.
pub async fn find_service_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<ServiceModel>> {
    Service::find()
        .filter(ServiceColumn::Name.eq(name))
        .one(db)
        .await
        .map_err(StoreError::from)
}

/// Find the service named `name`, creating it if absent.
///
/// The flag is `true` when the row was created by this call.
pub async fn find_or_create_service(
    db: &DatabaseConnection,
    name: &str,
) -> Result<(ServiceModel, bool)> {
    if name.trim().is_empty() {
        return Err(StoreError::invalid_input("service name must not be empty"));
    }

    if let Some(existing) = find_service_by_name(db, name).await? {
        return Ok((existing, false));
    }

    let now = Utc::now().fixed_offset();
    let service = ServiceActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        last_success: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::debug!(service = %service.name, "Created service");
    Ok((service, true))
}

/// Record `started_at` as the service's last successful sync.
pub async fn mark_success(
    db: &DatabaseConnection,
    service: ServiceModel,
    started_at: DateTime<Utc>,
) -> Result<ServiceModel> {
    let mut active = service.into_active_model();
    active.last_success = Set(Some(started_at.fixed_offset()));
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await.map_err(StoreError::from)
}

/// All services, by name.
pub async fn list_services(db: &DatabaseConnection) -> Result<Vec<ServiceModel>> {
    Service::find()
        .order_by_asc(ServiceColumn::Name)
        .all(db)
        .await
        .map_err(StoreError::from)
}
