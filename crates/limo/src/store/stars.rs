use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::prelude::*;
use crate::source::RemoteStar;

use super::{contains_pattern, fold};
use super::errors::{Result, StoreError};
use super::tags::find_or_create_tag;

/// Whether an upsert inserted a new row or refreshed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Find a star by its reconciliation key, including soft-deleted rows.
pub async fn find_star_by_remote_id(
    db: &DatabaseConnection,
    service_id: Uuid,
    remote_id: &str,
) -> Result<Option<StarModel>> {
    Star::find()
        .filter(StarColumn::ServiceId.eq(service_id))
        .filter(StarColumn::RemoteId.eq(remote_id))
        .one(db)
        .await
        .map_err(StoreError::from)
}

/// Create or update the star keyed on `(service_id, remote.remote_id)`.
///
/// Updates overwrite every mutable field, refresh `updated_at` to `touched_at`
/// and clear a soft delete. Remote topics are attached as tags.
pub async fn upsert_star(
    db: &DatabaseConnection,
    service_id: Uuid,
    remote: &RemoteStar,
    touched_at: DateTime<Utc>,
) -> Result<(StarModel, UpsertOutcome)> {
    if remote.remote_id.is_empty() {
        return Err(StoreError::invalid_input("remote_id must not be empty"));
    }

    let touched_at = touched_at.fixed_offset();
    let existing = find_star_by_remote_id(db, service_id, &remote.remote_id).await?;

    let (star, outcome) = match existing {
        Some(existing) => {
            let mut active = existing.into_active_model();
            apply_remote(&mut active, remote);
            active.updated_at = Set(touched_at);
            active.deleted_at = Set(None);
            (active.update(db).await?, UpsertOutcome::Updated)
        }
        None => {
            let mut active = StarActiveModel {
                id: Set(Uuid::new_v4()),
                service_id: Set(service_id),
                remote_id: Set(remote.remote_id.clone()),
                created_at: Set(touched_at),
                updated_at: Set(touched_at),
                deleted_at: Set(None),
                ..Default::default()
            };
            apply_remote(&mut active, remote);
            (active.insert(db).await?, UpsertOutcome::Created)
        }
    };

    for topic in remote.topics.iter().filter(|t| !t.trim().is_empty()) {
        let (tag, _) = find_or_create_tag(db, topic).await?;
        add_tag(db, star.id, tag.id).await?;
    }

    Ok((star, outcome))
}

fn apply_remote(active: &mut StarActiveModel, remote: &RemoteStar) {
    active.name = Set(remote.name.clone());
    active.full_name = Set(remote.full_name.clone());
    active.name_folded = Set(fold(&remote.name));
    active.full_name_folded = Set(fold(&remote.full_name));
    active.owner = Set(remote.owner.clone());
    active.avatar = Set(remote.avatar.clone());
    active.description = Set(remote.description.clone());
    active.homepage = Set(remote.homepage.clone());
    active.url = Set(remote.url.clone());
    active.language = Set(remote.language.clone());
    active.language_folded = Set(remote.language.as_deref().map(fold));
    active.stargazers = Set(remote.stargazers);
    active.watchers = Set(remote.watchers);
    active.forks = Set(remote.forks);
    active.size = Set(remote.size);
    active.pushed_at = Set(remote.pushed_at.map(|t| t.fixed_offset()));
    active.remote_created_at = Set(remote.created_at.map(|t| t.fixed_offset()));
    active.starred_at = Set(remote.starred_at.map(|t| t.fixed_offset()));
}

/// Resolve a user-typed query to live stars.
///
/// Stages are tried in order and the first non-empty one wins: exact full
/// name, exact name, case-insensitive full name, case-insensitive name, then
/// case-insensitive substring of full name or name.
pub async fn fuzzy_find_stars(db: &DatabaseConnection, query: &str) -> Result<Vec<StarModel>> {
    let folded = fold(query);
    let stages = [
        Condition::all().add(StarColumn::FullName.eq(query)),
        Condition::all().add(StarColumn::Name.eq(query)),
        Condition::all().add(StarColumn::FullNameFolded.eq(folded.clone())),
        Condition::all().add(StarColumn::NameFolded.eq(folded)),
        name_contains(query),
    ];

    for condition in stages {
        let stars = Star::find()
            .filter(StarColumn::DeletedAt.is_null())
            .filter(condition)
            .order_by_asc(StarColumn::FullName)
            .all(db)
            .await?;
        if !stars.is_empty() {
            return Ok(stars);
        }
    }
    Ok(Vec::new())
}

/// Case-insensitive substring match on the star's name or full name.
pub(crate) fn name_contains(needle: &str) -> Condition {
    let pattern = contains_pattern(needle);
    Condition::any()
        .add(StarColumn::FullNameFolded.like(pattern.clone()))
        .add(StarColumn::NameFolded.like(pattern))
}

/// Associate a tag with a star. Returns `false` when already associated.
pub async fn add_tag(db: &DatabaseConnection, star_id: Uuid, tag_id: Uuid) -> Result<bool> {
    let inserted = StarTag::insert(StarTagActiveModel {
        star_id: Set(star_id),
        tag_id: Set(tag_id),
    })
    .on_conflict(
        OnConflict::columns([StarTagColumn::StarId, StarTagColumn::TagId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(inserted > 0)
}

/// Remove one association. Removing a pair that is not associated is a no-op.
pub async fn remove_tag(db: &DatabaseConnection, star_id: Uuid, tag_id: Uuid) -> Result<u64> {
    let result = StarTag::delete_many()
        .filter(StarTagColumn::StarId.eq(star_id))
        .filter(StarTagColumn::TagId.eq(tag_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn remove_all_tags(db: &DatabaseConnection, star_id: Uuid) -> Result<u64> {
    let result = StarTag::delete_many()
        .filter(StarTagColumn::StarId.eq(star_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn has_tag(db: &DatabaseConnection, star_id: Uuid, tag_id: Uuid) -> Result<bool> {
    let found = StarTag::find_by_id((star_id, tag_id)).one(db).await?;
    Ok(found.is_some())
}

/// Live tags of a star, by name, optionally narrowed to names containing
/// `filter`.
pub async fn load_tags(
    db: &DatabaseConnection,
    star: &StarModel,
    filter: Option<&str>,
) -> Result<Vec<TagModel>> {
    let mut select = star
        .find_related(Tag)
        .filter(TagColumn::DeletedAt.is_null());
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        select = select.filter(TagColumn::NameFolded.like(contains_pattern(filter)));
    }
    select
        .order_by_asc(TagColumn::Name)
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Soft-delete a star. Its tag associations are kept.
pub async fn soft_delete_star(db: &DatabaseConnection, star: StarModel) -> Result<StarModel> {
    let mut active = star.into_active_model();
    active.deleted_at = Set(Some(Utc::now().fixed_offset()));
    active.update(db).await.map_err(StoreError::from)
}
