use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entity::prelude::*;
use crate::entity::star_tag;

use super::errors::{Result, StoreError};
use super::fold;
use super::stars::name_contains;

/// A live tag together with the number of live stars carrying it.
#[derive(Debug, Clone, Serialize)]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: TagModel,
    pub star_count: i64,
}

/// Find a live tag by name, ignoring case.
pub async fn find_tag_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<TagModel>> {
    Tag::find()
        .filter(TagColumn::DeletedAt.is_null())
        .filter(TagColumn::NameFolded.eq(fold(name)))
        .one(db)
        .await
        .map_err(StoreError::from)
}

/// Find the live tag named `name` (case-insensitively) or create it.
///
/// The flag is `true` when the tag was created by this call.
pub async fn find_or_create_tag(db: &DatabaseConnection, name: &str) -> Result<(TagModel, bool)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::invalid_input("tag name must not be empty"));
    }

    if let Some(existing) = find_tag_by_name(db, name).await? {
        return Ok((existing, false));
    }

    let now = Utc::now().fixed_offset();
    let tag = TagActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        name_folded: Set(fold(name)),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await?;

    tracing::debug!(tag = %tag.name, "Created tag");
    Ok((tag, true))
}

/// Rename a tag in place.
///
/// Fails when `new_name` is exactly the current name, or when another live
/// tag already owns `new_name` ignoring case. Changing only the case of the
/// current name is allowed.
pub async fn rename_tag(
    db: &DatabaseConnection,
    tag: TagModel,
    new_name: &str,
) -> Result<TagModel> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(StoreError::invalid_input("tag name must not be empty"));
    }
    if new_name == tag.name {
        return Err(StoreError::TagRenameUnchanged { name: tag.name });
    }
    if let Some(other) = find_tag_by_name(db, new_name).await?
        && other.id != tag.id
    {
        return Err(StoreError::TagExists { name: other.name });
    }

    let mut active = tag.into_active_model();
    active.name = Set(new_name.to_string());
    active.name_folded = Set(fold(new_name));
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await.map_err(StoreError::from)
}

/// Soft-delete a tag and drop every association to it in one transaction.
///
/// The stars themselves are untouched. Returns the number of associations
/// removed.
pub async fn delete_tag(db: &DatabaseConnection, tag: TagModel) -> Result<u64> {
    let txn = db.begin().await?;

    let removed = StarTag::delete_many()
        .filter(StarTagColumn::TagId.eq(tag.id))
        .exec(&txn)
        .await?
        .rows_affected;

    let now = Utc::now().fixed_offset();
    let mut active = tag.into_active_model();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(&txn).await?;

    txn.commit().await?;
    Ok(removed)
}

/// Live stars carrying `tag`, by name, optionally narrowed to names
/// containing `filter`.
pub async fn load_stars(
    db: &DatabaseConnection,
    tag: &TagModel,
    filter: Option<&str>,
) -> Result<Vec<StarModel>> {
    let mut select = tag
        .find_related(Star)
        .filter(StarColumn::DeletedAt.is_null());
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        select = select.filter(name_contains(filter));
    }
    select
        .order_by_asc(StarColumn::Name)
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Every live tag with its live star count, by name.
pub async fn list_tags_with_star_count(db: &DatabaseConnection) -> Result<Vec<TagWithCount>> {
    let tags = Tag::find()
        .filter(TagColumn::DeletedAt.is_null())
        .order_by_asc(TagColumn::Name)
        .all(db)
        .await?;

    let counts: Vec<(Uuid, i64)> = StarTag::find()
        .select_only()
        .column(StarTagColumn::TagId)
        .column_as(Expr::col((Star, StarColumn::Id)).count(), "star_count")
        .join(JoinType::InnerJoin, star_tag::Relation::Star.def())
        .filter(StarColumn::DeletedAt.is_null())
        .group_by(StarTagColumn::TagId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(tags
        .into_iter()
        .map(|tag| {
            let star_count = counts
                .iter()
                .find(|(id, _)| *id == tag.id)
                .map_or(0, |(_, count)| *count);
            TagWithCount { tag, star_count }
        })
        .collect())
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use super::*;
    use crate::connect_and_migrate;
    use crate::source::RemoteStar;
    use crate::store::{add_tag, find_or_create_service, load_tags, soft_delete_star, upsert_star};

    async fn setup_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate")
    }

    async fn star(db: &DatabaseConnection, id: &str, name: &str) -> StarModel {
        let (service, _) = find_or_create_service(db, "github").await.unwrap();
        let remote = RemoteStar {
            remote_id: id.to_string(),
            name: name.to_string(),
            full_name: format!("owner/{name}"),
            ..RemoteStar::default()
        };
        upsert_star(db, service.id, &remote, Utc::now())
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn find_or_create_ignores_case() {
        let db = setup_db().await;

        let (foo, created) = find_or_create_tag(&db, "Foo").await.unwrap();
        assert!(created);

        let (again, created) = find_or_create_tag(&db, "foo").await.unwrap();
        assert!(!created);
        assert_eq!(again.id, foo.id);
        assert_eq!(again.name, "Foo");
    }

    #[tokio::test]
    async fn find_or_create_folds_non_ascii_names() {
        let db = setup_db().await;

        let (upper, created) = find_or_create_tag(&db, "Ärger").await.unwrap();
        assert!(created);

        let (lower, created) = find_or_create_tag(&db, "ärger").await.unwrap();
        assert!(!created);
        assert_eq!(lower.id, upper.id);

        let (other, _) = find_or_create_tag(&db, "straße").await.unwrap();
        let err = rename_tag(&db, other, "ÄRGER").await.unwrap_err();
        assert!(matches!(err, StoreError::TagExists { ref name } if name == "Ärger"));
    }

    #[tokio::test]
    async fn rename_to_identical_name_is_an_error() {
        let db = setup_db().await;
        let (tag, _) = find_or_create_tag(&db, "rust").await.unwrap();

        let err = rename_tag(&db, tag, "rust").await.unwrap_err();
        assert!(matches!(err, StoreError::TagRenameUnchanged { .. }));
    }

    #[tokio::test]
    async fn rename_rejects_existing_name_in_any_case() {
        let db = setup_db().await;
        let (tag, _) = find_or_create_tag(&db, "rust").await.unwrap();
        find_or_create_tag(&db, "Go").await.unwrap();

        let err = rename_tag(&db, tag, "GO").await.unwrap_err();
        assert!(matches!(err, StoreError::TagExists { ref name } if name == "Go"));
    }

    #[tokio::test]
    async fn rename_may_change_case_only() {
        let db = setup_db().await;
        let (tag, _) = find_or_create_tag(&db, "rust").await.unwrap();

        let renamed = rename_tag(&db, tag, "Rust").await.unwrap();
        assert_eq!(renamed.name, "Rust");
    }

    #[tokio::test]
    async fn delete_removes_associations_but_keeps_stars() {
        let db = setup_db().await;
        let a = star(&db, "1", "a").await;
        let b = star(&db, "2", "b").await;
        let (tag, _) = find_or_create_tag(&db, "shared").await.unwrap();
        add_tag(&db, a.id, tag.id).await.unwrap();
        add_tag(&db, b.id, tag.id).await.unwrap();

        assert_eq!(delete_tag(&db, tag).await.unwrap(), 2);

        assert!(load_tags(&db, &a, None).await.unwrap().is_empty());
        assert!(load_tags(&db, &b, None).await.unwrap().is_empty());
        assert_eq!(Star::find().all(&db).await.unwrap().len(), 2);
        assert!(find_tag_by_name(&db, "shared").await.unwrap().is_none());
        assert!(StarTag::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_tag_name_can_be_reused() {
        let db = setup_db().await;
        let (tag, _) = find_or_create_tag(&db, "old").await.unwrap();
        delete_tag(&db, tag.clone()).await.unwrap();

        let (fresh, created) = find_or_create_tag(&db, "OLD").await.unwrap();
        assert!(created);
        assert_ne!(fresh.id, tag.id);
    }

    #[tokio::test]
    async fn load_stars_orders_and_filters() {
        let db = setup_db().await;
        let zeta = star(&db, "1", "zeta").await;
        let alpha = star(&db, "2", "alpha").await;
        let gone = star(&db, "3", "gone").await;
        let (tag, _) = find_or_create_tag(&db, "t").await.unwrap();
        for s in [&zeta, &alpha, &gone] {
            add_tag(&db, s.id, tag.id).await.unwrap();
        }
        soft_delete_star(&db, gone).await.unwrap();

        let stars = load_stars(&db, &tag, None).await.unwrap();
        let names: Vec<_> = stars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);

        let filtered = load_stars(&db, &tag, Some("ZET")).await.unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn tag_counts_only_live_stars() {
        let db = setup_db().await;
        let a = star(&db, "1", "a").await;
        let b = star(&db, "2", "b").await;
        let (busy, _) = find_or_create_tag(&db, "busy").await.unwrap();
        find_or_create_tag(&db, "idle").await.unwrap();
        add_tag(&db, a.id, busy.id).await.unwrap();
        add_tag(&db, b.id, busy.id).await.unwrap();
        soft_delete_star(&db, b).await.unwrap();

        let counts = list_tags_with_star_count(&db).await.unwrap();
        let summary: Vec<_> = counts
            .iter()
            .map(|c| (c.tag.name.as_str(), c.star_count))
            .collect();
        assert_eq!(summary, vec![("busy", 1), ("idle", 0)]);
    }
}
