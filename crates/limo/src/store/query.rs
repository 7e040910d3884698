use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::entity::prelude::*;

use super::errors::{Result, StoreError};
use super::{contains_pattern, fold};

// ─── Query Operations ────────────────────────────────────────────────────────

/// Live stars, optionally restricted to full names containing `pattern`.
fn live_stars(pattern: Option<&str>) -> Select<Star> {
    let mut select = Star::find().filter(StarColumn::DeletedAt.is_null());
    if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
        select = select.filter(StarColumn::FullNameFolded.like(contains_pattern(pattern)));
    }
    select.order_by_asc(StarColumn::FullName)
}

/// Ids of stars carrying the live tag `tag` (case-insensitive).
fn tagged_with(tag: &str) -> SelectStatement {
    Query::select()
        .column((StarTag, StarTagColumn::StarId))
        .from(StarTag)
        .inner_join(
            Tag,
            Expr::col((Tag, TagColumn::Id)).equals((StarTag, StarTagColumn::TagId)),
        )
        .and_where(Expr::col((Tag, TagColumn::DeletedAt)).is_null())
        .and_where(Expr::col((Tag, TagColumn::NameFolded)).eq(fold(tag)))
        .to_owned()
}

fn language_is(language: &str) -> Condition {
    Condition::all().add(StarColumn::LanguageFolded.eq(fold(language)))
}

pub async fn find_stars(db: &DatabaseConnection, pattern: Option<&str>) -> Result<Vec<StarModel>> {
    live_stars(pattern).all(db).await.map_err(StoreError::from)
}

/// Live stars without any tag association.
pub async fn find_untagged_stars(
    db: &DatabaseConnection,
    pattern: Option<&str>,
) -> Result<Vec<StarModel>> {
    let associated = Query::select()
        .column(StarTagColumn::StarId)
        .from(StarTag)
        .to_owned();
    live_stars(pattern)
        .filter(StarColumn::Id.not_in_subquery(associated))
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Live stars whose language matches `language`, ignoring case.
pub async fn find_stars_by_language(
    db: &DatabaseConnection,
    pattern: Option<&str>,
    language: &str,
) -> Result<Vec<StarModel>> {
    live_stars(pattern)
        .filter(language_is(language))
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Live stars tagged `tag` and (or, when `any` is set) written in `language`.
pub async fn find_stars_by_language_and_or_tag(
    db: &DatabaseConnection,
    pattern: Option<&str>,
    language: &str,
    tag: &str,
    any: bool,
) -> Result<Vec<StarModel>> {
    let base = if any { Condition::any() } else { Condition::all() };
    let condition = base
        .add(StarColumn::Id.in_subquery(tagged_with(tag)))
        .add(language_is(language));
    live_stars(pattern)
        .filter(condition)
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Distinct non-empty languages of live stars, sorted.
pub async fn find_languages(db: &DatabaseConnection) -> Result<Vec<String>> {
    Star::find()
        .select_only()
        .column(StarColumn::Language)
        .distinct()
        .filter(StarColumn::DeletedAt.is_null())
        .filter(StarColumn::Language.is_not_null())
        .filter(StarColumn::Language.ne(""))
        .order_by_asc(StarColumn::Language)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(StoreError::from)
}

/// Count live stars, optionally by language and/or tag.
pub async fn count_stars(
    db: &DatabaseConnection,
    language: Option<&str>,
    tag: Option<&str>,
) -> Result<u64> {
    let mut select = Star::find().filter(StarColumn::DeletedAt.is_null());
    if let Some(language) = language.filter(|l| !l.is_empty()) {
        select = select.filter(language_is(language));
    }
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        select = select.filter(StarColumn::Id.in_subquery(tagged_with(tag)));
    }
    select.count(db).await.map_err(StoreError::from)
}

/// Live stars of `service` not touched since its last successful sync began.
///
/// A service that has never synced has nothing to prune.
pub async fn find_prunable_stars(
    db: &DatabaseConnection,
    service: &ServiceModel,
) -> Result<Vec<StarModel>> {
    let Some(last_success) = service.last_success else {
        return Ok(Vec::new());
    };

    Star::find()
        .filter(StarColumn::ServiceId.eq(service.id))
        .filter(StarColumn::DeletedAt.is_null())
        .filter(StarColumn::UpdatedAt.lt(last_success))
        .order_by_asc(StarColumn::FullName)
        .all(db)
        .await
        .map_err(StoreError::from)
}
