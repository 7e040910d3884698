//! Tag commands: resolve a star by fuzzy query, then tag, untag, rename or
//! delete.
//!
//! Each operation returns plain data. Per-tag problems (unknown tag, tag not
//! on the star) are outcomes, not errors, so a multi-tag command reports every
//! tag.

use std::fmt;

use sea_orm::DatabaseConnection;

use crate::entity::prelude::{StarModel, TagModel};
use crate::store::{self, Result, StoreError};

/// Resolve `query` to exactly one live star.
///
/// # Errors
/// `NoStarMatch` when nothing matches, `AmbiguousStar` when several do.
pub async fn resolve_star(db: &DatabaseConnection, query: &str) -> Result<StarModel> {
    let mut stars = store::fuzzy_find_stars(db, query).await?;
    match stars.len() {
        0 => Err(StoreError::NoStarMatch {
            query: query.to_string(),
        }),
        1 => Ok(stars.remove(0)),
        _ => Err(StoreError::AmbiguousStar {
            query: query.to_string(),
            candidates: stars.into_iter().map(|s| s.full_name).collect(),
        }),
    }
}

/// Result of adding one tag to a star.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag was attached. `created` when the tag itself is new.
    Added { tag: String, created: bool },
    AlreadyTagged { star: String, tag: String },
}

impl fmt::Display for TagOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { tag, .. } => write!(f, "Added tag '{tag}'"),
            Self::AlreadyTagged { star, tag } => {
                write!(f, "'{star}' is already tagged with '{tag}'")
            }
        }
    }
}

/// Tag the star matching `query` with each of `tags`.
pub async fn tag_star(
    db: &DatabaseConnection,
    query: &str,
    tags: &[String],
) -> Result<(StarModel, Vec<TagOutcome>)> {
    if tags.is_empty() {
        return Err(StoreError::invalid_input(
            "You must specify a star and at least one tag",
        ));
    }

    let star = resolve_star(db, query).await?;
    let mut outcomes = Vec::with_capacity(tags.len());

    for name in tags {
        let (tag, created) = store::find_or_create_tag(db, name).await?;
        let outcome = if store::add_tag(db, star.id, tag.id).await? {
            TagOutcome::Added {
                tag: tag.name,
                created,
            }
        } else {
            TagOutcome::AlreadyTagged {
                star: star.full_name.clone(),
                tag: tag.name,
            }
        };
        outcomes.push(outcome);
    }

    Ok((star, outcomes))
}

/// Result of removing tags from a star.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntagOutcome {
    Removed { tag: String },
    RemovedAll { count: u64 },
    NoSuchTag { tag: String },
    NotTagged { star: String, tag: String },
}

impl UntagOutcome {
    /// Whether this outcome should be reported as an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::NoSuchTag { .. } | Self::NotTagged { .. })
    }
}

impl fmt::Display for UntagOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed { tag } => write!(f, "Removed tag '{tag}'"),
            Self::RemovedAll { .. } => write!(f, "Removed all tags"),
            Self::NoSuchTag { tag } => write!(f, "Tag '{tag}' does not exist"),
            Self::NotTagged { star, tag } => write!(f, "'{star}' isn't tagged with '{tag}'"),
        }
    }
}

/// Remove `tags` from the star matching `query`. An empty list removes every
/// tag.
pub async fn untag_star(
    db: &DatabaseConnection,
    query: &str,
    tags: &[String],
) -> Result<(StarModel, Vec<UntagOutcome>)> {
    let star = resolve_star(db, query).await?;

    if tags.is_empty() {
        let count = store::remove_all_tags(db, star.id).await?;
        return Ok((star, vec![UntagOutcome::RemovedAll { count }]));
    }

    let mut outcomes = Vec::with_capacity(tags.len());
    for name in tags {
        let outcome = match store::find_tag_by_name(db, name).await? {
            None => UntagOutcome::NoSuchTag { tag: name.clone() },
            Some(tag) => {
                if store::has_tag(db, star.id, tag.id).await? {
                    store::remove_tag(db, star.id, tag.id).await?;
                    UntagOutcome::Removed { tag: tag.name }
                } else {
                    UntagOutcome::NotTagged {
                        star: star.full_name.clone(),
                        tag: name.clone(),
                    }
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok((star, outcomes))
}

/// Rename the tag `old` to `new`.
///
/// # Errors
/// "Tag 'old' not found" when `old` is not a live tag, plus the store's
/// rename rules (identical name, name taken by another tag).
pub async fn rename_tag(db: &DatabaseConnection, old: &str, new: &str) -> Result<TagModel> {
    let tag = store::find_tag_by_name(db, old)
        .await?
        .ok_or_else(|| StoreError::tag_not_found(old))?;
    store::rename_tag(db, tag, new).await
}

/// Delete the tag `name` and its associations. Returns the deleted tag.
pub async fn delete_tag(db: &DatabaseConnection, name: &str) -> Result<TagModel> {
    let tag = store::find_tag_by_name(db, name)
        .await?
        .ok_or_else(|| StoreError::tag_not_found(name))?;
    let removed = store::delete_tag(db, tag.clone()).await?;
    tracing::debug!(tag = %tag.name, removed, "Deleted tag");
    Ok(tag)
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::connect_and_migrate;
    use crate::sync::testing::star;

    async fn setup() -> DatabaseConnection {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate");
        let (service, _) = store::find_or_create_service(&db, "github").await.unwrap();
        for (id, name) in [("1", "hoop33/limo"), ("2", "hoop33/limo-web"), ("3", "x/other")] {
            store::upsert_star(&db, service.id, &star(id, name), Utc::now())
                .await
                .unwrap();
        }
        db
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn resolve_star_requires_exactly_one_match() {
        let db = setup().await;

        assert_eq!(
            resolve_star(&db, "limo").await.unwrap().full_name,
            "hoop33/limo"
        );

        let err = resolve_star(&db, "missing").await.unwrap_err();
        assert_eq!(err.to_string(), "No stars match 'missing'");

        let err = resolve_star(&db, "hoop33").await.unwrap_err();
        match err {
            StoreError::AmbiguousStar { candidates, .. } => {
                assert_eq!(candidates, vec!["hoop33/limo", "hoop33/limo-web"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn tag_reports_each_tag() {
        let db = setup().await;
        tag_star(&db, "other", &names(&["rust"])).await.unwrap();

        let (_, outcomes) = tag_star(&db, "other", &names(&["Rust", "cli"]))
            .await
            .unwrap();
        assert_eq!(
            outcomes,
            vec![
                TagOutcome::AlreadyTagged {
                    star: "x/other".to_string(),
                    tag: "rust".to_string()
                },
                TagOutcome::Added {
                    tag: "cli".to_string(),
                    created: true
                },
            ]
        );
    }

    #[tokio::test]
    async fn tag_requires_tags() {
        let db = setup().await;
        let err = tag_star(&db, "other", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn untag_reports_unknown_and_missing_tags() {
        let db = setup().await;
        tag_star(&db, "other", &names(&["rust"])).await.unwrap();
        store::find_or_create_tag(&db, "go").await.unwrap();

        let (_, outcomes) = untag_star(&db, "other", &names(&["ghost", "go", "RUST"]))
            .await
            .unwrap();
        let messages: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Tag 'ghost' does not exist",
                "'x/other' isn't tagged with 'go'",
                "Removed tag 'rust'",
            ]
        );
        assert!(outcomes[0].is_error());
        assert!(!outcomes[2].is_error());
    }

    #[tokio::test]
    async fn untag_without_tags_removes_all() {
        let db = setup().await;
        let (star, _) = tag_star(&db, "other", &names(&["a", "b"])).await.unwrap();

        let (_, outcomes) = untag_star(&db, "other", &[]).await.unwrap();
        assert_eq!(outcomes, vec![UntagOutcome::RemovedAll { count: 2 }]);
        assert!(store::load_tags(&db, &star, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_and_delete_need_an_existing_tag() {
        let db = setup().await;

        let err = rename_tag(&db, "ghost", "spirit").await.unwrap_err();
        assert_eq!(err.to_string(), "Tag 'ghost' not found");

        let err = delete_tag(&db, "ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Tag 'ghost' not found");
    }

    #[tokio::test]
    async fn rename_to_same_name_fails() {
        let db = setup().await;
        store::find_or_create_tag(&db, "rust").await.unwrap();

        let err = rename_tag(&db, "rust", "rust").await.unwrap_err();
        assert!(matches!(err, StoreError::TagRenameUnchanged { .. }));
    }

    #[tokio::test]
    async fn delete_tag_untags_stars() {
        let db = setup().await;
        let (star, _) = tag_star(&db, "other", &names(&["doomed"])).await.unwrap();

        let deleted = delete_tag(&db, "DOOMED").await.unwrap();
        assert_eq!(deleted.name, "doomed");
        assert!(store::load_tags(&db, &star, None).await.unwrap().is_empty());
    }
}
