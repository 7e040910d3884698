//! Star entity - a remote repository starred on a service.
//!
//! The pair `(service_id, remote_id)` is unique and is the key used when
//! reconciling remote data with local rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Star model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stars")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip)]
    pub id: Uuid,

    /// Owning service.
    #[serde(skip)]
    pub service_id: Uuid,

    /// Provider-native identifier, stored as an opaque string.
    pub remote_id: String,

    // ─── Naming ──────────────────────────────────────────────────────────────
    /// Display name (e.g. "limo").
    pub name: String,
    /// Fully-qualified name (e.g. "hoop33/limo").
    pub full_name: String,
    /// Lowercased `name`, the column case-insensitive lookups compare against.
    #[serde(skip)]
    pub name_folded: String,
    #[serde(skip)]
    pub full_name_folded: String,
    pub owner: Option<String>,
    pub avatar: Option<String>,

    // ─── Content ─────────────────────────────────────────────────────────────
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub homepage: Option<String>,
    /// Clone URL.
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(skip)]
    pub language_folded: Option<String>,

    // ─── Statistics ──────────────────────────────────────────────────────────
    pub stargazers: i32,
    pub watchers: Option<i32>,
    pub forks: Option<i32>,
    pub size: Option<i32>,

    // ─── Remote timestamps ───────────────────────────────────────────────────
    pub pushed_at: Option<DateTimeWithTimeZone>,
    pub remote_created_at: Option<DateTimeWithTimeZone>,
    pub starred_at: Option<DateTimeWithTimeZone>,

    // ─── Local bookkeeping ───────────────────────────────────────────────────
    pub created_at: DateTimeWithTimeZone,
    /// Last-touched timestamp. Refreshed on every upsert and compared against
    /// the service's `last_success` when computing prunable stars.
    pub updated_at: DateTimeWithTimeZone,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Service,
    #[sea_orm(has_many = "super::star_tag::Entity")]
    StarTags,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::star_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StarTags.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::star_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::star_tag::Relation::Star.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this star has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The URL to open for this star, preferring the homepage when asked and
    /// when one is set.
    pub fn browse_url(&self, prefer_homepage: bool) -> Option<&str> {
        let homepage = self.homepage.as_deref().filter(|h| !h.is_empty());
        let url = self.url.as_deref().filter(|u| !u.is_empty());
        if prefer_homepage {
            homepage.or(url)
        } else {
            url.or(homepage)
        }
    }
}
