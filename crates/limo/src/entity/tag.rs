//! Tag entity - a user-defined label.
//!
//! Live tag names are unique under case-insensitive comparison. The store
//! enforces this against `name_folded`, the Unicode-lowercased name; the
//! schema has no unique index because soft-deleted tags keep their names.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(skip)]
    pub id: Uuid,
    pub name: String,
    #[serde(skip)]
    pub name_folded: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::star_tag::Entity")]
    StarTags,
}

impl Related<super::star_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StarTags.def()
    }
}

impl Related<super::star::Entity> for Entity {
    fn to() -> RelationDef {
        super::star_tag::Relation::Star.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::star_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
