//! Service entity - one remote hosting account context (e.g. "github").

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Service model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Registry name of the service. Unique, compared case-sensitively.
    #[sea_orm(unique)]
    pub name: String,

    /// Start time of the most recent sync run that touched at least one star.
    /// `None` means the service has never been synced.
    pub last_success: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A service has many stars.
    #[sea_orm(has_many = "super::star::Entity")]
    Stars,
}

impl Related<super::star::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stars.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether a sync run has ever completed for this service.
    pub fn has_synced(&self) -> bool {
        self.last_success.is_some()
    }
}
