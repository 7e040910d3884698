//! Common re-exports for convenient entity usage.

pub use super::service::{
    ActiveModel as ServiceActiveModel, Column as ServiceColumn, Entity as Service,
    Model as ServiceModel,
};
pub use super::star::{
    ActiveModel as StarActiveModel, Column as StarColumn, Entity as Star, Model as StarModel,
};
pub use super::star_tag::{
    ActiveModel as StarTagActiveModel, Column as StarTagColumn, Entity as StarTag,
    Model as StarTagModel,
};
pub use super::tag::{
    ActiveModel as TagActiveModel, Column as TagColumn, Entity as Tag, Model as TagModel,
};
