//! SeaORM entity definitions for the limo database schema.

pub mod prelude;
pub mod service;
pub mod star;
pub mod star_tag;
pub mod tag;
