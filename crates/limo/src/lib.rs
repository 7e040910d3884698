//! Limo - keep a local, taggable copy of your starred repositories.
//!
//! This library mirrors the stars of a GitHub or GitLab account into a local
//! database, lets you tag and search them offline, and prunes stars that the
//! remote no longer reports.
//!
//! # Features
//!
//! - `github` / `gitlab` - Remote adapters, backed by reqwest.
//! - `sqlite` - SQLite driver for sea-orm.
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//!
//! # Example
//!
//! ```ignore
//! use limo::source::{ServiceRegistry, SourceOptions};
//! use limo::sync::{SyncOptions, sync_service};
//! use limo::connect_and_migrate;
//!
//! let db = connect_and_migrate("sqlite://limo.db?mode=rwc").await?;
//! let registry = ServiceRegistry::with_defaults(&SourceOptions::default())?;
//!
//! let summary = sync_service(&db, registry.for_name("github"), &token, &SyncOptions::default(), None).await?;
//! println!("{summary}");
//!
//! let prunable = limo::prune::prune_service(&db, "github", false).await?;
//! ```

pub mod db;
pub mod entity;
pub mod http;
pub mod prune;
pub mod source;
pub mod starring;
pub mod store;
pub mod sync;
pub mod tagging;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "gitlab")]
pub mod gitlab;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use source::{ServiceRegistry, SourceError, StarSource};
pub use store::StoreError;
pub use sync::{SyncError, SyncSummary};
