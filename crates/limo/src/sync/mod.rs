//! Star synchronization pipeline.
//!
//! A producer task walks the remote pages of starred repositories and sends
//! one [`StarMessage`] per record (or per failed page) over a bounded
//! channel. The consumer drains the channel in order and upserts each star
//! into the local store.
//!
//! ```text
//! StarSource → produce_stars → mpsc channel → consume_stars → store
//! ```
//!
//! # Module Structure
//!
//! - [`types`] - messages, options and the run summary
//! - [`progress`] - progress events: `SyncProgress`, `ProgressCallback`, `emit()`
//! - `producer` / `consumer` - the two halves of the pipeline
//! - `engine` - [`sync_service`], which wires them together
//!
//! # Example
//!
//! ```ignore
//! use limo::sync::{SyncOptions, sync_service};
//!
//! let summary = sync_service(&db, source, &token, &SyncOptions::default(), None).await?;
//! println!("{summary}");
//! ```

mod consumer;
mod engine;
mod producer;
pub mod progress;
pub mod types;

pub use consumer::{ConsumeStats, consume_stars};
pub use engine::{SyncError, sync_service};
pub use producer::{produce_stars, spawn_star_producer};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{DEFAULT_CHANNEL_CAPACITY, FetchFailure, StarMessage, SyncOptions, SyncSummary};
