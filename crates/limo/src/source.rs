//! Remote star sources.
//!
//! A [`StarSource`] is one hosting service (GitHub, GitLab) seen through the
//! capabilities the sync pipeline needs: logging in, paging through starred
//! repositories, and the optional event and trending feeds. Unknown service
//! names resolve to [`NotFound`], which fails every call.

mod errors;
mod not_found;
mod registry;
pub(crate) mod types;

pub use errors::{Result, SourceError};
pub use not_found::NotFound;
pub use registry::{ServiceRegistry, SourceOptions};
pub use types::{
    CredentialPrompt, RemoteEvent, RemoteStar, RepoRef, StarPage, StarSource, describe_event_type,
};
