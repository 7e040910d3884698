//! GitLab star source.
//!
//! Starred projects come from `/projects?starred=true` (or
//! `/users/{user}/starred_projects`), authenticated with a personal access
//! token in the `PRIVATE-TOKEN` header. The page count is read from
//! `X-Total-Pages`.

mod client;
mod convert;
mod types;

pub use client::GitLabClient;
pub use convert::to_remote_star;
pub use types::{GitLabNamespace, GitLabProject};
