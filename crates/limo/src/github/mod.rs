//! GitHub star source.
//!
//! Talks to the REST API directly through the [`HttpTransport`](crate::http::HttpTransport)
//! seam: starred repositories come from `/user/starred` with the
//! `application/vnd.github.star+json` media type so each record carries its
//! `starred_at` timestamp, and pagination follows the `Link` header.

mod client;
mod convert;
mod pagination;
mod types;

pub use client::{GITHUB_API_URL, GitHubClient};
pub use convert::{to_remote_event, to_remote_star};
pub use pagination::{LinkPagination, parse_link_header};
pub use types::{GitHubEvent, GitHubRepo, GitHubStarred};
