//! GitHub API data types.
//!
//! Only the fields limo stores are declared. Most are optional because the
//! API omits or nulls them for some repositories.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Item of `/user/starred` when requested with the `star+json` media type.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubStarred {
    pub starred_at: Option<DateTime<Utc>>,
    pub repo: GitHubRepo,
}

/// Repository as returned by the REST API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubRepo {
    /// Numeric repository id. Required to build a star.
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub owner: Option<GitHubOwner>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub clone_url: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: Option<i32>,
    pub watchers_count: Option<i32>,
    pub forks_count: Option<i32>,
    pub size: Option<i32>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubOwner {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

/// Body of `/search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubSearch {
    #[serde(default)]
    pub items: Vec<GitHubRepo>,
}

/// Item of `/users/{user}/received_events`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub actor: Option<GitHubActor>,
    pub repo: Option<GitHubEventRepo>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubActor {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEventRepo {
    pub name: Option<String>,
}

/// Authenticated user (`/user`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GitHubUser {
    pub login: String,
}
