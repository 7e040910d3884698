//! GitLab API data types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GitLab project - the fields limo stores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitLabProject {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    /// Human-readable full name (e.g. "GitLab.org / GitLab").
    #[serde(default)]
    pub name_with_namespace: String,
    pub description: Option<String>,
    pub web_url: Option<String>,
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub star_count: i32,
    pub forks_count: Option<i32>,
    pub avatar_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub namespace: Option<GitLabNamespace>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Older GitLab versions report topics as `tag_list`.
    #[serde(default)]
    pub tag_list: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitLabNamespace {
    pub path: Option<String>,
    pub full_path: Option<String>,
}
