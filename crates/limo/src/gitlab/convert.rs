//! Conversion from GitLab projects to normalized stars.

use chrono::{DateTime, Utc};

use super::types::GitLabProject;
use crate::source::{self, RemoteStar, SourceError};

/// Build a [`RemoteStar`] from a GitLab project.
///
/// GitLab does not report a primary language or star time in project
/// listings, so `language` is empty and `starred_at` is the time of the call.
pub fn to_remote_star(
    project: GitLabProject,
    starred_at: DateTime<Utc>,
) -> source::Result<RemoteStar> {
    let id = project
        .id
        .ok_or_else(|| SourceError::translation("ID from GitLab is required"))?;

    let owner = project
        .namespace
        .as_ref()
        .and_then(|ns| ns.full_path.clone().or_else(|| ns.path.clone()));

    let topics = if project.topics.is_empty() {
        project.tag_list
    } else {
        project.topics
    };

    Ok(RemoteStar {
        remote_id: id.to_string(),
        name: project.name,
        full_name: project.name_with_namespace,
        owner,
        avatar: project.avatar_url,
        description: project.description,
        homepage: project.web_url,
        url: project.http_url_to_repo,
        language: None,
        stargazers: project.star_count,
        watchers: None,
        forks: project.forks_count,
        size: None,
        pushed_at: project.last_activity_at,
        created_at: project.created_at,
        starred_at: Some(starred_at),
        topics,
    })
}
