//! Conversion from GitHub API types to normalized source types.

use chrono::{DateTime, Utc};

use super::types::{GitHubEvent, GitHubRepo};
use crate::source::{self, RemoteEvent, RemoteStar, SourceError, describe_event_type};

/// Build a [`RemoteStar`] from a GitHub repository.
///
/// # Errors
/// Fails when the repository has no id, since the id is the reconciliation key.
pub fn to_remote_star(
    repo: GitHubRepo,
    starred_at: Option<DateTime<Utc>>,
) -> source::Result<RemoteStar> {
    let id = repo
        .id
        .ok_or_else(|| SourceError::translation("ID from GitHub is required"))?;

    let (owner, avatar) = match repo.owner {
        Some(owner) => (owner.login, owner.avatar_url),
        None => (None, None),
    };

    Ok(RemoteStar {
        remote_id: id.to_string(),
        name: repo.name,
        full_name: repo.full_name,
        owner,
        avatar,
        description: repo.description,
        homepage: repo.homepage,
        url: repo.clone_url,
        language: repo.language,
        stargazers: repo.stargazers_count.unwrap_or(0),
        watchers: repo.watchers_count,
        forks: repo.forks_count,
        size: repo.size,
        pushed_at: repo.pushed_at,
        created_at: repo.created_at,
        starred_at,
        topics: repo.topics,
    })
}

/// Build a [`RemoteEvent`], filling gaps with neutral wording.
pub fn to_remote_event(event: GitHubEvent) -> RemoteEvent {
    use crate::source::types::{DEFAULT_EVENT_WHAT, DEFAULT_EVENT_WHICH, DEFAULT_EVENT_WHO};

    let who = event
        .actor
        .and_then(|a| a.login)
        .unwrap_or_else(|| DEFAULT_EVENT_WHO.to_string());
    let what = event
        .event_type
        .as_deref()
        .and_then(describe_event_type)
        .unwrap_or(DEFAULT_EVENT_WHAT)
        .to_string();
    let repo_name = event.repo.and_then(|r| r.name);
    let url = repo_name
        .as_ref()
        .map(|name| format!("https://github.com/{name}"));
    let which = repo_name.unwrap_or_else(|| DEFAULT_EVENT_WHICH.to_string());

    RemoteEvent {
        who,
        what,
        which,
        url,
        when: event.created_at.unwrap_or_else(Utc::now),
    }
}
