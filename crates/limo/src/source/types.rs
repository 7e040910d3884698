use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{Result, SourceError};

/// A starred repository normalized from a remote API response.
///
/// This is the value that travels from a source through the sync channel to
/// the store. It is not bound to a local service row yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStar {
    /// Provider-native identifier (decimal id for GitHub and GitLab).
    pub remote_id: String,
    pub name: String,
    pub full_name: String,
    pub owner: Option<String>,
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    /// Clone URL.
    pub url: Option<String>,
    pub language: Option<String>,
    pub stargazers: i32,
    pub watchers: Option<i32>,
    pub forks: Option<i32>,
    pub size: Option<i32>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub starred_at: Option<DateTime<Utc>>,
    /// Remote topics; attached to the local star as tags.
    #[serde(default)]
    pub topics: Vec<String>,
}

/// One page of starred repositories.
#[derive(Debug, Clone, Default)]
pub struct StarPage {
    /// Records in the order the API returned them. A record that could not be
    /// translated is kept in place as an error.
    pub stars: Vec<Result<RemoteStar>>,
    /// Total page count reported by the remote (1-based).
    pub last_page: u32,
}

/// Something that happened on a hosting service ("alice starred bob/limo").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub who: String,
    pub what: String,
    pub which: String,
    pub url: Option<String>,
    pub when: DateTime<Utc>,
}

pub(crate) const DEFAULT_EVENT_WHO: &str = "somebody";
pub(crate) const DEFAULT_EVENT_WHAT: &str = "did something with";
pub(crate) const DEFAULT_EVENT_WHICH: &str = "some repository";

/// Verb phrase for a GitHub-style event type, if known.
pub fn describe_event_type(event_type: &str) -> Option<&'static str> {
    let verb = match event_type {
        "CreateEvent" => "created",
        "DeleteEvent" => "deleted",
        "ForkEvent" => "forked",
        "IssueCommentEvent" => "commented on an issue on",
        "IssuesEvent" => "opened an issue on",
        "MemberEvent" => "added someone to",
        "PublicEvent" => "made public",
        "PullRequestEvent" => "opened a pull request on",
        "PushEvent" => "pushed to",
        "ReleaseEvent" => "released",
        "WatchEvent" => "starred",
        _ => return None,
    };
    Some(verb)
}

/// A repository named by the user on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Service derived from a URL host, with the TLD dropped ("github").
    pub service: Option<String>,
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse a full URL (`https://github.com/owner/repo`), `owner/repo`, or
    /// the two values `owner repo`.
    pub fn parse(values: &[String]) -> Result<Self> {
        let input = values.join(" ");
        let parts: Vec<String> = match values {
            [single] => single
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .trim_end_matches(".git")
                .split('/')
                .map(str::to_string)
                .collect(),
            _ => values.to_vec(),
        };

        let (host, owner, repo) = match parts.as_slice() {
            [host, owner, repo] => (Some(host.as_str()), owner, repo),
            [owner, repo] => (None, owner, repo),
            _ => return Err(SourceError::InvalidRepoRef { input }),
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(SourceError::InvalidRepoRef { input });
        }

        let service = host.map(|h| match h.rfind('.') {
            Some(n) => h[..n].to_string(),
            None => h.to_string(),
        });

        Ok(Self {
            service,
            owner: owner.clone(),
            repo: repo.clone(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Reads a secret from the user. Implemented by the CLI.
pub trait CredentialPrompt: Send + Sync {
    fn ask_secret(&self, question: &str) -> std::io::Result<String>;
}

/// A remote hosting service that can list the user's starred repositories.
#[async_trait]
pub trait StarSource: Send + Sync {
    /// Lowercase registry key ("github", "gitlab").
    fn name(&self) -> &'static str;

    /// Obtain an API token from the user.
    fn login(&self, prompt: &dyn CredentialPrompt) -> Result<String>;

    /// Fetch one 1-based page of starred repositories. An empty `user` means
    /// the authenticated caller.
    async fn fetch_stars_page(&self, token: &str, user: &str, page: u32) -> Result<StarPage>;

    /// Star a repository remotely and return its normalized record.
    async fn add_star(&self, token: &str, repo: &RepoRef) -> Result<RemoteStar>;

    /// Unstar a repository remotely and return its normalized record.
    async fn remove_star(&self, token: &str, repo: &RepoRef) -> Result<RemoteStar>;

    /// Recent events visible to `user`, `count` pages starting at `page`.
    async fn fetch_events(
        &self,
        _token: &str,
        _user: &str,
        _page: u32,
        _count: u32,
    ) -> Result<Vec<RemoteEvent>> {
        Err(SourceError::not_supported(format!(
            "{} does not support events",
            self.name()
        )))
    }

    /// Trending repositories, optionally for one language.
    async fn fetch_trending(&self, _token: &str, _language: &str) -> Result<Vec<RemoteStar>> {
        Err(SourceError::not_supported(format!(
            "{} does not support trending",
            self.name()
        )))
    }
}

/// Ask for a token using the standard question for a service.
pub(crate) fn prompt_for_token(
    prompt: &dyn CredentialPrompt,
    service_title: &str,
) -> Result<String> {
    let token = prompt
        .ask_secret(&format!("Enter your {service_title} API token"))
        .map_err(|e| SourceError::Prompt {
            message: e.to_string(),
        })?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(SourceError::Prompt {
            message: "token is required".to_string(),
        });
    }
    Ok(token)
}
