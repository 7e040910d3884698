//! GitHub REST client implementing [`StarSource`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;

use super::convert::{to_remote_event, to_remote_star};
use super::pagination::parse_link_header;
use super::types::{GitHubEvent, GitHubRepo, GitHubSearch, GitHubStarred, GitHubUser};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, endpoint};
use crate::source::types::prompt_for_token;
use crate::source::{
    self, CredentialPrompt, RemoteEvent, RemoteStar, RepoRef, SourceError, StarPage, StarSource,
};

/// Default GitHub API base URL.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Starred repositories requested per page (the API maximum).
const STARS_PER_PAGE: &str = "100";

/// Events requested per page.
const EVENTS_PER_PAGE: &str = "30";

/// Repositories returned by `list trending`.
const TRENDING_PER_PAGE: &str = "25";

/// How far back a repository's creation may lie to count as trending.
const TRENDING_WINDOW_DAYS: i64 = 7;

const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Search query for repositories created after `since`, optionally in one
/// language.
pub(crate) fn trending_query(language: &str, since: NaiveDate) -> String {
    let mut query = format!("created:>{}", since.format("%Y-%m-%d"));
    let language = language.trim();
    if !language.is_empty() {
        query.push_str(" language:");
        query.push_str(language);
    }
    query
}

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
}

impl GitHubClient {
    /// Create a client for `api_url` (e.g. `https://api.github.com`, or
    /// `https://ghe.example.com/api/v3` for GitHub Enterprise).
    pub fn new(api_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &[&str],
        query: &[(&str, &str)],
        token: &str,
        accept: &str,
    ) -> source::Result<HttpRequest> {
        let url = endpoint(&self.api_url, path, query)
            .map_err(|e| SourceError::invalid_url(e.to_string()))?;
        let request = HttpRequest::new(method, url)
            .header("Accept", accept)
            .header("User-Agent", "limo")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if token.is_empty() {
            Ok(request)
        } else {
            Ok(request.header("Authorization", format!("Bearer {token}")))
        }
    }

    async fn send(&self, request: HttpRequest) -> source::Result<HttpResponse> {
        let url = request.url.clone();
        tracing::debug!(method = request.method.as_str(), url = %url, "GitHub request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| SourceError::network(e.to_string()))?;

        if !response.is_success() {
            return Err(SourceError::from_status(response.status, &response.text()));
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> source::Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| SourceError::invalid_response(format!("GitHub: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
        token: &str,
    ) -> source::Result<T> {
        let request = self.request(HttpMethod::Get, path, query, token, JSON_MEDIA_TYPE)?;
        let response = self.send(request).await?;
        Self::decode(&response)
    }

    async fn get_repo(&self, token: &str, repo: &RepoRef) -> source::Result<GitHubRepo> {
        self.get_json(&["repos", repo.owner.as_str(), repo.repo.as_str()], &[], token)
            .await
    }

    /// Login of the authenticated user.
    async fn authenticated_login(&self, token: &str) -> source::Result<String> {
        let user: GitHubUser = self.get_json(&["user"], &[], token).await?;
        Ok(user.login)
    }

    /// PUT or DELETE `/user/starred/{owner}/{repo}`.
    async fn set_starred(
        &self,
        method: HttpMethod,
        token: &str,
        repo: &RepoRef,
    ) -> source::Result<()> {
        let path = ["user", "starred", repo.owner.as_str(), repo.repo.as_str()];
        let request = self.request(method, &path, &[], token, JSON_MEDIA_TYPE)?;
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl StarSource for GitHubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    fn login(&self, prompt: &dyn CredentialPrompt) -> source::Result<String> {
        prompt_for_token(prompt, "GitHub")
    }

    async fn fetch_stars_page(
        &self,
        token: &str,
        user: &str,
        page: u32,
    ) -> source::Result<StarPage> {
        let page_param = page.to_string();
        let query = [("per_page", STARS_PER_PAGE), ("page", page_param.as_str())];
        let path = if user.is_empty() {
            vec!["user", "starred"]
        } else {
            vec!["users", user, "starred"]
        };
        let request = self.request(HttpMethod::Get, &path, &query, token, STAR_MEDIA_TYPE)?;
        let response = self.send(request).await?;

        let last_page = response
            .header("link")
            .map(parse_link_header)
            .unwrap_or_default()
            .last_page_from(page);

        let items: Vec<GitHubStarred> = Self::decode(&response)?;
        let stars = items
            .into_iter()
            .map(|item| to_remote_star(item.repo, item.starred_at))
            .collect();

        Ok(StarPage { stars, last_page })
    }

    async fn add_star(&self, token: &str, repo: &RepoRef) -> source::Result<RemoteStar> {
        self.set_starred(HttpMethod::Put, token, repo).await?;
        let details = self.get_repo(token, repo).await?;
        to_remote_star(details, Some(Utc::now()))
    }

    async fn remove_star(&self, token: &str, repo: &RepoRef) -> source::Result<RemoteStar> {
        self.set_starred(HttpMethod::Delete, token, repo).await?;
        let details = self.get_repo(token, repo).await?;
        to_remote_star(details, None)
    }

    async fn fetch_events(
        &self,
        token: &str,
        user: &str,
        page: u32,
        count: u32,
    ) -> source::Result<Vec<RemoteEvent>> {
        let login = if user.is_empty() {
            self.authenticated_login(token).await?
        } else {
            user.to_string()
        };

        let mut events = Vec::new();
        for current in page..page.saturating_add(count.max(1)) {
            let current = current.to_string();
            let batch: Vec<GitHubEvent> = self
                .get_json(
                    &["users", login.as_str(), "received_events"],
                    &[("per_page", EVENTS_PER_PAGE), ("page", current.as_str())],
                    token,
                )
                .await?;
            if batch.is_empty() {
                break;
            }
            events.extend(batch.into_iter().map(to_remote_event));
        }
        Ok(events)
    }

    /// Most-starred repositories created in the last week, via the search
    /// API. Records that fail to translate are skipped.
    async fn fetch_trending(&self, token: &str, language: &str) -> source::Result<Vec<RemoteStar>> {
        let since = Utc::now().date_naive() - Duration::days(TRENDING_WINDOW_DAYS);
        let q = trending_query(language, since);
        let query = [
            ("q", q.as_str()),
            ("sort", "stars"),
            ("order", "desc"),
            ("per_page", TRENDING_PER_PAGE),
        ];
        let found: GitHubSearch = self
            .get_json(&["search", "repositories"], &query, token)
            .await?;

        Ok(found
            .items
            .into_iter()
            .filter_map(|repo| match to_remote_star(repo, None) {
                Ok(star) => Some(star),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping trending repository");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    const API: &str = "https://api.github.test";

    fn client(mock: &MockTransport) -> GitHubClient {
        GitHubClient::new(API, Arc::new(mock.clone()))
    }

    fn starred_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "starred_at": "2024-03-01T12:00:00Z",
            "repo": {
                "id": id,
                "name": name,
                "full_name": format!("owner/{name}"),
                "owner": { "login": "owner", "avatar_url": null },
                "description": "a repo",
                "homepage": null,
                "clone_url": format!("https://github.com/owner/{name}.git"),
                "language": "Rust",
                "stargazers_count": 7,
                "watchers_count": 7,
                "forks_count": 1,
                "size": 12,
                "pushed_at": "2024-02-01T00:00:00Z",
                "created_at": "2023-01-01T00:00:00Z",
                "topics": ["cli"]
            }
        })
    }

    #[tokio::test]
    async fn fetches_a_page_with_link_pagination() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user/starred?per_page=100&page=1"),
            200,
            &[(
                "Link",
                r#"<https://api.github.test/user/starred?per_page=100&page=2>; rel="next", <https://api.github.test/user/starred?per_page=100&page=3>; rel="last""#,
            )],
            serde_json::json!([starred_json(1, "a"), starred_json(2, "b")]),
        );

        let page = client(&mock)
            .fetch_stars_page("ghp_token", "", 1)
            .await
            .expect("page should load");

        assert_eq!(page.last_page, 3);
        let names: Vec<_> = page
            .stars
            .iter()
            .map(|s| s.as_ref().expect("translated").full_name.clone())
            .collect();
        assert_eq!(names, vec!["owner/a", "owner/b"]);

        let requests = mock.requests();
        assert_eq!(
            requests[0].header_value("authorization"),
            Some("Bearer ghp_token")
        );
        assert_eq!(requests[0].header_value("accept"), Some(STAR_MEDIA_TYPE));
    }

    #[tokio::test]
    async fn named_user_uses_users_endpoint_and_single_page_without_link() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/users/alice/starred?per_page=100&page=1"),
            200,
            &[],
            serde_json::json!([starred_json(1, "a")]),
        );

        let page = client(&mock).fetch_stars_page("", "alice", 1).await.unwrap();
        assert_eq!(page.last_page, 1);
        assert!(mock.requests()[0].header_value("authorization").is_none());
    }

    #[tokio::test]
    async fn record_without_id_is_a_per_record_error() {
        let mock = MockTransport::new();
        let mut broken = starred_json(0, "broken");
        broken["repo"]["id"] = serde_json::Value::Null;
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user/starred?per_page=100&page=1"),
            200,
            &[],
            serde_json::json!([starred_json(1, "a"), broken]),
        );

        let page = client(&mock).fetch_stars_page("t", "", 1).await.unwrap();
        assert!(page.stars[0].is_ok());
        assert!(matches!(
            page.stars[1],
            Err(SourceError::Translation { .. })
        ));
    }

    #[tokio::test]
    async fn api_errors_surface_status() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user/starred?per_page=100&page=1"),
            401,
            &[],
            serde_json::json!({"message": "Bad credentials"}),
        );

        let err = client(&mock).fetch_stars_page("bad", "", 1).await.unwrap_err();
        assert!(matches!(err, SourceError::AuthRequired { .. }));
    }

    #[tokio::test]
    async fn transport_failures_are_network_errors() {
        let mock = MockTransport::new();
        mock.push_failure(
            HttpMethod::Get,
            format!("{API}/user/starred?per_page=100&page=2"),
            "connection reset",
        );

        let err = client(&mock).fetch_stars_page("t", "", 2).await.unwrap_err();
        assert!(matches!(err, SourceError::Network { .. }));
    }

    #[tokio::test]
    async fn add_star_puts_then_reads_repository() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Put,
            format!("{API}/user/starred/owner/a"),
            HttpResponse {
                status: 204,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/repos/owner/a"),
            200,
            &[],
            starred_json(1, "a")["repo"].clone(),
        );

        let repo = RepoRef {
            service: None,
            owner: "owner".to_string(),
            repo: "a".to_string(),
        };
        let star = client(&mock).add_star("t", &repo).await.unwrap();
        assert_eq!(star.remote_id, "1");
        assert!(star.starred_at.is_some());
    }

    #[tokio::test]
    async fn events_resolve_authenticated_login() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user"),
            200,
            &[],
            serde_json::json!({"login": "alice"}),
        );
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/users/alice/received_events?per_page=30&page=1"),
            200,
            &[],
            serde_json::json!([{
                "type": "WatchEvent",
                "actor": {"login": "bob"},
                "repo": {"name": "hoop33/limo"},
                "created_at": "2024-03-01T12:00:00Z"
            }]),
        );

        let events = client(&mock).fetch_events("t", "", 1, 1).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].who, "bob");
        assert_eq!(events[0].what, "starred");
    }

    #[tokio::test]
    async fn user_names_are_escaped_in_the_path() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/users/al%20ice%3F/starred?per_page=100&page=1"),
            200,
            &[],
            serde_json::json!([]),
        );

        let page = client(&mock).fetch_stars_page("", "al ice?", 1).await.unwrap();
        assert!(page.stars.is_empty());
    }

    #[test]
    fn trending_query_adds_language_when_given() {
        let since = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(trending_query("", since), "created:>2025-03-01");
        assert_eq!(
            trending_query(" rust ", since),
            "created:>2025-03-01 language:rust"
        );
    }

    #[tokio::test]
    async fn trending_searches_recent_repositories_by_stars() {
        let since = (Utc::now().date_naive() - Duration::days(TRENDING_WINDOW_DAYS))
            .format("%Y-%m-%d")
            .to_string();
        let mut broken = starred_json(0, "broken")["repo"].clone();
        broken["id"] = serde_json::Value::Null;

        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!(
                "{API}/search/repositories?q=created%3A%3E{since}+language%3Arust&sort=stars&order=desc&per_page=25"
            ),
            200,
            &[],
            serde_json::json!({
                "total_count": 2,
                "items": [starred_json(1, "hot")["repo"].clone(), broken]
            }),
        );

        let stars = client(&mock).fetch_trending("t", "rust").await.unwrap();
        assert_eq!(stars.len(), 1);
        assert_eq!(stars[0].full_name, "owner/hot");
        assert!(stars[0].starred_at.is_none());
    }
}
