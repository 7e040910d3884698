//! GitLab REST client implementing [`StarSource`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;

use super::convert::to_remote_star;
use super::types::GitLabProject;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, endpoint};
use crate::source::types::prompt_for_token;
use crate::source::{
    self, CredentialPrompt, RemoteEvent, RemoteStar, RepoRef, SourceError, StarPage, StarSource,
};

/// Projects requested per page (the API maximum).
const PROJECTS_PER_PAGE: &str = "100";

/// GitLab API client.
#[derive(Clone)]
pub struct GitLabClient {
    transport: Arc<dyn HttpTransport>,
    /// API base URL including `/api/v4`.
    api_url: String,
}

impl GitLabClient {
    /// Create a client for `host` ("gitlab.com", "https://gitlab.example.com").
    pub fn new(host: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let host = host.trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            transport,
            api_url: format!("{base}/api/v4"),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &[&str],
        query: &[(&str, &str)],
        token: &str,
    ) -> source::Result<HttpResponse> {
        let url = endpoint(&self.api_url, path, query)
            .map_err(|e| SourceError::invalid_url(e.to_string()))?;
        let mut request = HttpRequest::new(method, url)
            .header("Accept", "application/json")
            .header("User-Agent", "limo");
        if !token.is_empty() {
            request = request.header("PRIVATE-TOKEN", token);
        }

        tracing::debug!(method = method.as_str(), url = %request.url, "GitLab request");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| SourceError::network(e.to_string()))?;

        // 304 answers star/unstar calls that change nothing.
        if !response.is_success() && response.status != 304 {
            return Err(SourceError::from_status(response.status, &response.text()));
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> source::Result<T> {
        serde_json::from_slice(&response.body)
            .map_err(|e| SourceError::invalid_response(format!("GitLab: {e}")))
    }

    /// Star or unstar, then read the project back. GitLab answers 304 when
    /// the state already matched, with an empty body.
    async fn toggle_star(
        &self,
        token: &str,
        repo: &RepoRef,
        action: &str,
    ) -> source::Result<RemoteStar> {
        let id = repo.full_name();
        let response = self
            .send(HttpMethod::Post, &["projects", id.as_str(), action], &[], token)
            .await?;

        let project: GitLabProject = if response.status == 304 || response.body.is_empty() {
            let response = self
                .send(HttpMethod::Get, &["projects", id.as_str()], &[], token)
                .await?;
            Self::decode(&response)?
        } else {
            Self::decode(&response)?
        };
        to_remote_star(project, Utc::now())
    }
}

/// Total page count from GitLab pagination headers. `X-Total-Pages` is
/// omitted for very large listings, in which case `X-Next-Page` decides.
fn last_page_from_headers(response: &HttpResponse, current: u32) -> u32 {
    if let Some(total) = response
        .header("x-total-pages")
        .and_then(|v| v.trim().parse::<u32>().ok())
    {
        return total;
    }
    match response
        .header("x-next-page")
        .and_then(|v| v.trim().parse::<u32>().ok())
    {
        Some(next) => next.max(current),
        None => current,
    }
}

#[async_trait]
impl StarSource for GitLabClient {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    fn login(&self, prompt: &dyn CredentialPrompt) -> source::Result<String> {
        prompt_for_token(prompt, "GitLab")
    }

    async fn fetch_stars_page(
        &self,
        token: &str,
        user: &str,
        page: u32,
    ) -> source::Result<StarPage> {
        let page_param = page.to_string();
        let response = if user.is_empty() {
            let query = [
                ("starred", "true"),
                ("per_page", PROJECTS_PER_PAGE),
                ("page", page_param.as_str()),
            ];
            self.send(HttpMethod::Get, &["projects"], &query, token)
                .await?
        } else {
            let query = [("per_page", PROJECTS_PER_PAGE), ("page", page_param.as_str())];
            self.send(HttpMethod::Get, &["users", user, "starred_projects"], &query, token)
                .await?
        };
        let last_page = last_page_from_headers(&response, page);

        let projects: Vec<GitLabProject> = Self::decode(&response)?;
        let now = Utc::now();
        let stars = projects
            .into_iter()
            .map(|project| to_remote_star(project, now))
            .collect();

        Ok(StarPage { stars, last_page })
    }

    async fn add_star(&self, token: &str, repo: &RepoRef) -> source::Result<RemoteStar> {
        self.toggle_star(token, repo, "star").await
    }

    async fn remove_star(&self, token: &str, repo: &RepoRef) -> source::Result<RemoteStar> {
        self.toggle_star(token, repo, "unstar").await
    }

    async fn fetch_events(
        &self,
        _token: &str,
        _user: &str,
        _page: u32,
        _count: u32,
    ) -> source::Result<Vec<RemoteEvent>> {
        Err(SourceError::not_supported("GitLab not yet supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    const API: &str = "https://gitlab.test/api/v4";

    fn client(mock: &MockTransport) -> GitLabClient {
        GitLabClient::new("https://gitlab.test/", Arc::new(mock.clone()))
    }

    fn project_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "name_with_namespace": format!("Group / {name}"),
            "description": null,
            "web_url": format!("https://gitlab.test/group/{name}"),
            "http_url_to_repo": format!("https://gitlab.test/group/{name}.git"),
            "star_count": 3,
            "namespace": {"path": "group", "full_path": "group"},
            "topics": []
        })
    }

    #[test]
    fn bare_host_gets_https_scheme() {
        let mock = MockTransport::new();
        let client = GitLabClient::new("gitlab.com", Arc::new(mock));
        assert_eq!(client.api_url(), "https://gitlab.com/api/v4");
    }

    #[tokio::test]
    async fn fetches_starred_projects_with_total_pages() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects?starred=true&per_page=100&page=1"),
            200,
            &[("X-Total-Pages", "2")],
            serde_json::json!([project_json(1, "a"), project_json(2, "b")]),
        );

        let page = client(&mock)
            .fetch_stars_page("glpat", "", 1)
            .await
            .expect("page should load");
        assert_eq!(page.last_page, 2);
        assert_eq!(page.stars.len(), 2);
        assert_eq!(
            mock.requests()[0].header_value("private-token"),
            Some("glpat")
        );
    }

    #[tokio::test]
    async fn named_user_uses_starred_projects_endpoint() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/users/alice/starred_projects?per_page=100&page=1"),
            200,
            &[("X-Next-Page", "")],
            serde_json::json!([project_json(1, "a")]),
        );

        let page = client(&mock).fetch_stars_page("t", "alice", 1).await.unwrap();
        assert_eq!(page.last_page, 1);
    }

    #[tokio::test]
    async fn star_reads_project_back_on_not_modified() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            format!("{API}/projects/group%2Fa/star"),
            HttpResponse {
                status: 304,
                headers: Vec::new(),
                body: Vec::new(),
            },
        );
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/group%2Fa"),
            200,
            &[],
            project_json(1, "a"),
        );

        let repo = RepoRef {
            service: None,
            owner: "group".to_string(),
            repo: "a".to_string(),
        };
        let star = client(&mock).add_star("t", &repo).await.unwrap();
        assert_eq!(star.full_name, "Group / a");
    }

    #[tokio::test]
    async fn events_and_trending_are_not_supported() {
        let mock = MockTransport::new();
        let gitlab = client(&mock);

        let err = gitlab.fetch_events("t", "", 1, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "GitLab not yet supported");

        let err = gitlab.fetch_trending("t", "").await.unwrap_err();
        assert!(matches!(err, SourceError::NotSupported { .. }));
        assert_eq!(err.to_string(), "gitlab does not support trending");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn nested_group_project_ids_are_one_escaped_segment() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            format!("{API}/projects/group%2Fsub%2Fa/unstar"),
            201,
            &[],
            project_json(1, "a"),
        );

        let repo = RepoRef {
            service: None,
            owner: "group/sub".to_string(),
            repo: "a".to_string(),
        };
        let star = client(&mock).remove_star("t", &repo).await.unwrap();
        assert_eq!(star.remote_id, "1");
    }
}
