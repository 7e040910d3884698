//! HTTP transport boundary used by the remote adapters.
//!
//! Adapters build [`HttpRequest`]s and hand them to an [`HttpTransport`]. The
//! real transport is backed by reqwest; tests use [`MockTransport`], which
//! answers from an in-memory queue without opening sockets.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// HTTP methods used by the star APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Header name/value pairs. Lookups are case-insensitive.
pub type HttpHeaders = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Append a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded. Used for error messages.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no mock response registered for {method} {url}")]
    NoMockResponse { method: String, url: String },

    #[error("invalid base URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// First header value matching `name`, compared case-insensitively.
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Build an API URL from `base`, path `segments` and `query` pairs.
///
/// Every segment is percent-encoded on its own, so a GitLab
/// `namespace/project` identifier is sent as `namespace%2Fproject`.
pub fn endpoint(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, HttpError> {
    let invalid = |message: String| HttpError::InvalidUrl {
        url: base.to_string(),
        message,
    };

    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot hold a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

#[cfg(any(feature = "github", feature = "gitlab"))]
pub mod reqwest_transport {
    use super::*;

    use std::time::Duration as StdDuration;

    /// HTTP transport backed by reqwest.
    #[derive(Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        /// Build a transport with a request timeout. `insecure` skips
        /// certificate verification for self-hosted services.
        pub fn with_options(timeout: StdDuration, insecure: bool) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(insecure)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &request.url);
            for (k, v) in &request.headers {
                builder = builder.header(k.as_str(), v.as_str());
            }

            let resp = builder
                .send()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?;

            let status = resp.status().as_u16();
            let headers: HttpHeaders = resp
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();

            let body = resp
                .bytes()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?
                .to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// In-memory transport for unit tests.
///
/// Responses are registered per method and URL and served in FIFO order. A
/// registered [`HttpError`] simulates a transport failure for that request.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<(HttpMethod, String), VecDeque<Result<HttpResponse, String>>>,
    requests: Vec<HttpRequest>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, url: String, outcome: Result<HttpResponse, String>) {
        let mut inner = self.inner.lock().expect("mock transport lock");
        inner
            .routes
            .entry((method, url))
            .or_default()
            .push_back(outcome);
    }

    pub fn push_response(&self, method: HttpMethod, url: impl Into<String>, response: HttpResponse) {
        self.push(method, url.into(), Ok(response));
    }

    /// Register a JSON response with the given status and extra headers.
    pub fn push_json(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        headers: &[(&str, &str)],
        body: serde_json::Value,
    ) {
        let response = HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string().into_bytes(),
        };
        self.push_response(method, url, response);
    }

    pub fn push_failure(&self, method: HttpMethod, url: impl Into<String>, message: &str) {
        self.push(method, url.into(), Err(message.to_string()));
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().expect("mock transport lock").requests.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().expect("mock transport lock");
        inner.requests.push(request.clone());

        let key = (request.method, request.url.clone());
        match inner.routes.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(HttpError::Transport(message)),
            None => Err(HttpError::NoMockResponse {
                method: request.method.as_str().to_string(),
                url: request.url,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let headers: HttpHeaders = vec![("X-Total-Pages".to_string(), "4".to_string())];
        assert_eq!(header_get(&headers, "x-total-pages"), Some("4"));
        assert_eq!(header_get(&headers, "link"), None);
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let url = endpoint("https://gitlab.test/api/v4/", &["projects", "gitlab-org/gitlab"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://gitlab.test/api/v4/projects/gitlab-org%2Fgitlab");

        let url = endpoint("https://api.test", &["users", "a b", "starred"], &[("page", "2")])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.test/users/a%20b/starred?page=2");
    }

    #[test]
    fn endpoint_encodes_query_values() {
        let url = endpoint(
            "https://api.test",
            &["search", "repositories"],
            &[("q", "created:>2025-01-01 language:c++")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.test/search/repositories?q=created%3A%3E2025-01-01+language%3Ac%2B%2B"
        );
    }

    #[test]
    fn endpoint_rejects_unusable_base() {
        let err = endpoint("not a url", &["x"], &[]).unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { .. }));

        let err = endpoint("mailto:someone@example.com", &["x"], &[]).unwrap_err();
        assert!(err.to_string().contains("cannot hold a path"));
    }

    #[tokio::test]
    async fn mock_transport_serves_fifo_and_records_requests() {
        let mock = MockTransport::new();
        let url = "https://api.test/x";
        mock.push_json(HttpMethod::Get, url, 200, &[], serde_json::json!([1]));
        mock.push_failure(HttpMethod::Get, url, "connection reset");

        let first = mock
            .send(HttpRequest::new(HttpMethod::Get, url).header("Accept", "application/json"))
            .await
            .expect("first response");
        assert!(first.is_success());
        assert_eq!(first.text(), "[1]");

        let second = mock.send(HttpRequest::new(HttpMethod::Get, url)).await;
        assert!(matches!(second, Err(HttpError::Transport(_))));

        let third = mock.send(HttpRequest::new(HttpMethod::Get, url)).await;
        assert!(matches!(third, Err(HttpError::NoMockResponse { .. })));

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].header_value("accept"), Some("application/json"));
    }
}
