use async_trait::async_trait;

use super::errors::{Result, SourceError};
use super::types::{CredentialPrompt, RemoteEvent, RemoteStar, RepoRef, StarPage, StarSource};

/// Fallback source for unknown service names. Every call fails immediately
/// with [`SourceError::ServiceNotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait]
impl StarSource for NotFound {
    fn name(&self) -> &'static str {
        "notfound"
    }

    fn login(&self, _prompt: &dyn CredentialPrompt) -> Result<String> {
        Err(SourceError::ServiceNotFound)
    }

    async fn fetch_stars_page(&self, _token: &str, _user: &str, _page: u32) -> Result<StarPage> {
        Err(SourceError::ServiceNotFound)
    }

    async fn add_star(&self, _token: &str, _repo: &RepoRef) -> Result<RemoteStar> {
        Err(SourceError::ServiceNotFound)
    }

    async fn remove_star(&self, _token: &str, _repo: &RepoRef) -> Result<RemoteStar> {
        Err(SourceError::ServiceNotFound)
    }

    async fn fetch_events(
        &self,
        _token: &str,
        _user: &str,
        _page: u32,
        _count: u32,
    ) -> Result<Vec<RemoteEvent>> {
        Err(SourceError::ServiceNotFound)
    }

    async fn fetch_trending(&self, _token: &str, _language: &str) -> Result<Vec<RemoteStar>> {
        Err(SourceError::ServiceNotFound)
    }
}
