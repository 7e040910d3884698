use thiserror::Error;

/// Errors raised by remote star sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// No adapter is registered under this name.
    #[error("service '{name}' not found")]
    UnknownService { name: String },

    /// Raised by the [`NotFound`](super::NotFound) adapter for every call.
    #[error("Service not found")]
    ServiceNotFound,

    /// The service does not implement this capability.
    #[error("{message}")]
    NotSupported { message: String },

    /// Authentication failed or the token is missing/invalid.
    #[error("Authentication failed: {message}")]
    AuthRequired { message: String },

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API base URL cannot be turned into a request URL.
    #[error("Invalid API URL: {message}")]
    InvalidUrl { message: String },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body could not be decoded.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// A remote record lacks data required to build a star.
    #[error("{message}")]
    Translation { message: String },

    /// A repository reference could not be parsed.
    #[error("You must specify a valid git URL, owner/repo, or owner repo (got '{input}')")]
    InvalidRepoRef { input: String },

    /// Reading a credential from the user failed.
    #[error("Could not read credential: {message}")]
    Prompt { message: String },
}

impl SourceError {
    pub fn unknown_service(name: &str) -> Self {
        Self::UnknownService {
            name: name.to_string(),
        }
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = short_message(body);
        match status {
            401 | 403 => Self::AuthRequired { message },
            _ => Self::Api { status, message },
        }
    }

    /// Whether this error came from talking to the remote (as opposed to a
    /// single record that failed to translate).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::InvalidUrl { .. }
                | Self::Api { .. }
                | Self::AuthRequired { .. }
                | Self::InvalidResponse { .. }
        )
    }
}

/// Pull the `message` field out of a JSON error body when there is one,
/// otherwise keep the first line of the body.
fn short_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    body.lines().next().unwrap_or_default().trim().to_string()
}

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
