use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{context} not found")]
    NotFound { context: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A different live tag already uses the name (case-insensitively).
    #[error("Tag '{name}' already exists")]
    TagExists { name: String },

    /// Renaming a tag to exactly its current name.
    #[error("Tag '{name}' already has that name")]
    TagRenameUnchanged { name: String },

    #[error("No stars match '{query}'")]
    NoStarMatch { query: String },

    /// More than one star matched a query that needs exactly one.
    #[error("Star '{query}' ambiguous")]
    AmbiguousStar {
        query: String,
        candidates: Vec<String>,
    },
}

impl StoreError {
    pub fn tag_not_found(name: &str) -> Self {
        Self::NotFound {
            context: format!("Tag '{name}'"),
        }
    }

    pub fn service_not_found(name: &str) -> Self {
        Self::NotFound {
            context: format!("Service '{name}'"),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
