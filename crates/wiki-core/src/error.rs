//! Error types for the wiki

use thiserror::Error;

/// Main error type for page operations
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid title {title:?}: {reason}")]
    InvalidTitle { title: String, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl WikiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WikiError::NotFound(_))
    }

    /// Failure of the underlying medium rather than of the request itself
    pub fn is_storage(&self) -> bool {
        matches!(self, WikiError::Io(_) | WikiError::Database(_))
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
