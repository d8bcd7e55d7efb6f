//! Errors raised while serving a chat request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The completion provider could not be reached.
    #[error("completion request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to render transcript: {0}")]
    Template(#[from] minijinja::Error),

    /// The session is missing or belongs to another user.
    #[error("session `{0}` not found")]
    SessionNotFound(String),

    #[error("message text must not be empty")]
    EmptyMessage,
}
