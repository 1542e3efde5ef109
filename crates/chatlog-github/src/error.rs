use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to encode file content: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid token format")]
    InvalidToken,
}

impl GitHubError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;
