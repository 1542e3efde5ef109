use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid API key format")]
    InvalidApiKey,
}

impl LlmError {
    /// Upstream status code, when the failure came from the API itself.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;
