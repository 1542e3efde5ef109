use thiserror::Error;

use chatlog_persist::{ImportError, PersistError};

#[derive(Error, Debug)]
pub enum ClientError {
    /// The action was not attempted; the message says what is missing.
    #[error("{0}")]
    NotReady(&'static str),

    /// The relay service answered with an error.
    #[error("{message} (status {status})")]
    Relay { status: u16, message: String },

    #[error("Could not reach the relay service: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
