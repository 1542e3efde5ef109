pub mod client;
pub mod error;
pub mod types;

pub use client::{GitHubClient, GITHUB_API_BASE};
pub use error::{GitHubError, Result};
pub use types::{FileContent, PutFileRequest, PutFileResponse};
