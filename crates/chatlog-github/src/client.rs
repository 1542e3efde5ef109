use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GitHubError, Result};
use crate::types::{FileContent, PutFileRequest, PutFileResponse};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

const FALLBACK_ERROR: &str = "GitHub API error";

/// HTTP client for the GitHub contents API
///
/// Only the two calls needed to create or overwrite a single file are exposed:
/// an existence probe that yields the current revision handle and the
/// create-or-update `PUT`.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let token = token.into();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GitHubError::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("chatlog/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn contents_url(&self, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.base_url, repo, path)
    }

    /// Revision handle of an existing file.
    ///
    /// Any non-success answer means "does not exist yet" and yields `None`;
    /// only transport failures are errors.
    pub async fn get_file_sha(&self, repo: &str, path: &str) -> Result<Option<String>> {
        let response = self.client.get(self.contents_url(repo, path)).send().await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), path, "File not present in repository");
            return Ok(None);
        }

        let existing: FileContent = match response.json().await {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Could not decode existing file metadata: {}", e);
                return Ok(None);
            }
        };
        Ok(existing.sha)
    }

    /// Create or update a file.
    pub async fn put_file(
        &self,
        repo: &str,
        path: &str,
        body: &PutFileRequest,
    ) -> Result<PutFileResponse> {
        let response = self
            .client
            .put(self.contents_url(repo, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, path, "GitHub contents request failed");
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        Ok(response.json().await?)
    }

    /// Serialize `value` as pretty JSON and write it to `path`, overwriting
    /// the file when it already exists.
    pub async fn upload_json<T: Serialize + ?Sized>(
        &self,
        repo: &str,
        path: &str,
        message: impl Into<String>,
        value: &T,
    ) -> Result<PutFileResponse> {
        let content = serde_json::to_string_pretty(value)?;
        let sha = self.get_file_sha(repo, path).await?;

        tracing::info!(path, update = sha.is_some(), "Uploading file to {}", repo);

        let body = PutFileRequest {
            message: message.into(),
            content: STANDARD.encode(content.as_bytes()),
            sha,
        };
        self.put_file(repo, path, &body).await
    }
}

/// Pull `message` out of a GitHub error body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}
