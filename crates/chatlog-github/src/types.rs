use serde::{Deserialize, Serialize};

/// Body of `PUT /repos/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutFileRequest {
    pub message: String,
    /// Base64-encoded file content
    pub content: String,
    /// Revision handle of the file being replaced; omitted on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PutFileResponse {
    #[serde(default)]
    pub content: Option<FileContent>,
}

impl PutFileResponse {
    pub fn html_url(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.html_url.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}
