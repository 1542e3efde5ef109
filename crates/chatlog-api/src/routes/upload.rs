use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use chatlog_github::GitHubClient;
use chatlog_types::today;

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// The day's log, uploaded exactly as sent
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub chat_history: Option<Vec<Value>>,
    #[serde(default)]
    pub github_token: Option<String>,
    /// `owner/name`
    #[serde(default)]
    pub github_repo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: Option<String>,
    pub message: String,
    pub date: String,
}

/// Write today's log to `logs/<date>.json` in the caller's repository
#[utoipa::path(
    post,
    path = "/api/github/upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "File created or updated", body = UploadResponse),
        (status = 400, description = "Missing required parameters")
    ),
    tag = "relay"
)]
pub async fn upload_logs(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UploadRequest>,
) -> ApiResult<Json<UploadResponse>> {
    let token = req.github_token.filter(|t| !t.is_empty());
    let repo = req.github_repo.filter(|r| !r.is_empty());
    let (history, token, repo) = match (req.chat_history, token, repo) {
        (Some(history), Some(token), Some(repo)) => (history, token, repo),
        _ => return Err(ApiError::BadRequest("Missing required parameters".to_string())),
    };

    let date = today();
    let path = format!("logs/{}.json", date);

    let client = GitHubClient::with_base_url(token, &state.config.upstream.github_base_url)?;
    let uploaded = client
        .upload_json(&repo, &path, format!("Update chat logs for {}", date), &history)
        .await?;

    tracing::info!(repo = %repo, entries = history.len(), "Uploaded {}", path);

    Ok(Json(UploadResponse {
        success: true,
        url: uploaded.html_url().map(str::to_string),
        message: format!("Chat logs uploaded successfully for {}", date),
        date,
    }))
}
