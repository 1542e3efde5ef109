use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    scheduler::{SchedulerStatus, UploadCredentials},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerRequest {
    /// `start`, `stop` or `status`
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub config: Option<SchedulerConfig>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub github_repo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStarted {
    pub message: String,
    pub is_running: bool,
    pub upload_time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStopped {
    pub message: String,
    pub is_running: bool,
}

/// Current scheduler state
#[utoipa::path(
    get,
    path = "/api/scheduler",
    responses(
        (status = 200, description = "Scheduler state", body = SchedulerStatus)
    ),
    tag = "scheduler"
)]
pub async fn scheduler_status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status().await)
}

/// Start, stop, or query the scheduler
#[utoipa::path(
    post,
    path = "/api/scheduler",
    request_body = SchedulerRequest,
    responses(
        (status = 200, description = "Transition applied"),
        (status = 400, description = "Invalid action or missing GitHub configuration")
    ),
    tag = "scheduler"
)]
pub async fn scheduler_action(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SchedulerRequest>,
) -> ApiResult<Response> {
    match req.action.as_deref().unwrap_or_default() {
        "start" => {
            let config = req.config.unwrap_or_default();
            let github_token = config.github_token.filter(|t| !t.is_empty());
            let github_repo = config.github_repo.filter(|r| !r.is_empty());

            let credentials = match (github_token, github_repo) {
                (Some(github_token), Some(github_repo)) => UploadCredentials {
                    github_token,
                    github_repo,
                },
                _ => {
                    return Err(ApiError::BadRequest(
                        "GitHub configuration required to start scheduler".to_string(),
                    ))
                }
            };

            let status = state.scheduler.start(credentials, req.upload_time).await;
            Ok(Json(SchedulerStarted {
                message: "Scheduler started successfully".to_string(),
                is_running: status.is_running,
                upload_time: status.upload_time,
            })
            .into_response())
        }
        "stop" => {
            let status = state.scheduler.stop().await;
            Ok(Json(SchedulerStopped {
                message: "Scheduler stopped successfully".to_string(),
                is_running: status.is_running,
            })
            .into_response())
        }
        "status" => Ok(Json(state.scheduler.status().await).into_response()),
        _ => Err(ApiError::BadRequest("Invalid action".to_string())),
    }
}
