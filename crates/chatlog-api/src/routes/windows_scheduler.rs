use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::windows::{TaskCommand, TASK_NAME};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowsTaskRequest {
    /// `create`, `remove` or `status`
    #[serde(default)]
    pub action: Option<String>,
    /// `HH:MM`, required for `create`
    #[serde(default)]
    pub upload_time: Option<String>,
    /// Required for `create`
    #[serde(default)]
    pub script_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowsTaskResponse {
    pub success: bool,
    pub powershell_command: String,
    pub task_name: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WindowsTaskFailure {
    pub success: bool,
    pub error: String,
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    let body = WindowsTaskFailure {
        success: false,
        error: error.into(),
    };
    (status, Json(body)).into_response()
}

/// Generate a Task Scheduler command for the daily upload
///
/// Nothing is scheduled; the caller runs the returned command.
#[utoipa::path(
    post,
    path = "/api/windows-scheduler",
    request_body = WindowsTaskRequest,
    responses(
        (status = 200, description = "Command generated", body = WindowsTaskResponse),
        (status = 400, description = "Invalid action or arguments", body = WindowsTaskFailure),
        (status = 500, description = "Unreadable request", body = WindowsTaskFailure)
    ),
    tag = "scheduler"
)]
pub async fn windows_command(payload: Result<Json<WindowsTaskRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::error!("Windows scheduler error: {}", rejection.body_text());
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process Windows scheduler request",
            );
        }
    };

    let command = match TaskCommand::parse(
        req.action.as_deref().unwrap_or_default(),
        req.upload_time.as_deref(),
        req.script_path.as_deref(),
    ) {
        Ok(command) => command,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.to_string()),
    };

    Json(WindowsTaskResponse {
        success: true,
        powershell_command: command.powershell(),
        task_name: TASK_NAME.to_string(),
        message: command.message().to_string(),
    })
    .into_response()
}
