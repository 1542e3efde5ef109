use axum::Json;
use utoipa::OpenApi;

use crate::routes::{chat, health, scheduler, upload, windows_scheduler};
use crate::scheduler::SchedulerStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chatlog relay",
        description = "Completion and log-upload relays plus the advisory upload scheduler"
    ),
    paths(
        health::health_check,
        chat::relay_chat,
        upload::upload_logs,
        scheduler::scheduler_status,
        scheduler::scheduler_action,
        windows_scheduler::windows_command,
    ),
    components(schemas(
        health::HealthResponse,
        chat::ChatRelayRequest,
        chat::ChatRelayResponse,
        upload::UploadRequest,
        upload::UploadResponse,
        scheduler::SchedulerRequest,
        scheduler::SchedulerConfig,
        scheduler::SchedulerStarted,
        scheduler::SchedulerStopped,
        SchedulerStatus,
        windows_scheduler::WindowsTaskRequest,
        windows_scheduler::WindowsTaskResponse,
        windows_scheduler::WindowsTaskFailure,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "relay", description = "Pass-through calls to the completion and hosting APIs"),
        (name = "scheduler", description = "Upload scheduling helpers")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
