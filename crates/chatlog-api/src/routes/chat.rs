use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use chatlog_llm::{ChatClient, ChatOptions, ChatRequest, OpenAIClient, RELAY_MAX_TOKENS, RELAY_TEMPERATURE};
use chatlog_types::DEFAULT_MODEL;

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRelayRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Defaults to `gpt-3.5-turbo`
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRelayResponse {
    pub response: String,
    pub model: String,
    /// RFC 3339, millisecond precision
    pub timestamp: String,
}

/// Forward one prompt to the completion API
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRelayRequest,
    responses(
        (status = 200, description = "Completion text", body = ChatRelayResponse),
        (status = 400, description = "Missing prompt or API key"),
        (status = 500, description = "Empty completion or internal failure")
    ),
    tag = "relay"
)]
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChatRelayRequest>,
) -> ApiResult<Json<ChatRelayResponse>> {
    let (prompt, api_key) = match (non_empty(req.prompt), non_empty(req.api_key)) {
        (Some(prompt), Some(api_key)) => (prompt, api_key),
        _ => return Err(ApiError::BadRequest("Missing prompt or API key".to_string())),
    };
    let model = non_empty(req.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let client = OpenAIClient::with_base_url(api_key, &state.config.upstream.openai_base_url)?;
    let request = ChatRequest::prompt(&model, prompt).with_options(
        ChatOptions::new()
            .max_tokens(RELAY_MAX_TOKENS)
            .temperature(RELAY_TEMPERATURE),
    );

    tracing::debug!(model = %model, "Relaying prompt");
    let completion = client.chat(request).await?;
    let text = completion.text().ok_or(ApiError::EmptyCompletion)?;

    Ok(Json(ChatRelayResponse {
        response: text.to_string(),
        model,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
