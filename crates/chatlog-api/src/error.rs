use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use chatlog_github::GitHubError;
use chatlog_llm::LlmError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Non-success answer from an external API, relayed as-is.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("No response from OpenAI")]
    EmptyCompletion,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, ref message } => {
                tracing::warn!(status = %status, "Upstream error: {}", message);
                status
            }
            ApiError::EmptyCompletion => {
                tracing::error!("Completion API returned no content");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(ref e) => {
                tracing::error!("Internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => ApiError::Upstream {
                status: upstream_status(status),
                message,
            },
            LlmError::InvalidApiKey => ApiError::BadRequest(LlmError::InvalidApiKey.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<GitHubError> for ApiError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Api { status, message } => ApiError::Upstream {
                status: upstream_status(status),
                message,
            },
            GitHubError::InvalidToken => ApiError::BadRequest(GitHubError::InvalidToken.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_mirrored() {
        let err: ApiError = LlmError::Api {
            status: 429,
            message: "Rate limit reached".into(),
        }
        .into();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("socket closed"));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_github_token_error_is_client_error() {
        let err: ApiError = GitHubError::InvalidToken.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
