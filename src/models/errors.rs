// models/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use bollard::errors::Error as DockerError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("Docker is not connected.")]
    EngineUnavailable,

    #[error("No such container: {0}")]
    NotFound(String),

    #[error("Failed to pull image: {0}")]
    ImagePullFailed(String),

    #[error("{0}")]
    EngineOperationFailed(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl PanelError {
    /// Stable identifier sent to WebSocket clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EngineUnavailable => "engine_unavailable",
            Self::NotFound(_) => "not_found",
            Self::ImagePullFailed(_) => "image_pull_failed",
            Self::EngineOperationFailed(_) => "engine_operation_failed",
            Self::InvalidAction(_) => "invalid_action",
            Self::MalformedRequest(_) => "malformed_request",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for PanelError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ImagePullFailed(_) => StatusCode::BAD_GATEWAY,
            Self::EngineOperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidAction(_) | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

impl From<DockerError> for PanelError {
    fn from(err: DockerError) -> Self {
        match err {
            DockerError::DockerResponseServerError {
                status_code: 404,
                message,
            } => Self::NotFound(message),
            DockerError::IOError { .. } | DockerError::RequestTimeoutError => {
                Self::EngineUnavailable
            }
            other => Self::EngineOperationFailed(other.to_string()),
        }
    }
}
