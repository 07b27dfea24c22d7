use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ConfigInvalid(msg) => {
                tracing::warn!(error = %msg, "Invalid configuration");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::DuplicateTool(name) => {
                tracing::warn!(tool = %name, "Duplicate tool rejected");
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::UnknownTool(name) => {
                tracing::warn!(tool = %name, "Unknown tool");
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::CatalogError(msg) => {
                tracing::error!(error = %msg, "Catalog error");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
