//! Translation of failures into error responses at the HTTP boundary.

use actix_web::{
    error::{JsonPayloadError, PathError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use log::{error, warn};
use thiserror::Error;

use crate::models::task::ErrorResponse;
use crate::service::ServiceError;

pub const TASK_NOT_FOUND: &str = "TASK_NOT_FOUND";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Details are logged where the error is created, never sent to the client.
    #[error("An unexpected error occurred")]
    Internal,
}

impl ApiError {
    /// A request body that failed its field constraints.
    pub fn validation(message: String) -> Self {
        warn!("Validation error: {}", message);
        ApiError::Validation(message)
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => TASK_NOT_FOUND,
            ApiError::Validation(_) => VALIDATION_ERROR,
            ApiError::Internal => INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            message: self.to_string(),
            error_code: self.error_code().to_string(),
            timestamp: chrono::Local::now().naive_local(),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::TaskNotFound(_) => {
                warn!("Task not found: {}", err);
                ApiError::NotFound(err.to_string())
            }
            ServiceError::Repository(e) => {
                error!("Unexpected error occurred: {}", e);
                ApiError::Internal
            }
        }
    }
}

/// Body that is missing, not JSON, or of the wrong shape. Only field
/// constraint failures are validation errors; everything else is internal.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    error!("Unreadable body for {} {}: {}", req.method(), req.path(), err);
    ApiError::Internal.into()
}

/// Path segment that does not parse as a task id.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    error!("Unreadable path {}: {}", req.path(), err);
    ApiError::Internal.into()
}
