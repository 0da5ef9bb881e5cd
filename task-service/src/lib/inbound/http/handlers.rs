use std::fmt;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::task::errors::TaskError;
use crate::domain::task::update::TaskPatchError;
use crate::user::errors::UserError;

pub mod create_task;
pub mod current_user;
pub mod delete_task;
pub mod get_task;
pub mod health;
pub mod list_tasks;
pub mod sign_in;
pub mod sign_up;
pub mod update_task;

const INTERNAL_ERROR_MESSAGE: &str = "Unexpected server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody { data }))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    data: T,
}

/// One entry of a validation error's `details`.
///
/// `field` is absent for failures of the body as a whole (malformed JSON,
/// unknown keys, no-op update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(Vec<ValidationDetail>),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl ApiError {
    /// Validation failure of the request body as a whole.
    pub fn invalid_body(message: impl Into<String>) -> Self {
        ApiError::Validation(vec![ValidationDetail {
            field: None,
            message: message.into(),
        }])
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![ValidationDetail {
            field: Some(field.to_string()),
            message: message.into(),
        }])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
                Some(details),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    None,
                )
            }
        };

        let body = ApiErrorBody {
            error: ApiErrorData {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::Credential(_) | UserError::DatabaseError(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(_) => ApiError::NotFound("Task not found".to_string()),
            TaskError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<TaskPatchError> for ApiError {
    fn from(err: TaskPatchError) -> Self {
        match err {
            TaskPatchError::NoChanges => ApiError::invalid_body(err.to_string()),
            TaskPatchError::NotNullable(field) => ApiError::invalid_field(field, err.to_string()),
        }
    }
}

/// Failure envelope: `{"error": {"code", "message", "details"?}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationDetail>>,
}

/// Accumulates per-field validation failures so a single response can report
/// all of them.
#[derive(Debug, Default)]
pub struct FieldViolations(Vec<ValidationDetail>);

impl FieldViolations {
    /// Record the error of `result` against `field`, passing the value through.
    pub fn check<T, E: fmt::Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(ValidationDetail {
                    field: Some(field.to_string()),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}
