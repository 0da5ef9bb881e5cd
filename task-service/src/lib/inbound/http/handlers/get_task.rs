use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::create_task::TaskResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::TaskId;
use crate::domain::task::ports::TaskServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_task(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .get_task(&identity.user_id, &task_id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

/// Parse the `:task_id` path segment, rejecting anything that is not a UUID.
pub(crate) fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::from_string(raw).map_err(|e| ApiError::invalid_field("task_id", e.to_string()))
}
