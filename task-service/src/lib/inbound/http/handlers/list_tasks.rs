use axum::extract::State;
use axum::http::StatusCode;

use super::create_task::TaskResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::ports::TaskServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<TaskResponseData>>, ApiError> {
    state
        .task_service
        .list_tasks(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|tasks| {
            let data: Vec<TaskResponseData> = tasks.iter().map(Into::into).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}
