use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::get_task::parse_task_id;
use super::ApiError;
use crate::domain::task::ports::TaskServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_task(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    state
        .task_service
        .delete_task(&identity.user_id, &task_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
