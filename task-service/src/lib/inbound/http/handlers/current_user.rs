use axum::extract::State;
use axum::http::StatusCode;

use super::sign_up::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn current_user(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    state
        .auth_service
        .current_user(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
