use auth::Authenticator;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

const MISSING_TOKEN_MESSAGE: &str = "Missing bearer token";
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token, please sign in again";

/// Identity of the caller, established from a verified bearer token.
///
/// Taking this extractor as a handler argument is what makes a route
/// protected; handlers pass it on to the services explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_header(&parts.headers)?;
        resolve_identity(&state.authenticator, token)
    }
}

/// Verify `token` and turn its subject into an [`AuthenticatedUser`].
pub fn resolve_identity(
    authenticator: &Authenticator,
    token: &str,
) -> Result<AuthenticatedUser, ApiError> {
    let subject = authenticator.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    let user_id = UserId::from_string(&subject).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token subject is not a user id");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    Ok(AuthenticatedUser { user_id })
}

fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::Unauthorized(MISSING_TOKEN_MESSAGE.to_string());

    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(missing)?
        .to_str()
        .map_err(|_| missing())?;

    match auth_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(missing()),
    }
}
