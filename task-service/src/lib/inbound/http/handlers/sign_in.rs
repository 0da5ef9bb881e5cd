use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::sign_up::AuthSessionResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::FieldViolations;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::extract::StrictJson;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<SignInRequestBody>,
) -> Result<ApiSuccess<AuthSessionResponseData>, ApiError> {
    state
        .auth_service
        .sign_in(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

/// HTTP request body for exchanging credentials for a token (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequestBody {
    email: String,
    password: String,
}

impl SignInRequestBody {
    fn try_into_command(self) -> Result<SignInCommand, ApiError> {
        let mut violations = FieldViolations::default();
        let email = violations.check("email", EmailAddress::new(self.email));
        violations.into_result()?;

        match email {
            Some(email) => Ok(SignInCommand {
                email,
                password: self.password,
            }),
            None => Err(ApiError::invalid_body("Invalid sign-in request")),
        }
    }
}
