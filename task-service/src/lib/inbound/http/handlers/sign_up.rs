use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldViolations;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::extract::StrictJson;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    StrictJson(body): StrictJson<SignUpRequestBody>,
) -> Result<ApiSuccess<AuthSessionResponseData>, ApiError> {
    state
        .auth_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for creating an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpRequestBody {
    email: String,
    password: String,
    #[serde(default)]
    name: Option<String>,
}

impl SignUpRequestBody {
    fn try_into_command(self) -> Result<SignUpCommand, ApiError> {
        let mut violations = FieldViolations::default();

        let email = violations.check("email", EmailAddress::new(self.email));
        let password = violations.check("password", Password::new(self.password));
        let name = violations.check(
            "name",
            self.name
                .as_deref()
                .map(DisplayName::parse)
                .transpose()
                .map(Option::flatten),
        );

        violations.into_result()?;

        match (email, password, name) {
            (Some(email), Some(password), Some(name)) => Ok(SignUpCommand {
                email,
                password,
                name,
            }),
            _ => Err(ApiError::invalid_body("Invalid sign-up request")),
        }
    }
}

/// Token plus public profile, returned by sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSessionResponseData {
    pub token: String,
    pub user: UserResponseData,
}

impl From<&AuthSession> for AuthSessionResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            user: (&session.user).into(),
        }
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseData {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_ref().map(|n| n.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::user::models::UserId;

    fn body(value: serde_json::Value) -> SignUpRequestBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_command_is_normalized() {
        let command = body(json!({
            "email": " Ada@Example.com ",
            "password": "secret1",
            "name": "  Ada  "
        }))
        .try_into_command()
        .unwrap();

        assert_eq!(command.email.as_str(), "ada@example.com");
        assert_eq!(command.name.unwrap().as_str(), "Ada");
    }

    #[test]
    fn test_blank_name_is_no_name() {
        let command = body(json!({ "email": "a@x.com", "password": "secret1", "name": "  " }))
            .try_into_command()
            .unwrap();

        assert!(command.name.is_none());
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let result = body(json!({ "email": "nope", "password": "123" })).try_into_command();

        match result {
            Err(ApiError::Validation(details)) => {
                let fields: Vec<_> = details.iter().filter_map(|d| d.field.as_deref()).collect();
                assert_eq!(fields, vec!["email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_user_view_is_id_email_name_only() {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
            name: None,
            created_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(UserResponseData::from(&user)).unwrap();

        assert_eq!(
            value,
            json!({ "id": user.id.to_string(), "email": "a@x.com", "name": null })
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = serde_json::from_value::<SignUpRequestBody>(json!({
            "email": "a@x.com",
            "password": "secret1",
            "role": "admin"
        }));

        assert!(result.is_err());
    }
}
