use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn open_session(&self, user: User) -> Result<AuthSession, UserError> {
        let token = self
            .authenticator
            .issue_token(user.id)
            .map_err(|e| UserError::Credential(format!("Token generation failed: {}", e)))?;

        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthSession, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| UserError::Credential(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            name: command.name,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User signed up");

        self.open_session(created_user)
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<AuthSession, UserError> {
        let user = self.repository.find_by_email(&command.email).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.as_str());

        match self
            .authenticator
            .verify_credentials(&command.password, stored_hash)
        {
            Ok(()) => {}
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(account_found = user.is_some(), "Sign-in rejected");
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => {
                return Err(UserError::Credential(format!(
                    "Password verification failed: {}",
                    e
                )))
            }
        }

        let user = user.ok_or(UserError::InvalidCredentials)?;
        tracing::info!(user_id = %user.id, "User signed in");

        self.open_session(user)
    }

    async fn current_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
