use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::SignUpCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for account and authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first access token.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Credential` - Hashing or token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Credential` - Hashing or token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_in(&self, command: SignInCommand) -> Result<AuthSession, UserError>;

    /// Retrieve the profile of an authenticated account.
    ///
    /// # Errors
    /// * `NotFound` - Account no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by normalized email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
