use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const DUMMY_PASSWORD: &str = "timing-equalizer-not-a-real-password";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds everything the authentication lifecycle needs that is fixed at process
/// start: the hashing work factor, the signing key, the token lifetime and the
/// dummy hash used when a sign-in names an unknown account.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    dummy_hash: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid dummy password hash")]
    InvalidDummyHash,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// A dummy hash is generated with `password_hasher` so that failed lookups
    /// cost the same as a real verification.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing (at least 32 bytes)
    /// * `token_ttl` - Lifetime of issued access tokens
    /// * `password_hasher` - Hasher carrying the configured work factor
    ///
    /// # Errors
    /// * `JwtError` - Secret is too short
    /// * `PasswordError` - Dummy hash generation failed
    pub fn new(
        jwt_secret: &[u8],
        token_ttl: Duration,
        password_hasher: PasswordHasher,
    ) -> Result<Self, AuthenticationError> {
        let jwt_handler = JwtHandler::new(jwt_secret)?;
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            jwt_handler,
            token_ttl,
            dummy_hash,
        })
    }

    /// Replace the generated dummy hash with a preconfigured one.
    ///
    /// The hash should be produced with the same work factor as real hashes,
    /// otherwise sign-in misses become distinguishable by latency.
    ///
    /// # Errors
    /// * `InvalidDummyHash` - Not an Argon2id PHC string
    pub fn with_dummy_hash(mut self, dummy_hash: String) -> Result<Self, AuthenticationError> {
        if !self.password_hasher.is_valid_hash(&dummy_hash) {
            return Err(AuthenticationError::InvalidDummyHash);
        }
        self.dummy_hash = dummy_hash;
        Ok(self)
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against the stored hash of an account, if any.
    ///
    /// Exactly one hash comparison runs whether or not `stored_hash` is present;
    /// a missing account is checked against the dummy hash and then rejected.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account, or password does not match
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<(), AuthenticationError> {
        let hash_to_compare = stored_hash.unwrap_or(self.dummy_hash.as_str());
        let is_valid = self.password_hasher.verify(password, hash_to_compare)?;

        if stored_hash.is_none() || !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(())
    }

    /// Issue an access token for `subject` without password verification.
    ///
    /// Used right after account creation.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, self.token_ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Validate an access token and return its subject.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiry
    /// * `InvalidToken` - Signature, format or claims are invalid
    pub fn verify_token(&self, token: &str) -> Result<String, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn authenticator() -> Authenticator {
        let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
        Authenticator::new(SECRET, Duration::minutes(60), hasher)
            .expect("Failed to build authenticator")
    }

    #[test]
    fn test_verify_credentials_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        authenticator
            .verify_credentials(password, Some(hash.as_str()))
            .expect("Verification failed");
    }

    #[test]
    fn test_verify_credentials_wrong_password() {
        let authenticator = authenticator();

        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.verify_credentials("wrong_password", Some(hash.as_str()));
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_credentials_unknown_account() {
        let authenticator = authenticator();

        let result = authenticator.verify_credentials("my_password", None);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_account_rejected_even_with_dummy_password() {
        let authenticator = authenticator();

        let result = authenticator.verify_credentials(DUMMY_PASSWORD, None);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        let authenticator = authenticator();

        let result = authenticator.verify_credentials("password", Some("garbage"));
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(_))
        ));
    }

    #[test]
    fn test_issue_and_verify_token() {
        let authenticator = authenticator();

        let token = authenticator
            .issue_token("5f0c6f7e-8f59-4c3a-9d0b-1f2e3d4c5b6a")
            .expect("Failed to issue token");
        let subject = authenticator
            .verify_token(&token)
            .expect("Failed to verify token");

        assert_eq!(subject, "5f0c6f7e-8f59-4c3a-9d0b-1f2e3d4c5b6a");
    }

    #[test]
    fn test_verify_expired_token() {
        let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
        let authenticator = Authenticator::new(SECRET, Duration::seconds(-30), hasher).unwrap();

        let token = authenticator.issue_token("user123").unwrap();
        let result = authenticator.verify_token(&token);

        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_verify_token_from_other_key() {
        let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
        let other = Authenticator::new(
            b"another_secret_key_at_least_32_bytes",
            Duration::minutes(60),
            hasher,
        )
        .unwrap();

        let token = other.issue_token("user123").unwrap();
        let result = authenticator().verify_token(&token);

        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().verify_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_dummy_hash() {
        let authenticator = authenticator();
        let dummy = authenticator.hash_password("whatever").unwrap();

        let authenticator = authenticator.with_dummy_hash(dummy).unwrap();
        let result = authenticator.verify_credentials("whatever", None);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));

        let invalid = authenticator.with_dummy_hash("$2b$12$notargon".to_string());
        assert!(matches!(
            invalid,
            Err(AuthenticationError::InvalidDummyHash)
        ));
    }
}
