//! Authentication utilities library
//!
//! Provides the stateless authentication building blocks of the task service:
//! - Password hashing (Argon2id) with a configurable work factor
//! - JWT access token issuance and validation (HS256)
//! - Authentication coordination, including timing-equalized credential checks
//!
//! The task service adapts these to its own domain errors; nothing here knows
//! about users or tasks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use auth::PasswordHasher;
//! use chrono::Duration;
//!
//! let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(60),
//!     hasher,
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! auth.verify_credentials("password123", Some(hash.as_str())).unwrap();
//! let token = auth.issue_token("user123").unwrap();
//!
//! // Validate token
//! let subject = auth.verify_token(&token).unwrap();
//! assert_eq!(subject, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
