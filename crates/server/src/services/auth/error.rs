//! Authentication error types.

use thiserror::Error;

use ratewise_core::EmailError;

use crate::db::RepositoryError;

use super::token::TokenError;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or wrong password. Deliberately one variant so the
    /// response never reveals which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password change: the supplied current password does not match.
    #[error("current password is incorrect")]
    IncorrectCurrentPassword,

    /// The authenticated user's row no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password hashing or verification failed internally.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Token signing failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
