//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`;
//! every error body is JSON, either `{ "message": ... }` or, for
//! request validation, `{ "errors": [{ "field", "message" }, ...] }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::ratings::RatingError;
use crate::services::validation::FieldError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Rating operation failed.
    #[error("Rating error: {0}")]
    Rating(#[from] RatingError),

    /// One or more request fields failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No token on a protected route.
    #[error("No credentials provided")]
    MissingCredential,

    /// The presented token failed verification.
    #[error("Invalid credentials")]
    InvalidCredential,

    /// Authenticated, but the role does not permit this route.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is reported to Sentry.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::PasswordHash(_) | AuthError::Token(_) | AuthError::Repository(_)
            ),
            Self::Rating(err) => matches!(err, RatingError::Repository(_)),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::InvalidCredentials
                | AuthError::IncorrectCurrentPassword
                | AuthError::EmailTaken => StatusCode::BAD_REQUEST,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::PasswordHash(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Rating(err) => match err {
                RatingError::InvalidValue => StatusCode::BAD_REQUEST,
                RatingError::StoreNotFound => StatusCode::NOT_FOUND,
                RatingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential | Self::Forbidden => StatusCode::FORBIDDEN,
        };

        // Validation errors carry the full field list; everything else is
        // a single message, with internals never exposed to clients.
        if let Self::Validation(errors) = self {
            return (status, Json(json!({ "errors": errors }))).into_response();
        }

        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::IncorrectCurrentPassword => "Current password is incorrect".to_string(),
                AuthError::EmailTaken => "Email already registered".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::PasswordHash(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Rating(err) => match err {
                RatingError::InvalidValue => {
                    "Rating must be an integer between 1 and 5".to_string()
                }
                RatingError::StoreNotFound => "Store not found".to_string(),
                RatingError::Repository(_) => "Internal server error".to_string(),
            },
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::MissingCredential => "Access denied. No token provided.".to_string(),
            Self::InvalidCredential => "Invalid token".to_string(),
            Self::Forbidden => "Access denied. Insufficient permissions.".to_string(),
            Self::Validation(_) => unreachable!("handled above"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AuthError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(AppError::MissingCredential), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidCredential), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(AppError::NotFound("User not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Validation(vec![])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_are_bad_requests() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::IncorrectCurrentPassword)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_rating_errors() {
        assert_eq!(
            status_of(AppError::Rating(RatingError::InvalidValue)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Rating(RatingError::StoreNotFound)),
            StatusCode::NOT_FOUND
        );
    }
}
