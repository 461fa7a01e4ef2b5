//! Token authentication extractor.
//!
//! Protected handlers take a [`Principal`] argument; extraction reads
//! the `Authorization: Bearer <token>` header and verifies the JWT
//! against the server's signing key. A missing header is 401, a bad or
//! expired token is 403. Role checks happen per-handler with
//! [`Principal::require_role`], since most routes admit more than one
//! role.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use ratewise_core::{Role, UserId};

use crate::error::AppError;
use crate::services::auth::Claims;
use crate::state::AppState;

/// The authenticated caller, as asserted by their token.
///
/// Carries only what the token carries. Handlers that need the full
/// user row look it up themselves.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    /// Reject the request unless the caller holds one of the given
    /// roles.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` otherwise.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            role: claims.role,
        }
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::MissingCredential)?;

        let claims = state
            .verify_token(token)
            .map_err(|_| AppError::InvalidCredential)?;

        Ok(claims.into())
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let principal = Principal {
            user_id: UserId::new(1),
            role: Role::Owner,
        };

        assert!(principal.require_role(&[Role::Owner]).is_ok());
        assert!(principal.require_role(&[Role::Admin, Role::Owner]).is_ok());
        assert!(matches!(
            principal.require_role(&[Role::Admin]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = axum::http::Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        let req = axum::http::Request::builder().body(()).unwrap();
        let (parts, ()) = req.into_parts();
        assert_eq!(bearer_token(&parts), None);

        let req = axum::http::Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
