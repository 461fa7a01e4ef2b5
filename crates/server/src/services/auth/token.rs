//! JWT issuing and verification.
//!
//! Tokens are HS256-signed and carry the user's id and role. Every
//! protected route trusts the claims alone; no database round-trip is
//! needed to authorize a request.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, get_current_timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ratewise_core::{Role, UserId};

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: i32,
    /// The role the user held when the token was issued.
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: u64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

impl Claims {
    /// The subject as a typed user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Error signing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token failed verification: bad signature, malformed, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Sign a token for the given user, valid for `ttl_secs` seconds.
///
/// # Errors
///
/// Returns `TokenError::Signing` if the key rejects the payload.
pub fn issue(
    key: &EncodingKey,
    user_id: UserId,
    role: Role,
    ttl_secs: u64,
) -> Result<String, TokenError> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: user_id.as_i32(),
        role,
        iat: now,
        exp: now + ttl_secs,
    };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, key)
        .map_err(TokenError::Signing)
}

/// Verify a token and return its claims.
///
/// # Errors
///
/// Returns `TokenError::Invalid` for a bad signature, a malformed token,
/// or an expired one.
pub fn verify(key: &DecodingKey, token: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    jsonwebtoken::decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> (EncodingKey, DecodingKey) {
        let secret = b"test-signing-secret-with-plenty-of-entropy-0192";
        (
            EncodingKey::from_secret(secret),
            DecodingKey::from_secret(secret),
        )
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let (enc, dec) = keys();

        let token = issue(&enc, UserId::new(42), Role::Owner, 3600).unwrap();
        let claims = verify(&dec, &token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Owner);
        assert_eq!(claims.user_id(), UserId::new(42));
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (enc, _) = keys();
        let other = DecodingKey::from_secret(b"a-completely-different-secret-key-456789");

        let token = issue(&enc, UserId::new(1), Role::User, 3600).unwrap();
        assert!(matches!(
            verify(&other, &token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let (_, dec) = keys();
        assert!(verify(&dec, "not.a.token").is_err());
        assert!(verify(&dec, "").is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let (enc, dec) = keys();

        // Build an already-expired token by hand; the default validation
        // leeway is 60 seconds, so put the expiry well past it.
        let now = get_current_timestamp();
        let claims = Claims {
            sub: 7,
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &enc).unwrap();

        assert!(matches!(verify(&dec, &token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_claims_serialize_role_lowercase() {
        let claims = Claims {
            sub: 3,
            role: Role::Admin,
            iat: 100,
            exp: 200,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "admin");
    }
}
