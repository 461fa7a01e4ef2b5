//! Application state shared across handlers.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use ratewise_core::{Role, UserId};

use crate::config::ServerConfig;
use crate::services::auth::token::{self, Claims, TokenError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the connection pool, the
/// configuration, and the prepared JWT keys.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    jwt_encoding: EncodingKey,
    jwt_decoding: DecodingKey,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let jwt_encoding = EncodingKey::from_secret(secret);
        let jwt_decoding = DecodingKey::from_secret(secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                jwt_encoding,
                jwt_decoding,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Sign an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the key rejects the payload.
    pub fn issue_token(&self, user_id: UserId, role: Role) -> Result<String, TokenError> {
        token::issue(
            &self.inner.jwt_encoding,
            user_id,
            role,
            self.inner.config.token_ttl_secs,
        )
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad, malformed, or expired
    /// token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        token::verify(&self.inner.jwt_decoding, token)
    }
}
