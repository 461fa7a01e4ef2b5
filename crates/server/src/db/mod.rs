//! Database operations for the Ratewise `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Identities for all three roles (admin, owner, user)
//! - `stores` - Stores with the cached `avg_rating` aggregate
//! - `ratings` - The rating ledger, one row per (store, user)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p ratewise-cli -- migrate
//! ```

pub mod ratings;
pub mod sort;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use ratings::RatingRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// `PostgreSQL` error code for unique constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";
/// `PostgreSQL` error code for foreign key violations.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, missing owner).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Translate unique/foreign-key violations into `Conflict`.
    ///
    /// All other database errors pass through as `Database`.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(code) = db_err.code() {
                if code == PG_UNIQUE_VIOLATION || code == PG_FOREIGN_KEY_VIOLATION {
                    return Self::Conflict(conflict_message.to_string());
                }
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
