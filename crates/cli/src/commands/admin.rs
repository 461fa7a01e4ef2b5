//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! ratewise-cli admin create -e admin@example.com -n "Admin Name" -p 'S3cure!pass'
//! ```
//!
//! # Environment Variables
//!
//! - `RATEWISE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL`
//!   connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use ratewise_core::{Email, Role};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: RATEWISE_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password hashing failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),
}

/// Create a new admin user.
///
/// Bootstraps the first administrator; after that, admins can be
/// created through the API.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
    address: &str,
) -> Result<i32, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let database_url = std::env::var("RATEWISE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin user: {}", email);

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AdminError::PasswordHash(e.to_string()))?
        .to_string();

    let user_id = sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO users (name, email, password, address, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(address)
    .bind(Role::Admin)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}
