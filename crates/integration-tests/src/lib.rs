//! Integration tests for Ratewise.
//!
//! # Running Tests
//!
//! ```bash
//! # Run the migrations, then start the server
//! cargo run -p ratewise-cli -- migrate
//! cargo run -p ratewise-server
//!
//! # Run integration tests
//! cargo test -p ratewise-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they require a running
//! server and database. Each test creates its own users with unique
//! emails, so reruns against the same database are safe.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("RATEWISE_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique email for this test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

/// A name long enough to pass the 20-character signup floor.
#[must_use]
pub fn signup_name(label: &str) -> String {
    format!("Integration Test {label:<4}")
}

/// Password that satisfies the composition rules.
pub const TEST_PASSWORD: &str = "Testpass1!";

/// Sign up a user with the given role and return the response body.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn signup(client: &Client, email: &str, role: &str) -> Value {
    let resp = client
        .post(format!("{}/auth/signup", base_url()))
        .json(&json!({
            "name": signup_name(role),
            "email": email,
            "password": TEST_PASSWORD,
            "address": "1 Test Street",
            "role": role,
        }))
        .send()
        .await
        .expect("signup request failed");

    assert_eq!(resp.status(), 201, "signup should return 201");
    resp.json().await.expect("signup response should be JSON")
}

/// Log in and return the bearer token.
///
/// # Panics
///
/// Panics if the request fails or the token is missing.
pub async fn login(client: &Client, email: &str) -> String {
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), 200, "login should return 200");
    let body: Value = resp.json().await.expect("login response should be JSON");
    body["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}

/// Sign up a fresh user with the given role and return their token.
///
/// # Panics
///
/// Panics if signup or login fails.
pub async fn authenticated_token(client: &Client, role: &str) -> String {
    let email = unique_email(role);
    signup(client, &email, role).await;
    login(client, &email).await
}
