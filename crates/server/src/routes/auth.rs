//! Signup and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result, set_sentry_user};
use crate::models::PublicUser;
use crate::services::AuthService;
use crate::services::validation::{FieldError, Validator, parse_role};
use crate::state::AppState;

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: String,
    pub role: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    Validator::new()
        .signup_name(&body.name)
        .email(&body.email)
        .password(&body.password)
        .address(&body.address)
        .role(&body.role)
        .finish()
        .map_err(AppError::Validation)?;

    let role = parse_role(&body.role).ok_or_else(|| {
        AppError::Validation(vec![FieldError::new(
            "role",
            "Role must be admin, owner, or user",
        )])
    })?;

    let user = AuthService::new(&state)
        .register(&body.name, &body.email, &body.password, &body.address, role)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": PublicUser::from(user),
        })),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let mut errors = Validator::new()
        .email(&body.email)
        .finish()
        .err()
        .unwrap_or_default();
    if body.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let (user, token) = AuthService::new(&state)
        .login(&body.email, &body.password)
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": PublicUser::from(user),
    })))
}
