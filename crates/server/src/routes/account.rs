//! Account self-service handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::services::AuthService;
use crate::services::validation::{FieldError, Validator};
use crate::state::AppState;

/// Body for `PATCH /user/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `PATCH /user/password`
///
/// Any authenticated caller may rotate their own password; the new one
/// must satisfy the same composition rules as at signup.
pub async fn change_password(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>> {
    let mut errors = Vec::new();
    if body.current_password.is_empty() {
        errors.push(FieldError::new(
            "currentPassword",
            "Current password is required",
        ));
    }
    if let Err(mut password_errors) = Validator::new().password(&body.new_password).finish() {
        errors.append(&mut password_errors);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    AuthService::new(&state)
        .change_password(principal.user_id, &body.current_password, &body.new_password)
        .await?;

    tracing::info!(user_id = %principal.user_id, "password updated");

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
