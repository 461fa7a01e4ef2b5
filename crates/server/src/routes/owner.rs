//! Store-owner dashboard handler.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use ratewise_core::Role;

use crate::error::Result;
use crate::middleware::Principal;
use crate::services::ReportingService;
use crate::state::AppState;

/// `GET /owner/dashboard`
///
/// Every store the caller owns, each with its cached average and the
/// users who rated it.
pub async fn dashboard(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    principal.require_role(&[Role::Owner])?;

    let stores = ReportingService::new(state.pool())
        .owner_dashboard(principal.user_id)
        .await?;

    Ok(Json(json!({ "stores": stores })))
}
