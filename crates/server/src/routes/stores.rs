//! Store directory handlers for authenticated users.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use ratewise_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::db::stores::{StoreFilters, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::services::{DirectoryService, SortParams};
use crate::state::AppState;

/// Query parameters for the store directory.
#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub name: Option<String>,
    pub address: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Body for `POST /stores`.
#[derive(Debug, Deserialize)]
pub struct AddStoreRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    pub owner_id: Option<i32>,
}

/// `GET /stores`
///
/// Any authenticated caller. Each row carries the live average and the
/// caller's own rating.
pub async fn list(
    principal: Principal,
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<Value>> {
    let filters = StoreFilters {
        name: query.name,
        address: query.address,
    };
    let sort = SortParams {
        sort_by: query.sort,
        order: query.order,
    };

    let stores = DirectoryService::new(state.pool())
        .stores_for_viewer(principal.user_id, &filters, &sort)
        .await?;

    Ok(Json(json!({ "stores": stores })))
}

/// `POST /stores`
///
/// Admins and owners only. A lighter-weight variant of the admin
/// endpoint: presence checks only, one combined message.
pub async fn add(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<AddStoreRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    principal.require_role(&[Role::Admin, Role::Owner])?;

    let (name, email, owner_id) = match (body.name, body.email, body.owner_id) {
        (Some(name), Some(email), Some(owner_id)) if !name.is_empty() && !email.is_empty() => {
            (name, email, owner_id)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Name, email, and owner_id are required".to_string(),
            ));
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&name, &email, &body.address, UserId::new(owner_id))
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(store_id = %store.id, "store added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Store added successfully",
            "store": store,
        })),
    ))
}
