//! Admin console handlers: dashboard totals, user and store management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use ratewise_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::db::stores::{StoreFilters, StoreRepository};
use crate::db::users::UserFilters;
use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::models::PublicUser;
use crate::services::validation::{FieldError, Validator, parse_role};
use crate::services::{AuthService, DirectoryService, ReportingService, SortParams};
use crate::state::AppState;

/// Query parameters shared by the listing endpoints. Unknown sort
/// columns fall back to id ascending.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListQuery {
    fn sort_params(&self) -> SortParams {
        SortParams {
            sort_by: self.sort.clone(),
            order: self.order.clone(),
        }
    }
}

/// Body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: String,
    pub role: String,
}

/// Body for `POST /admin/stores`.
#[derive(Debug, Deserialize)]
pub struct AddStoreRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub address: String,
    pub owner_id: Option<i32>,
}

/// `GET /admin/dashboard`
pub async fn dashboard(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    principal.require_role(&[Role::Admin])?;

    let stats = ReportingService::new(state.pool()).dashboard_stats().await?;

    Ok(Json(json!(stats)))
}

/// `GET /admin/users`
pub async fn list_users(
    principal: Principal,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    principal.require_role(&[Role::Admin])?;

    // Role is an exact-match filter: a value outside the closed set
    // cannot match any stored row, so short-circuit to an empty page.
    let role = match query.role.as_deref() {
        None => None,
        Some(raw) => match parse_role(raw) {
            Some(role) => Some(role),
            None => return Ok(Json(json!({ "users": [] }))),
        },
    };

    let filters = UserFilters {
        name: query.name.clone(),
        email: query.email.clone(),
        address: query.address.clone(),
        role,
    };

    let users = DirectoryService::new(state.pool())
        .users(&filters, &query.sort_params())
        .await?;

    Ok(Json(json!({ "users": users })))
}

/// `GET /admin/users/{id}`
pub async fn user_detail(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    principal.require_role(&[Role::Admin])?;

    let user = DirectoryService::new(state.pool())
        .user_detail(UserId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User not found".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "user": user })))
}

/// `GET /admin/stores`
///
/// Also reachable by ordinary users; the projection carries the cached
/// average only.
pub async fn list_stores(
    principal: Principal,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    principal.require_role(&[Role::Admin, Role::User])?;

    let filters = StoreFilters {
        name: query.name.clone(),
        address: query.address.clone(),
    };

    let stores = DirectoryService::new(state.pool())
        .stores(&filters, &query.sort_params())
        .await?;

    Ok(Json(json!({ "stores": stores })))
}

/// `POST /admin/users`
pub async fn add_user(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    principal.require_role(&[Role::Admin])?;

    Validator::new()
        .admin_name(&body.name)
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

    tracing::info!(user_id = %user.id, role = %user.role, "user added by admin");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User added successfully",
            "user": PublicUser::from(user),
        })),
    ))
}

/// `POST /admin/stores`
pub async fn add_store(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<AddStoreRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    principal.require_role(&[Role::Admin])?;

    let mut errors = Vec::new();
    if body.name.as_deref().is_none_or(str::is_empty) {
        errors.push(FieldError::new("name", "Name is required"));
    }
    match body.email.as_deref() {
        Some(email) if Validator::new().email(email).finish().is_ok() => {}
        _ => errors.push(FieldError::new("email", "Valid email is required")),
    }
    if Validator::new().address(&body.address).finish().is_err() {
        errors.push(FieldError::new("address", "Address too long"));
    }
    if body.owner_id.is_none() {
        errors.push(FieldError::new("owner_id", "Valid owner_id is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // Validation above guarantees these are present.
    let name = body.name.unwrap_or_default();
    let email = body.email.unwrap_or_default();
    let owner_id = body.owner_id.unwrap_or_default();

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
