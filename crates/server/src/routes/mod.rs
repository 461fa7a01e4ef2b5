//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                  - Liveness check
//! GET   /health/ready            - Readiness check (pings the database)
//!
//! # Auth (public)
//! POST  /auth/signup             - Register a new account
//! POST  /auth/login              - Login, returns a bearer token
//!
//! # Admin console (admin role unless noted)
//! GET   /admin/dashboard         - Platform totals
//! GET   /admin/users             - User listing with filters and sorting
//! GET   /admin/users/{id}        - User detail (owners carry their mean rating)
//! POST  /admin/users             - Create a user with any role
//! GET   /admin/stores            - Store listing, cached averages (admin or user)
//! POST  /admin/stores            - Create a store
//!
//! # Store directory (any authenticated user)
//! GET   /stores                  - Directory with live averages and own rating
//! POST  /stores                  - Create a store (admin or owner)
//! POST  /stores/{storeId}/rate   - Rate a store
//!
//! # Ratings (any authenticated user)
//! POST  /ratings                 - Rate a store named in the body
//! GET   /ratings/user            - The caller's rating history
//!
//! # Owner
//! GET   /owner/dashboard         - Owned stores with their raters (owner)
//!
//! # Account
//! PATCH /user/password           - Change own password
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod owner;
pub mod ratings;
pub mod stores;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

/// Create the admin console router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", get(admin::list_users).post(admin::add_user))
        .route("/users/{id}", get(admin::user_detail))
        .route("/stores", get(admin::list_stores).post(admin::add_store))
}

/// Create the store directory router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::list).post(stores::add))
        .route("/{storeId}/rate", post(ratings::rate_store))
}

/// Create the ratings router.
pub fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(ratings::submit_rating))
        .route("/user", get(ratings::user_ratings))
}

/// Create the owner router.
pub fn owner_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(owner::dashboard))
}

/// Create the account router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/password", patch(account::change_password))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/stores", store_routes())
        .nest("/ratings", rating_routes())
        .nest("/owner", owner_routes())
        .nest("/user", account_routes())
}
