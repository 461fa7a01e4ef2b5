//! Rating submission and history handlers.
//!
//! Submission is reachable two ways: `POST /stores/{storeId}/rate` with
//! the store in the path, and `POST /ratings` with the store in the
//! body. Both share the same semantics: 1-5 integer, idempotent per
//! (store, user), response carries the recomputed cached average.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use ratewise_core::StoreId;

use crate::error::Result;
use crate::middleware::Principal;
use crate::services::RatingService;
use crate::state::AppState;

/// Body for `POST /stores/{storeId}/rate`.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

/// Body for `POST /ratings`, which names the store explicitly.
#[derive(Debug, Deserialize)]
pub struct SubmitRatingRequest {
    pub store_id: i32,
    pub rating: i32,
}

/// `POST /stores/{storeId}/rate`
pub async fn rate_store(
    principal: Principal,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Json(body): Json<RateRequest>,
) -> Result<Json<Value>> {
    submit(&state, &principal, StoreId::new(store_id), body.rating).await
}

/// `POST /ratings`
pub async fn submit_rating(
    principal: Principal,
    State(state): State<AppState>,
    Json(body): Json<SubmitRatingRequest>,
) -> Result<Json<Value>> {
    submit(&state, &principal, StoreId::new(body.store_id), body.rating).await
}

async fn submit(
    state: &AppState,
    principal: &Principal,
    store_id: StoreId,
    rating: i32,
) -> Result<Json<Value>> {
    let avg_rating = RatingService::new(state.pool())
        .submit(principal.user_id, store_id, rating)
        .await?;

    tracing::info!(user_id = %principal.user_id, store_id = %store_id, rating, "rating submitted");

    Ok(Json(json!({
        "message": "Rating submitted successfully",
        "avg_rating": avg_rating,
    })))
}

/// `GET /ratings/user`
///
/// The caller's full rating history.
pub async fn user_ratings(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    let ratings = RatingService::new(state.pool())
        .history(principal.user_id)
        .await?;

    Ok(Json(json!({ "ratings": ratings })))
}
