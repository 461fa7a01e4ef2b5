//! Rating domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use ratewise_core::{RatingId, StoreId, UserId};

/// One entry in a user's rating history: their rating joined with the
/// rated store's summary.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRatingEntry {
    pub id: RatingId,
    pub rating_value: i32,
    pub store_id: StoreId,
    pub store_name: String,
    pub address: String,
    pub avg_rating: Decimal,
}

/// A rating on an owned store, joined with the rater's public identity.
#[derive(Debug, Clone, Serialize)]
pub struct StoreRater {
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub rating_value: i32,
}

/// An owner-dashboard entry: one owned store plus everyone who rated it.
#[derive(Debug, Clone, Serialize)]
pub struct StoreWithRaters {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub avg_rating: Decimal,
    pub ratings: Vec<StoreRater>,
}
