//! Store domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use ratewise_core::{StoreId, UserId};

/// A store (domain type).
///
/// `avg_rating` is a cached aggregate over the rating ledger. It is
/// recomputed and persisted inside the same transaction as every rating
/// write; nothing else may set it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// The owning user.
    pub owner_id: UserId,
    /// Cached mean rating, one decimal place, 0 when unrated.
    pub avg_rating: Decimal,
}

/// Admin listing projection: the cached average, no owner reference.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoreListing {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub address: String,
    pub avg_rating: Decimal,
}

/// Store row as seen by an authenticated end-user.
///
/// `average_rating` is computed live from the ledger (un-rounded) and
/// `user_rating` is the viewer's own rating, absent if they have not
/// rated the store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ViewerStore {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub average_rating: Decimal,
    pub user_rating: Option<i32>,
}
