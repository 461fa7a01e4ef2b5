//! Rating submission and history.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use ratewise_core::{StoreId, UserId};

use crate::db::RepositoryError;
use crate::db::ratings::RatingRepository;
use crate::models::UserRatingEntry;
use crate::services::validation::rating_in_range;

/// Errors from rating operations.
#[derive(Debug, Error)]
pub enum RatingError {
    /// Value outside 1..=5.
    #[error("rating must be an integer between 1 and 5")]
    InvalidValue,

    /// The target store does not exist.
    #[error("store not found")]
    StoreNotFound,

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Rating service.
pub struct RatingService<'a> {
    ratings: RatingRepository<'a>,
}

impl<'a> RatingService<'a> {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            ratings: RatingRepository::new(pool),
        }
    }

    /// Submit or overwrite the caller's rating for a store, returning
    /// the store's recomputed cached average.
    ///
    /// Submitting again for the same store replaces the previous value
    /// rather than adding a second row.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidValue` if `value` is outside 1..=5
    /// and `RatingError::StoreNotFound` if the store does not exist.
    pub async fn submit(
        &self,
        user_id: UserId,
        store_id: StoreId,
        value: i32,
    ) -> Result<Decimal, RatingError> {
        if !rating_in_range(value) {
            return Err(RatingError::InvalidValue);
        }

        self.ratings
            .submit(user_id, store_id, value)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => RatingError::StoreNotFound,
                other => RatingError::Repository(other),
            })
    }

    /// The caller's full rating history.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::Repository` if the query fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<UserRatingEntry>, RatingError> {
        Ok(self.ratings.list_for_user(user_id).await?)
    }
}
