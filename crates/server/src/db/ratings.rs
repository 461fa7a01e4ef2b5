//! Rating ledger repository.
//!
//! Owns the invariant "one rating row per (store, user)" and keeps the
//! stores' cached `avg_rating` consistent with the ledger: every write
//! goes through [`RatingRepository::submit`], which upserts and
//! recomputes inside a single per-store transaction.

use rust_decimal::Decimal;
use sqlx::PgPool;

use ratewise_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::UserRatingEntry;

/// Internal row for the owner-dashboard join: one rating with its
/// author's public identity, tagged with the rated store.
#[derive(Debug, sqlx::FromRow)]
pub struct StoreRaterRow {
    pub store_id: StoreId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub rating_value: i32,
}

/// Repository for rating ledger operations.
pub struct RatingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a user's rating for a store and return the recomputed
    /// cached average.
    ///
    /// The whole operation is one transaction:
    ///
    /// 1. Lock the store row (`SELECT ... FOR UPDATE`). This doubles as
    ///    the existence check and serializes concurrent submissions for
    ///    the same store; submissions against other stores proceed
    ///    independently.
    /// 2. Upsert the ledger row: an existing `(store, user)` row has its
    ///    value overwritten, otherwise a row is inserted. The unique
    ///    constraint guarantees the race resolves to last-writer-wins on
    ///    a single row.
    /// 3. Recompute `stores.avg_rating` from the full current ledger,
    ///    rounded to one decimal place, and persist it.
    ///
    /// No reader can observe the new ledger row without the matching
    /// cached average.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist
    /// (nothing is written), `RepositoryError::Database` on other
    /// failures.
    pub async fn submit(
        &self,
        user_id: UserId,
        store_id: StoreId,
        rating_value: i32,
    ) -> Result<Decimal, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?;

        if locked.is_none() {
            // Dropping the transaction rolls it back.
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO ratings (store_id, user_id, rating_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (store_id, user_id)
            DO UPDATE SET rating_value = EXCLUDED.rating_value
            ",
        )
        .bind(store_id)
        .bind(user_id)
        .bind(rating_value)
        .execute(&mut *tx)
        .await?;

        let avg_rating = sqlx::query_scalar::<_, Decimal>(
            r"
            UPDATE stores
            SET avg_rating = COALESCE(
                (SELECT ROUND(AVG(rating_value)::numeric, 1)
                 FROM ratings WHERE store_id = $1),
                0)
            WHERE id = $1
            RETURNING avg_rating
            ",
        )
        .bind(store_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(avg_rating)
    }

    /// Every rating a user has submitted, joined with the rated store's
    /// summary. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserRatingEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, UserRatingEntry>(
            r"
            SELECT r.id, r.rating_value,
                   s.id AS store_id, s.name AS store_name, s.address, s.avg_rating
            FROM ratings r
            JOIN stores s ON r.store_id = s.id
            WHERE r.user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// All ratings on the given stores, joined with each rater's public
    /// identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_stores(
        &self,
        store_ids: &[StoreId],
    ) -> Result<Vec<StoreRaterRow>, RepositoryError> {
        let ids: Vec<i32> = store_ids.iter().map(StoreId::as_i32).collect();

        let rows = sqlx::query_as::<_, StoreRaterRow>(
            r"
            SELECT r.store_id,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   r.rating_value
            FROM ratings r
            JOIN users u ON r.user_id = u.id
            WHERE r.store_id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Total number of ledger rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
