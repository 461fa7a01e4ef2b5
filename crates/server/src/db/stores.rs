//! Store repository for database operations.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use ratewise_core::{StoreId, UserId};

use super::RepositoryError;
use super::sort::SortOrder;
use crate::models::{Store, StoreListing, ViewerStore};

/// Maximum rows returned by a listing query.
const MAX_LIST_ROWS: i64 = 100;

/// Optional filters for store listings: case-insensitive substring
/// matches on name and address.
#[derive(Debug, Default, Clone)]
pub struct StoreFilters {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// A store as it appears on its owner's dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedStore {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub avg_rating: Decimal,
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `owner_id` does not
    /// reference an existing user, `RepositoryError::Database` on other
    /// failures.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        address: &str,
        owner_id: UserId,
    ) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (name, email, address, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, address, owner_id, avg_rating
            ",
        )
        .bind(name)
        .bind(email)
        .bind(address)
        .bind(owner_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "owner does not exist"))?;

        Ok(store)
    }

    /// List stores with the cached average (admin projection).
    ///
    /// `sort_column` must come from [`super::sort::STORE_SORT_COLUMNS`];
    /// results are capped at 100 rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filters: &StoreFilters,
        sort_column: &'static str,
        order: SortOrder,
    ) -> Result<Vec<StoreListing>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, email, address, avg_rating FROM stores WHERE TRUE");

        push_store_filters(&mut query, filters, "");

        query
            .push(" ORDER BY ")
            .push(sort_column)
            .push(" ")
            .push(order.as_sql())
            .push(" LIMIT ")
            .push_bind(MAX_LIST_ROWS);

        let stores = query.build_query_as().fetch_all(self.pool).await?;

        Ok(stores)
    }

    /// List stores for an authenticated end-user.
    ///
    /// Each row carries the live ledger average (un-rounded, 0 when no
    /// ratings exist) and the viewer's own rating when present.
    /// `sort_column` must come from
    /// [`super::sort::VIEWER_STORE_SORT_COLUMNS`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_viewer(
        &self,
        viewer: UserId,
        filters: &StoreFilters,
        sort_column: &'static str,
        order: SortOrder,
    ) -> Result<Vec<ViewerStore>, RepositoryError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r"
            SELECT
                s.id,
                s.name,
                s.address,
                COALESCE(AVG(r.rating_value), 0) AS average_rating,
                ur.rating_value AS user_rating
            FROM stores s
            LEFT JOIN ratings r ON r.store_id = s.id
            LEFT JOIN ratings ur ON ur.store_id = s.id AND ur.user_id = ",
        );
        query.push_bind(viewer);
        query.push(" WHERE TRUE");

        push_store_filters(&mut query, filters, "s.");

        query
            .push(" GROUP BY s.id, ur.rating_value ORDER BY ")
            .push(sort_column)
            .push(" ")
            .push(order.as_sql())
            .push(" LIMIT ")
            .push_bind(MAX_LIST_ROWS);

        let stores = query.build_query_as().fetch_all(self.pool).await?;

        Ok(stores)
    }

    /// All stores owned by a user, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn owned_by(&self, owner_id: UserId) -> Result<Vec<OwnedStore>, RepositoryError> {
        let stores = sqlx::query_as::<_, OwnedStore>(
            "SELECT id, name, address, avg_rating FROM stores WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }

    /// Mean of the cached `avg_rating` values across an owner's stores.
    ///
    /// This deliberately averages the stored one-decimal values rather
    /// than recomputing from the ledger. `None` when the owner has no
    /// stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cached_average_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Option<Decimal>, RepositoryError> {
        let avg = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT AVG(avg_rating) FROM stores WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(self.pool)
        .await?;

        Ok(avg)
    }

    /// Total number of stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

/// Append the shared name/address ILIKE filters to a listing query.
fn push_store_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filters: &StoreFilters,
    table_prefix: &str,
) {
    if let Some(name) = &filters.name {
        query
            .push(format!(" AND {table_prefix}name ILIKE "))
            .push_bind(format!("%{name}%"));
    }
    if let Some(address) = &filters.address {
        query
            .push(format!(" AND {table_prefix}address ILIKE "))
            .push_bind(format!("%{address}%"));
    }
}
