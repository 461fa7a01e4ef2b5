//! Dashboard aggregates for the admin console and store owners.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;

use ratewise_core::{StoreId, UserId};

use crate::db::RepositoryError;
use crate::db::ratings::RatingRepository;
use crate::db::stores::StoreRepository;
use crate::db::users::UserRepository;
use crate::models::{StoreRater, StoreWithRaters};

/// Platform-wide totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
}

/// Reporting service.
pub struct ReportingService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportingService<'a> {
    /// Create a new reporting service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Row counts across the three tables.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any count fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let total_users = UserRepository::new(self.pool).count().await?;
        let total_stores = StoreRepository::new(self.pool).count().await?;
        let total_ratings = RatingRepository::new(self.pool).count().await?;

        Ok(DashboardStats {
            total_users,
            total_stores,
            total_ratings,
        })
    }

    /// The owner dashboard: every store the user owns, each with its
    /// cached average and the list of users who rated it.
    ///
    /// Two queries total, joined in memory; the rater list is empty for
    /// unrated stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn owner_dashboard(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<StoreWithRaters>, RepositoryError> {
        let stores = StoreRepository::new(self.pool).owned_by(owner_id).await?;

        let store_ids: Vec<StoreId> = stores.iter().map(|s| s.id).collect();
        let raters = RatingRepository::new(self.pool)
            .list_for_stores(&store_ids)
            .await?;

        let mut by_store: HashMap<StoreId, Vec<StoreRater>> = HashMap::new();
        for row in raters {
            by_store.entry(row.store_id).or_default().push(StoreRater {
                user_id: row.user_id,
                user_name: row.user_name,
                user_email: row.user_email,
                rating_value: row.rating_value,
            });
        }

        Ok(stores
            .into_iter()
            .map(|store| StoreWithRaters {
                ratings: by_store.remove(&store.id).unwrap_or_default(),
                id: store.id,
                name: store.name,
                address: store.address,
                avg_rating: store.avg_rating,
            })
            .collect())
    }
}
