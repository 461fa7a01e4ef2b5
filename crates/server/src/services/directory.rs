//! Listing services for the admin console and the end-user store
//! directory.
//!
//! All listings share the same shape: optional substring filters, a
//! sort column checked against a per-listing allowlist, and a row cap.
//! An unrecognized sort column silently falls back to `id` ascending
//! rather than erroring.

use sqlx::PgPool;

use ratewise_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::db::sort::{
    STORE_SORT_COLUMNS, SortOrder, USER_SORT_COLUMNS, VIEWER_STORE_SORT_COLUMNS, sort_column,
};
use crate::db::stores::{StoreFilters, StoreRepository};
use crate::db::users::{UserFilters, UserRepository};
use crate::models::{StoreListing, User, UserDetail, ViewerStore};

/// Sort parameters as they arrive on the query string, unvalidated.
#[derive(Debug, Default, Clone)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl SortParams {
    /// Resolve against an allowlist. Unknown columns and orders fall
    /// back to `id` ascending.
    fn resolve(&self, allowed: &[&'static str]) -> (&'static str, SortOrder) {
        let column = sort_column(self.sort_by.as_deref(), allowed);
        let order = SortOrder::parse(self.order.as_deref());
        (column, order)
    }
}

/// Directory service: role-gated listings over users and stores.
pub struct DirectoryService<'a> {
    pool: &'a PgPool,
}

impl<'a> DirectoryService<'a> {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Admin listing of stores, with the cached average rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stores(
        &self,
        filters: &StoreFilters,
        sort: &SortParams,
    ) -> Result<Vec<StoreListing>, RepositoryError> {
        let (column, order) = sort.resolve(STORE_SORT_COLUMNS);
        StoreRepository::new(self.pool)
            .list(filters, column, order)
            .await
    }

    /// Store directory for an authenticated end-user: live averages plus
    /// the viewer's own rating per store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stores_for_viewer(
        &self,
        viewer: UserId,
        filters: &StoreFilters,
        sort: &SortParams,
    ) -> Result<Vec<ViewerStore>, RepositoryError> {
        let (column, order) = sort.resolve(VIEWER_STORE_SORT_COLUMNS);
        StoreRepository::new(self.pool)
            .list_for_viewer(viewer, filters, column, order)
            .await
    }

    /// Admin listing of users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` on an invalid stored row.
    pub async fn users(
        &self,
        filters: &UserFilters,
        sort: &SortParams,
    ) -> Result<Vec<User>, RepositoryError> {
        let (column, order) = sort.resolve(USER_SORT_COLUMNS);
        UserRepository::new(self.pool)
            .list(filters, column, order)
            .await
    }

    /// Admin detail view of one user.
    ///
    /// Owners additionally carry the mean of their stores' cached
    /// averages; for every other role `avg_rating` is omitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn user_detail(&self, id: UserId) -> Result<UserDetail, RepositoryError> {
        let user = UserRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let avg_rating = if user.role == Role::Owner {
            // An owner with no stores still reports an average, of 0.
            Some(
                StoreRepository::new(self.pool)
                    .cached_average_for_owner(user.id)
                    .await?
                    .unwrap_or_default(),
            )
        } else {
            None
        };

        Ok(UserDetail {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            role: user.role,
            avg_rating,
        })
    }
}
