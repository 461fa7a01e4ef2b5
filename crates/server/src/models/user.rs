//! User domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use ratewise_core::{Email, Role, UserId};

/// A registered user (domain type).
///
/// The stored password hash lives only in the repository layer and is
/// never part of this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique across users).
    pub email: Email,
    /// Postal address.
    pub address: String,
    /// Access role.
    pub role: Role,
}

/// The public projection returned from signup, login, and admin user
/// creation.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// A user detail view.
///
/// For owners, `avg_rating` carries the mean of the cached averages of
/// the stores they own (0 when they own none). It is absent for other
/// roles.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<Decimal>,
}
