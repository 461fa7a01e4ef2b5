//! Domain types for the store-rating service.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod rating;
pub mod store;
pub mod user;

pub use rating::{StoreRater, StoreWithRaters, UserRatingEntry};
pub use store::{Store, StoreListing, ViewerStore};
pub use user::{PublicUser, User, UserDetail};
