//! Business logic services.
//!
//! Services sit between route handlers and repositories: they own
//! validation, authorization-independent rules, and error translation.

pub mod auth;
pub mod directory;
pub mod ratings;
pub mod reporting;
pub mod validation;

pub use auth::{AuthError, AuthService};
pub use directory::{DirectoryService, SortParams};
pub use ratings::{RatingError, RatingService};
pub use reporting::{DashboardStats, ReportingService};
