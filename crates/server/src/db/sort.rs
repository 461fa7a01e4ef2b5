//! Sort parameter sanitization for listing queries.
//!
//! Listing endpoints accept `sort` and `order` query parameters. Values
//! outside the allowlist silently fall back to `id` / ascending rather
//! than erroring; callers rely on that permissive behavior.
//!
//! These helpers are the only place a sort identifier reaches SQL, so
//! column interpolation stays allowlisted.

/// Sort columns accepted by the admin store listing.
pub const STORE_SORT_COLUMNS: &[&str] = &["id", "name", "email", "address", "avg_rating"];

/// Sort columns accepted by the authenticated-viewer store listing,
/// which sorts on the live aggregate rather than the cached one.
pub const VIEWER_STORE_SORT_COLUMNS: &[&str] =
    &["id", "name", "email", "address", "average_rating"];

/// Sort columns accepted by the user listing.
pub const USER_SORT_COLUMNS: &[&str] = &["id", "name", "email", "address", "role"];

/// Resolve a requested sort column against an allowlist.
///
/// Matching is case-insensitive; anything unrecognized (including an
/// absent parameter) resolves to `id`.
#[must_use]
pub fn sort_column(requested: Option<&str>, allowed: &[&'static str]) -> &'static str {
    requested
        .and_then(|r| {
            allowed
                .iter()
                .find(|column| column.eq_ignore_ascii_case(r))
                .copied()
        })
        .unwrap_or("id")
}

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a requested order, falling back to ascending.
    #[must_use]
    pub fn parse(requested: Option<&str>) -> Self {
        match requested {
            Some(r) if r.eq_ignore_ascii_case("desc") => Self::Desc,
            Some(r) if r.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Asc,
        }
    }

    /// The SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_recognized() {
        assert_eq!(sort_column(Some("name"), STORE_SORT_COLUMNS), "name");
        assert_eq!(
            sort_column(Some("avg_rating"), STORE_SORT_COLUMNS),
            "avg_rating"
        );
        assert_eq!(sort_column(Some("role"), USER_SORT_COLUMNS), "role");
    }

    #[test]
    fn test_sort_column_case_insensitive() {
        assert_eq!(sort_column(Some("NAME"), STORE_SORT_COLUMNS), "name");
        assert_eq!(sort_column(Some("Email"), USER_SORT_COLUMNS), "email");
    }

    #[test]
    fn test_sort_column_unrecognized_falls_back_to_id() {
        // Never an error: unknown columns silently become "id"
        assert_eq!(sort_column(Some("password"), USER_SORT_COLUMNS), "id");
        assert_eq!(
            sort_column(Some("1; DROP TABLE stores"), STORE_SORT_COLUMNS),
            "id"
        );
        assert_eq!(sort_column(None, STORE_SORT_COLUMNS), "id");
    }

    #[test]
    fn test_viewer_listing_sorts_live_aggregate() {
        assert_eq!(
            sort_column(Some("average_rating"), VIEWER_STORE_SORT_COLUMNS),
            "average_rating"
        );
        // The cached column is not sortable in the viewer listing
        assert_eq!(
            sort_column(Some("avg_rating"), VIEWER_STORE_SORT_COLUMNS),
            "id"
        );
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }
}
