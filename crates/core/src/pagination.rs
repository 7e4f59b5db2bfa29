//! Page/limit pagination helpers for list endpoints.

/// Default page size when the caller does not supply `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset for a 1-based page.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Number of pages needed to show `total` rows at `limit` rows per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 10);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(500), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 100);
        assert_eq!(clamp_limit(Some(0), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE), 1);
    }

    #[test]
    fn clamp_page_floors_at_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(4)), 4);
    }

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 25), 50);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
