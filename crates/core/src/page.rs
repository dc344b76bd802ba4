//! Pagination and filter value objects.

/// Upper clamp for `limit` on every list endpoint.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Default `limit` when the caller does not provide one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// A clamped page request: `page >= 1`, `limit in [1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, clamping out-of-range values instead of failing.
    ///
    /// `page < 1` becomes 1; `limit < 1` becomes the default (10);
    /// `limit > 100` becomes 100.
    pub fn clamped(page: i64, limit: i64) -> Self {
        let page = page.clamp(1, u32::MAX as i64) as u32;
        let limit = if limit < 1 {
            DEFAULT_PAGE_LIMIT
        } else if limit > MAX_PAGE_LIMIT as i64 {
            MAX_PAGE_LIMIT
        } else {
            limit as u32
        };
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for the backing store: `(page - 1) * limit`.
    ///
    /// Widened to `u64` so the largest representable page times the limit
    /// cap stays exact.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page) - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Optional filters for the user list. Filters combine with AND;
/// `name` is a case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub name: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.min_age.is_none() && self.max_age.is_none() && self.name.is_none()
    }
}

/// One page of results plus the total count *before* pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Outcome of a selective update.
///
/// `NoChange` is advisory, not an error: the caller sent fields that were
/// either absent or equal to storage, and the handler renders the current
/// entity with 200 OK.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    Applied(T),
    NoChange(T),
}

impl<T> UpdateOutcome<T> {
    /// The entity, whether or not anything was written.
    pub fn into_inner(self) -> T {
        match self {
            Self::Applied(v) | Self::NoChange(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_lower_bounds() {
        let p = PageRequest::clamped(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);

        let p = PageRequest::clamped(-1, -7);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn page_clamps_upper_limit() {
        let p = PageRequest::clamped(2, 150);
        assert_eq!(p.page(), 2);
        assert_eq!(p.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn page_passes_in_range_values_through() {
        let p = PageRequest::clamped(3, 25);
        assert_eq!(p.page(), 3);
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn offset_is_zero_on_first_page() {
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn offset_stays_exact_for_huge_pages() {
        let p = PageRequest::clamped(50_000_000, 100);
        assert_eq!(p.page(), 50_000_000);
        assert_eq!(p.offset(), 4_999_999_900);
    }

    #[test]
    fn page_saturates_at_the_representable_maximum() {
        let p = PageRequest::clamped(4_294_967_297, 10);
        assert_eq!(p.page(), u32::MAX);
        assert_eq!(p.offset(), (u64::from(u32::MAX) - 1) * 10);
    }

    #[test]
    fn update_outcome_unwraps_either_variant() {
        assert_eq!(UpdateOutcome::Applied(7).into_inner(), 7);
        assert_eq!(UpdateOutcome::NoChange(7).into_inner(), 7);
    }
}
