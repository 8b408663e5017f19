use super::{Document, FindOptions};

/// A validated page request: zero-based `page`, positive `limit`.
///
/// Request layers hand over whatever numbers they received, so construction
/// clamps instead of failing: a negative page becomes `0`, a non-positive
/// limit becomes `default_limit` and a limit above `max_limit` becomes
/// `max_limit`.
///
/// ```rust
/// use doclens::collection::Pagination;
///
/// let p = Pagination::new(-3, 0, 100, 1000);
/// assert_eq!((p.page(), p.limit()), (0, 100));
/// assert_eq!(p.skip(), 0);
///
/// let p = Pagination::new(2, 25, 100, 1000);
/// assert_eq!(p.skip(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, default_limit: u64, max_limit: u64) -> Self {
        let page = page.max(0) as u64;
        let limit = if limit <= 0 {
            default_limit
        } else {
            (limit as u64).min(max_limit)
        };
        // a zero limit would make every window empty and total_pages undefined
        let limit = limit.max(1);
        Pagination { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Offset of the first document of the window, `page * limit`.
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` documents, `ceil(total / limit)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    pub fn to_find_options(&self) -> FindOptions {
        FindOptions::new().skip(self.skip()).limit(self.limit)
    }
}

/// One window of a read together with the total it was cut from.
///
/// For a plain page read `total` is the collection size; for a search it is
/// the number of documents matching the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub documents: Vec<Document>,
    pub total: u64,
    pub pagination: Pagination,
}

impl Page {
    pub fn total_pages(&self) -> u64 {
        self.pagination.total_pages(self.total)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_negative_page() {
        let p = Pagination::new(-1, 10, 100, 1000);
        assert_eq!(p.page(), 0);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_non_positive_limit_uses_default() {
        assert_eq!(Pagination::new(0, 0, 100, 1000).limit(), 100);
        assert_eq!(Pagination::new(0, -5, 40, 1000).limit(), 40);
    }

    #[test]
    fn test_limit_capped_at_max() {
        assert_eq!(Pagination::new(0, 5000, 100, 1000).limit(), 1000);
    }

    #[test]
    fn test_total_pages() {
        let p = Pagination::new(0, 10, 100, 1000);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }

    #[test]
    fn test_find_options() {
        let options = Pagination::new(3, 20, 100, 1000).to_find_options();
        assert_eq!(options.skip, Some(60));
        assert_eq!(options.limit, Some(20));
        assert!(options.sort_by.is_none());
    }
}
