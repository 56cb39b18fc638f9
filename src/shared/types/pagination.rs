/// Upper bound for any page size requested by a client
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized page request (1-based page, clamped limit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build a page request, falling back to `default_limit` when the caller
    /// did not ask for one.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Paginated result wrapper
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        // An empty result still reports one (empty) page
        let total_pages = total.div_ceil(page.limit as u64).max(1) as u32;
        Self {
            items,
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        let p = PageRequest::new(None, None, 5);
        assert_eq!(p, PageRequest { page: 1, limit: 5 });

        let p = PageRequest::new(Some(0), Some(0), 5);
        assert_eq!(p, PageRequest { page: 1, limit: 1 });

        let p = PageRequest::new(Some(3), Some(500), 5);
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 200);
    }

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        let page = PageRequest::new(Some(1), Some(10), 10);
        assert_eq!(PaginatedResult::<u8>::new(vec![], 0, page).total_pages, 1);
        assert_eq!(PaginatedResult::<u8>::new(vec![], 10, page).total_pages, 1);
        assert_eq!(PaginatedResult::<u8>::new(vec![], 11, page).total_pages, 2);
    }
}
