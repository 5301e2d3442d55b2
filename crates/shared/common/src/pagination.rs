//! Offset/limit pagination types.

use domain::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Offset/limit window over a list ordered by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Limit capped at [`MAX_PAGE_SIZE`]
    pub fn capped_limit(&self) -> u64 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the numbers needed to fetch the next one.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, offset: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            offset,
            limit,
            total,
        }
    }

    /// Whether rows exist past this page
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.data.len() as u64) < self.total
    }

    /// Convert the items while keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_capped() {
        assert_eq!(PageRequest::new(0, 10).capped_limit(), 10);
        assert_eq!(PageRequest::new(0, 5_000).capped_limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn has_more_tracks_remaining_rows() {
        let first = Page::new(vec![1, 2, 3], 0, 3, 5);
        assert!(first.has_more());

        let last = Page::new(vec![4, 5], 3, 3, 5);
        assert!(!last.has_more());
    }

    #[test]
    fn default_request_starts_at_first_page() {
        let request = PageRequest::default();
        assert_eq!(request.offset, 0);
        assert_eq!(request.limit, DEFAULT_PAGE_SIZE);
    }
}
