//! Deterministic windowing over a sorted/filtered record sequence.
//!
//! A page is a pure slice of `[(page-1)*page_size, page*page_size)`. An
//! out-of-range page returns empty items with correct metadata instead of
//! erroring, so callers can always render a consistent "no more results"
//! state. Page-size changes are the caller's concern: reset to page 1 when
//! the size changes.

use serde::Serialize;

/// One page of results plus the window metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice `records` into the requested page.
///
/// `page` is 1-based; 0 is clamped to 1. `page_size` must be positive and is
/// clamped to 1 as a defensive guard against programmer error.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    debug_assert!(page_size > 0, "page_size must be positive");
    let page_size = page_size.max(1);
    let page = page.max(1);

    let total_items = records.len();
    let total_pages = total_items.div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size);
    let items = if start >= total_items {
        Vec::new()
    } else {
        records[start..(start + page_size).min(total_items)].to_vec()
    };

    Page {
        items,
        total_items,
        total_pages,
        page,
        page_size,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slicing() {
        let data: Vec<u32> = (1..=10).collect();
        let page = paginate(&data, 1, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let page = paginate(&data, 4, 3);
        assert_eq!(page.items, vec![10]);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_out_of_range_page() {
        let data: Vec<u32> = (1..=10).collect();
        let page = paginate(&data, 999, 50);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 10);
        assert!(!page.has_next);
    }

    #[test]
    fn test_empty_input() {
        let data: Vec<u32> = Vec::new();
        let page = paginate(&data, 1, 50);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        let data: Vec<u32> = (1..=5).collect();
        let page = paginate(&data, 0, 2);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_exact_boundary() {
        let data: Vec<u32> = (1..=6).collect();
        let page = paginate(&data, 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next);
    }
}
