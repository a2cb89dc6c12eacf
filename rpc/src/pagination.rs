//! Page-number pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page when `page` is not specified.
pub const DEFAULT_PAGE: u64 = 1;
/// Default page size when `page_size` is not specified.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Common pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number (default 1).
    pub page: Option<u64>,
    /// Items per page (default 50, max 1000).
    pub page_size: Option<u64>,
}

impl PageParams {
    /// Effective page number, at least 1.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of a collection, with navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice a fully materialized collection into one page.
///
/// For a collection of size `T`, page `p` of size `s` holds
/// `min(s, max(0, T - (p-1)·s))` items.
pub fn paginate<T>(items: Vec<T>, params: &PageParams) -> Page<T> {
    let page = params.page();
    let page_size = params.page_size();
    let total = items.len() as u64;
    let start = (page - 1).saturating_mul(page_size);

    let items: Vec<T> = items
        .into_iter()
        .skip(start as usize)
        .take(page_size as usize)
        .collect();

    Page {
        has_next: page.saturating_mul(page_size) < total,
        has_prev: page > 1,
        items,
        page,
        page_size,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: u64, page_size: u64) -> PageParams {
        PageParams {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    #[test]
    fn middle_page_of_seven() {
        let page = paginate((1..=7).collect(), &params(2, 3));
        assert_eq!(page.items, vec![4, 5, 6]);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn last_partial_page_of_seven() {
        let page = paginate((1..=7).collect(), &params(3, 3));
        assert_eq!(page.items, vec![7]);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn first_page_has_no_prev() {
        let page = paginate((1..=7).collect(), &params(1, 3));
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate((1..=7).collect::<Vec<u32>>(), &params(5, 3));
        assert!(page.items.is_empty());
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn item_count_formula_holds() {
        // min(s, max(0, T - (p-1)s)) across a grid of shapes.
        for total in 0u64..12 {
            for page in 1u64..5 {
                for size in 1u64..6 {
                    let items: Vec<u64> = (0..total).collect();
                    let result = paginate(items, &params(page, size));
                    let expected = size.min(total.saturating_sub((page - 1) * size));
                    assert_eq!(
                        result.items.len() as u64,
                        expected,
                        "total={total} page={page} size={size}"
                    );
                }
            }
        }
    }

    #[test]
    fn defaults_and_clamping() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 50);

        let oversized = PageParams {
            page: Some(0),
            page_size: Some(100_000),
        };
        assert_eq!(oversized.page(), 1);
        assert_eq!(oversized.page_size(), 1000);
    }
}
