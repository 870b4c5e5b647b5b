//! Pagination math shared by the log tables.

/// Maximum number of numbered page links shown at once.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Total pages for `len` items at `per_page` items each.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// Half-open index range `[(page-1)*per_page, page*per_page)` clipped to `len`.
/// `page` is 1-based; a page past the end yields an empty range.
pub fn page_bounds(page: usize, per_page: usize, len: usize) -> (usize, usize) {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(len);
    let end = start.saturating_add(per_page).min(len);
    (start, end)
}

/// Window of page numbers to render, centered on `current` and clamped to
/// `[1, total]`. Both bounds are inclusive.
pub fn visible_window(current: usize, total: usize) -> (usize, usize) {
    let current = current.clamp(1, total.max(1));
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
    if end + 1 - start < MAX_VISIBLE_PAGES {
        start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 30), 0);
        assert_eq!(total_pages(1, 30), 1);
        assert_eq!(total_pages(30, 30), 1);
        assert_eq!(total_pages(31, 30), 2);
        assert_eq!(total_pages(90, 30), 3);
    }

    #[test]
    fn page_bounds_cover_all_items_without_overlap() {
        assert_eq!(page_bounds(1, 30, 75), (0, 30));
        assert_eq!(page_bounds(2, 30, 75), (30, 60));
        assert_eq!(page_bounds(3, 30, 75), (60, 75));
    }

    #[test]
    fn page_past_the_end_is_empty() {
        assert_eq!(page_bounds(4, 30, 75), (75, 75));
        assert_eq!(page_bounds(2, 30, 10), (10, 10));
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        assert_eq!(page_bounds(0, 30, 75), (0, 30));
    }

    #[test]
    fn window_centers_on_current() {
        assert_eq!(visible_window(5, 10), (3, 7));
    }

    #[test]
    fn window_clamps_at_start() {
        assert_eq!(visible_window(1, 10), (1, 5));
        assert_eq!(visible_window(2, 10), (1, 5));
    }

    #[test]
    fn window_clamps_at_end() {
        assert_eq!(visible_window(10, 10), (6, 10));
        assert_eq!(visible_window(9, 10), (6, 10));
    }

    #[test]
    fn window_shrinks_when_few_pages() {
        assert_eq!(visible_window(1, 3), (1, 3));
        assert_eq!(visible_window(1, 1), (1, 1));
    }
}
