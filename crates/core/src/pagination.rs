//! Page slicing and the page-number strip under the product grid.

use serde::Serialize;

/// Products shown per listing page.
pub const PRODUCTS_PER_PAGE: usize = 12;

/// Page numbers shown around the current page.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, always within `1..=total_pages`.
    pub current: usize,
    /// At least 1, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Page numbers to render for this page.
    #[must_use]
    pub fn window(&self) -> PageWindow {
        page_window(self.current, self.total_pages, MAX_VISIBLE_PAGES)
    }
}

/// Slice `items` into the requested page, clamping out-of-range page numbers.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let current = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((current - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        current,
        total_pages,
        total_items,
    }
}

/// Visible page numbers plus the first/last shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<usize>,
    pub show_first: bool,
    pub show_leading_ellipsis: bool,
    pub show_last: bool,
    pub show_trailing_ellipsis: bool,
    pub last: usize,
}

/// Up to `max_visible` page numbers centred on `current`, shifted near the ends.
#[must_use]
pub fn page_window(current: usize, total: usize, max_visible: usize) -> PageWindow {
    let total = total.max(1);
    let max_visible = max_visible.max(1);
    let current = current.clamp(1, total);

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end + 1 - start < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    PageWindow {
        pages: (start..=end).collect(),
        show_first: start > 1,
        show_leading_ellipsis: start > 2,
        show_last: end < total,
        show_trailing_ellipsis: end + 1 < total,
        last: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_slices_pages() {
        let page = paginate((1..=30).collect::<Vec<_>>(), 2, 12);
        assert_eq!(page.items, (13..=24).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 30);
        assert!(page.has_previous());
        assert!(page.has_next());

        let last = paginate((1..=30).collect::<Vec<_>>(), 3, 12);
        assert_eq!(last.items, (25..=30).collect::<Vec<_>>());
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let page = paginate((1..=5).collect::<Vec<_>>(), 9, 12);
        assert_eq!(page.current, 1);
        assert_eq!(page.items.len(), 5);

        let zero = paginate((1..=30).collect::<Vec<_>>(), 0, 12);
        assert_eq!(zero.current, 1);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let page = paginate(Vec::<u8>::new(), 1, 12);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_window_centres_on_current() {
        let window = page_window(6, 10, 5);
        assert_eq!(window.pages, vec![4, 5, 6, 7, 8]);
        assert!(window.show_first);
        assert!(window.show_leading_ellipsis);
        assert!(window.show_last);
        assert!(window.show_trailing_ellipsis);
        assert_eq!(window.last, 10);
    }

    #[test]
    fn test_window_shifts_at_edges() {
        let start = page_window(1, 10, 5);
        assert_eq!(start.pages, vec![1, 2, 3, 4, 5]);
        assert!(!start.show_first);
        assert!(start.show_trailing_ellipsis);

        let end = page_window(10, 10, 5);
        assert_eq!(end.pages, vec![6, 7, 8, 9, 10]);
        assert!(end.show_leading_ellipsis);
        assert!(!end.show_last);

        let near_end = page_window(9, 10, 5);
        assert_eq!(near_end.pages, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_window_with_few_pages() {
        let window = page_window(2, 3, 5);
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(!window.show_first);
        assert!(!window.show_last);

        let adjacent = page_window(4, 6, 5);
        assert_eq!(adjacent.pages, vec![2, 3, 4, 5, 6]);
        assert!(adjacent.show_first);
        assert!(!adjacent.show_leading_ellipsis);
    }
}
