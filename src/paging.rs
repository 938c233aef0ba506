pub const WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
}

/// Slices `list` into pages of `page_size`. Out-of-range requests (zero,
/// negative, past the end) clamp to the nearest valid page.
pub fn paginate<T: Clone>(list: &[T], page_size: usize, requested_page: i64) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = list.len().div_ceil(page_size).max(1);
    let page = clamp_page(requested_page, total_pages);

    let start = ((page - 1) * page_size).min(list.len());
    let end = (start + page_size).min(list.len());

    Page {
        page,
        total_pages,
        items: list[start..end].to_vec(),
    }
}

pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    let total = total_pages.max(1) as i64;
    requested.clamp(1, total) as usize
}

/// The block of page buttons shown around the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub first: usize,
    pub last: usize,
    pub total_pages: usize,
}

impl PageWindow {
    pub fn new(page: usize, total_pages: usize) -> Self {
        let total_pages = total_pages.max(1);
        let page = page.clamp(1, total_pages);
        let first = (page - 1) / WINDOW * WINDOW + 1;
        let last = (first + WINDOW - 1).min(total_pages);
        Self {
            first,
            last,
            total_pages,
        }
    }

    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn has_prev_group(&self) -> bool {
        self.first > 1
    }

    pub fn has_next_group(&self) -> bool {
        self.last < self.total_pages
    }
}

pub fn next_group(page: usize, total_pages: usize) -> usize {
    clamp_page(page as i64 + WINDOW as i64, total_pages)
}

pub fn prev_group(page: usize, total_pages: usize) -> usize {
    clamp_page(page as i64 - WINDOW as i64, total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_clamps() {
        let list: Vec<u32> = (1..=17).collect();
        let page = paginate(&list, 15, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.items, vec![16, 17]);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let list: Vec<u32> = Vec::new();
        let page = paginate(&list, 15, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_any_request_matches_clamped_request() {
        let list: Vec<u32> = (0..23).collect();
        for requested in [-100, -1, 0, 1, 2, 3, 4, 50, i64::MAX, i64::MIN] {
            let page = paginate(&list, 10, requested);
            let clamped = requested.clamp(1, 3);
            assert_eq!(page, paginate(&list, 10, clamped));
        }
    }

    #[test]
    fn test_pages_reconstruct_list() {
        let list: Vec<u32> = (0..47).collect();
        let first = paginate(&list, 10, 1);
        let mut rebuilt = Vec::new();
        for p in 1..=first.total_pages {
            let page = paginate(&list, 10, p as i64);
            let expected = 10.min(list.len().saturating_sub((page.page - 1) * 10));
            assert_eq!(page.items.len(), expected);
            rebuilt.extend(page.items);
        }
        assert_eq!(rebuilt, list);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let list = vec!["a", "b"];
        let page = paginate(&list, 0, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec!["b"]);
    }

    #[test]
    fn test_window() {
        let window = PageWindow::new(7, 12);
        assert_eq!(window.pages(), 6..=10);
        assert!(window.has_prev_group());
        assert!(window.has_next_group());

        let window = PageWindow::new(12, 12);
        assert_eq!(window.pages(), 11..=12);
        assert!(!window.has_next_group());

        let window = PageWindow::new(1, 3);
        assert_eq!(window.pages(), 1..=3);
        assert!(!window.has_prev_group());
    }

    #[test]
    fn test_group_jumps() {
        assert_eq!(next_group(2, 12), 7);
        assert_eq!(next_group(10, 12), 12);
        assert_eq!(prev_group(7, 12), 2);
        assert_eq!(prev_group(3, 12), 1);
    }
}
