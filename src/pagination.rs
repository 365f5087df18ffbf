use tracing::trace;

pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page bookkeeping for a list of `total` items. Pages are counted from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Pager::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// Creates a pager. Sizes outside [`PAGE_SIZES`] snap to the nearest allowed one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: Self::snap(page_size),
            total: 0,
        }
    }

    fn snap(size: usize) -> usize {
        PAGE_SIZES
            .iter()
            .copied()
            .min_by_key(|s| s.abs_diff(size))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Sets the item count and goes back to the first page.
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = Self::snap(size);
        self.page = 1;
        trace!("Page size set to {}", self.page_size);
    }

    /// Moves to the next allowed page size, wrapping from the largest to the smallest.
    pub fn cycle_page_size(&mut self) {
        let idx = PAGE_SIZES
            .iter()
            .position(|&s| s == self.page_size)
            .unwrap_or(0);
        self.set_page_size(PAGE_SIZES[(idx + 1) % PAGE_SIZES.len()]);
    }

    pub fn next_page(&mut self) {
        self.page = std::cmp::min(self.page + 1, self.total_pages().max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = std::cmp::max(1, self.page - 1);
    }

    /// Index range of the current page, clamped to the item count.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = std::cmp::min((self.page - 1) * self.page_size, self.total);
        let end = std::cmp::min(start + self.page_size, self.total);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether there is more than one page, the page line is hidden otherwise.
    pub fn is_paged(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn summary(&self) -> String {
        let range = self.range();
        format!(
            "Showing {} to {} of {} results",
            range.start + 1,
            range.end,
            self.total
        )
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_items_into_pages() {
        let mut pager = Pager::new(10);
        pager.reset(23);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.range(), 0..10);
        pager.next_page();
        pager.next_page();
        assert_eq!(pager.range(), 20..23);
        assert_eq!(pager.summary(), "Showing 21 to 23 of 23 results");
        assert_eq!(pager.page_label(), "Page 3 of 3");
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut pager = Pager::new(5);
        pager.reset(7);
        pager.prev_page();
        assert_eq!(pager.page(), 1);
        assert!(!pager.has_prev());
        pager.next_page();
        pager.next_page();
        assert_eq!(pager.page(), 2);
        assert!(!pager.has_next());
    }

    #[test]
    fn changing_size_returns_to_first_page() {
        let mut pager = Pager::new(5);
        pager.reset(100);
        pager.next_page();
        pager.set_page_size(25);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.total_pages(), 4);
    }

    #[test]
    fn cycles_and_snaps_page_sizes() {
        let mut pager = Pager::new(50);
        pager.cycle_page_size();
        assert_eq!(pager.page_size(), 5);
        pager.cycle_page_size();
        assert_eq!(pager.page_size(), 10);
        assert_eq!(Pager::new(30).page_size(), 25);
        assert_eq!(Pager::new(0).page_size(), 5);
        assert_eq!(Pager::new(1000).page_size(), 50);
    }

    #[test]
    fn single_page_is_not_paged() {
        let mut pager = Pager::new(10);
        pager.reset(10);
        assert!(!pager.is_paged());
        pager.reset(11);
        assert!(pager.is_paged());
        pager.reset(0);
        assert!(!pager.is_paged());
    }

    #[test]
    fn empty_list() {
        let mut pager = Pager::default();
        pager.reset(0);
        assert_eq!(pager.total_pages(), 0);
        assert_eq!(pager.range(), 0..0);
        pager.next_page();
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.page_label(), "Page 1 of 1");
    }
}
