/// Page bookkeeping for list views. Pure state, no I/O; the store does not
/// consume this, list views compose it alongside whichever store they read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationTracker {
    current_page: u64,
    page_size: u64,
    total_elements: Option<u64>,
    total_pages: Option<u64>,
}

impl PaginationTracker {
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// Pages are 0-based. A non-positive `page_size` is clamped to 1.
    pub fn new(page_size: i64) -> Self {
        Self {
            current_page: 0,
            page_size: clamp_size(page_size),
            total_elements: None,
            total_pages: None,
        }
    }

    pub fn set_page(&mut self, page: i64) {
        self.current_page = page.max(0) as u64;
    }

    /// Changing the page size always lands the view back on the first page.
    pub fn set_page_size(&mut self, page_size: i64) {
        self.page_size = clamp_size(page_size);
        self.current_page = 0;
        self.recompute();
    }

    /// Back to the first page; the size stays as configured.
    pub fn reset(&mut self) {
        self.current_page = 0;
    }

    pub fn update_total_elements(&mut self, total: u64) {
        self.total_elements = Some(total);
        self.recompute();
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_elements(&self) -> Option<u64> {
        self.total_elements
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    fn recompute(&mut self) {
        self.total_pages = self.total_elements.map(|total| total.div_ceil(self.page_size));
    }
}

impl Default for PaginationTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}

fn clamp_size(page_size: i64) -> u64 {
    page_size.max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn starts_on_first_page_with_no_totals() {
        let tracker = PaginationTracker::new(10);
        assert_eq!(tracker.current_page(), 0);
        assert_eq!(tracker.page_size(), 10);
        assert_eq!(tracker.total_elements(), None);
        assert_eq!(tracker.total_pages(), None);
    }

    #[rstest]
    #[case(5, 5)]
    #[case(0, 0)]
    #[case(-3, 0)]
    fn set_page_clamps_negatives(#[case] requested: i64, #[case] expected: u64) {
        let mut tracker = PaginationTracker::new(10);
        tracker.set_page(requested);
        assert_eq!(tracker.current_page(), expected);
    }

    #[rstest]
    #[case(25, 25)]
    #[case(0, 1)]
    #[case(-10, 1)]
    fn page_size_is_clamped_to_at_least_one(#[case] requested: i64, #[case] expected: u64) {
        let mut tracker = PaginationTracker::new(requested);
        assert_eq!(tracker.page_size(), expected);
    }

    #[test]
    fn changing_page_size_resets_the_page() {
        let mut tracker = PaginationTracker::new(10);
        tracker.set_page(7);
        tracker.set_page_size(25);
        assert_eq!(tracker.current_page(), 0);
        assert_eq!(tracker.page_size(), 25);
    }

    #[test]
    fn reset_only_touches_the_page() {
        let mut tracker = PaginationTracker::new(10);
        tracker.set_page(3);
        tracker.update_total_elements(37);
        tracker.reset();
        assert_eq!(tracker.current_page(), 0);
        assert_eq!(tracker.page_size(), 10);
        assert_eq!(tracker.total_elements(), Some(37));
    }

    #[rstest]
    #[case(37, 10, 4)]
    #[case(40, 10, 4)]
    #[case(41, 10, 5)]
    #[case(0, 10, 0)]
    #[case(1, 25, 1)]
    fn total_pages_is_the_ceiling(
        #[case] total: u64,
        #[case] page_size: i64,
        #[case] expected: u64,
    ) {
        let mut tracker = PaginationTracker::new(page_size);
        tracker.update_total_elements(total);
        assert_eq!(tracker.total_pages(), Some(expected));
    }

    #[test]
    fn total_pages_follows_a_page_size_change() {
        let mut tracker = PaginationTracker::new(10);
        tracker.update_total_elements(37);
        tracker.set_page_size(20);
        assert_eq!(tracker.total_pages(), Some(2));
    }
}
