/// Bookkeeping for offset-paginated search requests: tracks the current
/// page, derives the `from` offset, and enforces an optional page cap.
pub struct PageIterator {
    current_page: usize,
    page_size: usize,
    max_pages: Option<usize>,
}

impl PageIterator {
    pub fn new(page_size: usize, max_pages: Option<usize>) -> Self {
        Self {
            current_page: 0,
            page_size,
            max_pages,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `from` offset for the current page
    pub fn offset(&self) -> usize {
        self.current_page * self.page_size
    }

    pub fn has_reached_max(&self) -> bool {
        self.max_pages.is_some_and(|max| self.current_page >= max)
    }

    pub fn advance(&mut self) {
        self.current_page += 1;
    }
}
