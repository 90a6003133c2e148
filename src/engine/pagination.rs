/// Page/limit state machine.
///
/// A page-size change always snaps back to page 1, even if the event also
/// requested a different page index (the paginator fires both together when
/// the size selector changes). A plain index change maps the zero-based
/// paginator index to the one-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    limit: u32,
}

impl Pager {
    pub fn new(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Back to page 1, keeping the page size.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Apply a paginator event (zero-based `page_index`).
    pub fn apply(&mut self, page_index: u32, page_size: u32) {
        if page_size != self.limit {
            self.limit = page_size;
            self.page = 1;
        } else {
            self.page = page_index + 1;
        }
    }
}
