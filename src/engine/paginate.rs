//! Pagination engine: 1-based page windows over an in-memory list.

/// Page sizes the UI cycles through with `[` / `]`.
pub const PAGE_SIZES: &[usize] = &[10, 25, 50, 100];

/// Resolved page window. `start..end` is a half-open slice into the
/// filtered/sorted list, always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    pub start: usize,
    pub end: usize,
    pub page: usize,
    pub total_pages: usize,
}

/// Pagination state for one tab.
///
/// `page` is 1-based and self-correcting: whenever the underlying list
/// length or the page size changes, [`Paginator::view`] clamps it back
/// into `[1, total_pages]` (1 for an empty list) before slicing. None
/// of the operations can fail or panic.
#[derive(Debug, Clone)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`; 0 for an empty list.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Re-establishes the page invariant for the given list length.
    pub fn clamp(&mut self, len: usize) {
        let total = self.total_pages(len);
        if total == 0 {
            self.page = 1;
        } else if self.page > total {
            self.page = total;
        } else if self.page == 0 {
            self.page = 1;
        }
    }

    /// Clamps, then returns the visible window for a list of `len` rows.
    pub fn view(&mut self, len: usize) -> PageView {
        self.clamp(len);
        let total_pages = self.total_pages(len);
        let start = (self.page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        PageView {
            start,
            end,
            page: self.page,
            total_pages,
        }
    }

    /// Advances one page; no-op on the last page.
    pub fn next_page(&mut self, len: usize) {
        if self.page < self.total_pages(len) {
            self.page += 1;
        }
    }

    /// Goes back one page; no-op on the first page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn first(&mut self) {
        self.page = 1;
    }

    pub fn last(&mut self, len: usize) {
        self.page = self.total_pages(len).max(1);
    }

    /// Changes the page size; the page index may be temporarily out of
    /// range until the next `view`/`clamp` restabilizes it.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
    }

    /// Next larger size from [`PAGE_SIZES`]; no-op at the top.
    pub fn grow_page_size(&mut self) {
        if let Some(pos) = PAGE_SIZES.iter().position(|&s| s >= self.page_size) {
            self.page_size = PAGE_SIZES[(pos + 1).min(PAGE_SIZES.len() - 1)];
        }
    }

    /// Next smaller size from [`PAGE_SIZES`]; no-op at the bottom.
    pub fn shrink_page_size(&mut self) {
        if let Some(pos) = PAGE_SIZES.iter().rposition(|&s| s <= self.page_size) {
            self.page_size = PAGE_SIZES[pos.saturating_sub(1)];
        }
    }
}
