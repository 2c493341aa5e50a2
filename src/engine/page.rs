use serde::{Deserialize, Serialize};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Page sizes offered by the interactive browser.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Current page (1-based) and page size. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    rows_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(1, DEFAULT_ROWS_PER_PAGE)
    }
}

impl PageState {
    pub fn new(current_page: usize, rows_per_page: usize) -> Self {
        Self {
            current_page: current_page.max(1),
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub(crate) fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub(crate) fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
    }

    /// Pull the current page back into `[1, total_pages]`. With no pages the
    /// current page stays at 1.
    pub(crate) fn clamp(&mut self, total: usize) {
        let pages = total_pages(total, self.rows_per_page);
        self.current_page = self.current_page.clamp(1, pages.max(1));
    }
}

pub fn total_pages(total: usize, rows_per_page: usize) -> usize {
    if total == 0 {
        0
    } else {
        total.div_ceil(rows_per_page.max(1))
    }
}

/// Which state changes send the view back to page 1. Changes that do not
/// reset still clamp the current page into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePolicy {
    #[serde(default = "yes")]
    pub reset_on_filter: bool,
    #[serde(default = "yes")]
    pub reset_on_sort: bool,
    #[serde(default)]
    pub reset_on_rows_per_page: bool,
}

fn yes() -> bool {
    true
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            reset_on_filter: true,
            reset_on_sort: true,
            reset_on_rows_per_page: false,
        }
    }
}

impl PagePolicy {
    pub fn clamp_only() -> Self {
        Self {
            reset_on_filter: false,
            reset_on_sort: false,
            reset_on_rows_per_page: false,
        }
    }
}

/// One slice of an ordered result set plus the metadata a pager needs.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub rows_per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Slice `records[(page-1)*rows .. page*rows]`. A page past the end is empty.
pub fn paginate<'a, T>(records: &'a [T], state: &PageState) -> Page<'a, T> {
    let total = records.len();
    let rows = state.rows_per_page();
    let pages = total_pages(total, rows);
    let page = state.current_page();

    let start = (page - 1).saturating_mul(rows).min(total);
    let end = start.saturating_add(rows).min(total);

    Page {
        items: &records[start..end],
        current_page: page,
        rows_per_page: rows,
        total,
        total_pages: pages,
        has_next: page < pages,
        has_prev: page > 1,
    }
}
