//! Page navigation control.

use std::fmt;

use super::state::ViewState;

/// One slot in the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Number(u32),
    Ellipsis,
}

impl fmt::Display for PageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSlot::Number(n) => write!(f, "{n}"),
            PageSlot::Ellipsis => f.write_str("..."),
        }
    }
}

/// Navigation derived from a view's `{page, pages, total}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}

/// Strips up to this many pages are shown in full.
const FULL_STRIP_PAGES: u32 = 5;

impl Pagination {
    pub fn new(page: u32, pages: u32, total: u64) -> Self {
        Self { page, pages, total }
    }

    pub fn from_state<T>(state: &ViewState<T>) -> Self {
        Self::new(state.page, state.pages, state.total)
    }

    /// A single page needs no control.
    pub fn is_visible(&self) -> bool {
        self.pages > 1
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn prev(&self) -> Option<u32> {
        self.can_prev().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.page + 1)
    }

    /// First page, a window around the current one, last page, with
    /// ellipses over the gaps.
    pub fn page_numbers(&self) -> Vec<PageSlot> {
        let pages = self.pages;
        if pages <= FULL_STRIP_PAGES {
            return (1..=pages).map(PageSlot::Number).collect();
        }

        let page = self.page;
        let mut slots = vec![PageSlot::Number(1)];
        if page > 3 {
            slots.push(PageSlot::Ellipsis);
        }
        let start = page.saturating_sub(1).max(2);
        let end = (page + 1).min(pages - 1);
        slots.extend((start..=end).map(PageSlot::Number));
        if page + 2 < pages {
            slots.push(PageSlot::Ellipsis);
        }
        slots.push(PageSlot::Number(pages));
        slots
    }
}
