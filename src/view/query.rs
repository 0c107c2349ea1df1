//! Query parameters owned by one collection view.

use crate::api::FetchRequest;

/// Page, page size and search term of a collection view.
///
/// `search_term` is what the input shows; `debounced_search` is what the
/// remote query uses. Pure state: timers live in [`super::Debouncer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    page: u32,
    limit: u32,
    search_term: String,
    debounced_search: String,
}

impl QueryParams {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search_term: String::new(),
            debounced_search: String::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn debounced_search(&self) -> &str {
        &self.debounced_search
    }

    /// Record the raw input. Does not touch the remote query.
    pub fn set_search_term(&mut self, raw: impl Into<String>) {
        self.search_term = raw.into();
    }

    /// Promote a settled term to the remote query.
    ///
    /// Returns `true` when the debounced term changed; a change always sends
    /// the view back to page 1.
    pub fn apply_debounced(&mut self, term: &str) -> bool {
        if self.debounced_search == term {
            return false;
        }
        self.debounced_search = term.to_string();
        self.page = 1;
        true
    }

    /// Move to page `n` if it lies within `1..=max(1, pages)`.
    ///
    /// Returns `false` (and changes nothing) when `n` is out of range or
    /// already current.
    pub fn set_page(&mut self, n: u32, pages: u32) -> bool {
        if n < 1 || n > pages.max(1) || n == self.page {
            return false;
        }
        self.page = n;
        true
    }

    /// Back to page 1, e.g. after a filter change.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn to_request(&self, endpoint: &str) -> FetchRequest {
        FetchRequest::new(endpoint, self.page, self.limit, &self.debounced_search)
    }
}
