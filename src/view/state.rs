//! Reconciled state of one collection view.

use crate::model::page_count;
use crate::mvi::UiState;

/// Where the items currently on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataOrigin {
    /// Bundled dataset: before the first response, or after a failure.
    #[default]
    Fallback,
    /// The last successful response.
    Remote,
}

/// Everything presentation needs to render a collection.
///
/// Together `items`, `origin` and `error` form a one-slot cache: the data,
/// where it came from, and the last failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    pub limit: u32,
    /// Raw input value, ahead of the debounced query.
    pub search_term: String,
    pub loading: bool,
    pub error: Option<String>,
    pub origin: DataOrigin,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            pages: 0,
            limit: 1,
            search_term: String::new(),
            loading: false,
            error: None,
            origin: DataOrigin::Fallback,
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> UiState for ViewState<T> {}

impl<T> ViewState<T> {
    /// State at mount: fallback data on screen, first fetch pending.
    pub fn mounted(fallback: Vec<T>, limit: u32) -> Self {
        let total = fallback.len() as u64;
        Self {
            items: fallback,
            total,
            page: 1,
            pages: page_count(total, limit),
            limit,
            search_term: String::new(),
            loading: true,
            error: None,
            origin: DataOrigin::Fallback,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.origin == DataOrigin::Remote
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Idle: not loading.
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}
