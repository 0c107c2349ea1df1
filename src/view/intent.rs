//! Intents for a collection view.

use crate::model::Page;
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CollectionIntent<T> {
    /// Raw search input changed (display only).
    SearchTermChanged { raw: String },

    /// The query moved to another page (user click or search reset).
    PageChanged { page: u32 },

    /// A request for the current query was issued.
    FetchStarted,

    /// The latest request resolved.
    FetchSucceeded {
        result: Page<T>,
        /// Page the request asked for; wins over the page the server echoes.
        requested_page: u32,
        requested_limit: u32,
    },

    /// The latest request failed with something other than cancellation.
    FetchFailed {
        message: String,
        /// Bundled dataset to show instead.
        fallback: Vec<T>,
    },

    /// The view was unmounted; any in-flight request is abandoned.
    Unmounted,
}

impl<T: Send + 'static> Intent for CollectionIntent<T> {}
