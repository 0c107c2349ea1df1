//! Reducer for collection view state.

use std::marker::PhantomData;

use crate::model::page_count;
use crate::mvi::Reducer;

use super::intent::CollectionIntent;
use super::state::{DataOrigin, ViewState};

/// The only writer of [`ViewState`].
pub struct CollectionReducer<T>(PhantomData<fn() -> T>);

impl<T: Clone + PartialEq + Send + 'static> Reducer for CollectionReducer<T> {
    type State = ViewState<T>;
    type Intent = CollectionIntent<T>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CollectionIntent::SearchTermChanged { raw } => ViewState {
                search_term: raw,
                ..state
            },

            CollectionIntent::PageChanged { page } => ViewState { page, ..state },

            // Items stay on screen while loading.
            CollectionIntent::FetchStarted => ViewState {
                loading: true,
                ..state
            },

            CollectionIntent::FetchSucceeded {
                result,
                requested_page,
                requested_limit,
            } => {
                let mut items = result.items;
                items.truncate(requested_limit as usize);
                ViewState {
                    items,
                    total: result.total,
                    page: requested_page,
                    pages: page_count(result.total, requested_limit),
                    limit: requested_limit,
                    loading: false,
                    error: None,
                    origin: DataOrigin::Remote,
                    ..state
                }
            }

            CollectionIntent::FetchFailed { message, fallback } => {
                if fallback.is_empty() {
                    // Nothing bundled: keep whatever is on screen.
                    ViewState {
                        loading: false,
                        error: Some(message),
                        ..state
                    }
                } else {
                    let total = fallback.len() as u64;
                    ViewState {
                        items: fallback,
                        total,
                        page: 1,
                        pages: page_count(total, state.limit),
                        loading: false,
                        error: Some(message),
                        origin: DataOrigin::Fallback,
                        ..state
                    }
                }
            }

            CollectionIntent::Unmounted => ViewState {
                loading: false,
                ..state
            },
        }
    }
}
