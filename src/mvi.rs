//! Unidirectional state flow shared by collection views and forms.
//!
//! A view never edits its published state in place. User input and fetch
//! outcomes become intents, and a reducer folds each intent into the next
//! state:
//!
//! ```text
//! set_page / fetch resolved ──→ Intent ──→ Reducer::reduce ──→ State ──→ watch
//! ```

/// Something that happened: user input or the outcome of a fetch.
pub trait Intent: Send + 'static {}

/// Snapshot handed to presentation.
///
/// `PartialEq` lets subscribers skip redundant renders; `Default` is the
/// state before anything has been mounted.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}

/// Pure transition function from one state to the next.
pub trait Reducer {
    type State: UiState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;

    /// Apply `intents` in order.
    fn reduce_all(
        state: Self::State,
        intents: impl IntoIterator<Item = Self::Intent>,
    ) -> Self::State {
        intents.into_iter().fold(state, Self::reduce)
    }
}
