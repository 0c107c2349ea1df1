//! Remote collection views and the state they hand to presentation.
//!
//! A [`RemoteCollectionView`] is mounted once per content type. It renders
//! the bundled fallback immediately, debounces search input, keeps at most
//! one request in flight, and degrades back to the fallback when a fetch
//! fails.

mod collection;
mod coordinator;
mod debounce;
mod form;
mod intent;
mod pagination;
mod query;
mod reducer;
mod source;
mod state;

pub use collection::RemoteCollectionView;
pub use coordinator::{run, FetchCoordinator, FetchTicket};
pub use debounce::{quiet_period, DebounceTicket, Debouncer};
pub use form::{Form, FormError, FormIntent, FormReducer, FormState};
pub use intent::CollectionIntent;
pub use pagination::{PageSlot, Pagination};
pub use query::QueryParams;
pub use reducer::CollectionReducer;
pub use source::CollectionSource;
pub use state::{DataOrigin, ViewState};
