//! At most one live fetch per view.

use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, FetchRequest};
use crate::model::Page;

use super::source::CollectionSource;

/// One issued request and the handle that cancels it.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    token: CancellationToken,
    request: FetchRequest,
}

impl FetchTicket {
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Issues fetch tickets and decides which response may commit.
///
/// A response may commit only while its ticket is current: same generation
/// and not cancelled. The owner checks that under the lock that guards
/// [`begin`](Self::begin).
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    generation: u64,
    current: Option<CancellationToken>,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight request and issue `request` in its place.
    pub fn begin(&mut self, request: FetchRequest) -> FetchTicket {
        if let Some(previous) = self.current.take() {
            tracing::debug!(
                generation = self.generation,
                "Superseding in-flight request"
            );
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        FetchTicket {
            generation: self.generation,
            token,
            request,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && !ticket.token.is_cancelled()
    }

    /// Retire `ticket`. Returns `false` if it was superseded or cancelled,
    /// in which case its result must be dropped.
    pub fn finish(&mut self, ticket: &FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.current = None;
        true
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Fetch `ticket`'s request, racing it against cancellation.
///
/// On cancellation the source future is dropped, which aborts the HTTP
/// request, and `ApiError::Cancelled` is returned.
pub async fn run<T>(
    source: &dyn CollectionSource<T>,
    ticket: &FetchTicket,
) -> Result<Page<T>, ApiError> {
    tokio::select! {
        biased;
        _ = ticket.token.cancelled() => Err(ApiError::Cancelled),
        result = source.fetch_page(&ticket.request) => result,
    }
}
