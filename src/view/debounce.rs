//! Trailing-edge debounce built on cancellation tokens.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Handle to one quiet period.
#[derive(Debug, Clone)]
pub struct DebounceTicket {
    generation: u64,
    token: CancellationToken,
}

impl DebounceTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Tracks the pending quiet period of one input.
///
/// Every [`restart`](Self::restart) cancels the previous ticket, so at most
/// one quiet period is ever live. The caller waits with [`quiet_period`]
/// and then confirms the ticket with [`settle`](Self::settle) under the same
/// lock that guards `restart`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel the running quiet period (if any) and start a new one.
    pub fn restart(&mut self) -> DebounceTicket {
        self.cancel();
        self.generation += 1;
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        DebounceTicket {
            generation: self.generation,
            token,
        }
    }

    /// Cancel without starting a new period.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Finish `ticket`'s period.
    ///
    /// Returns `true` only for the live ticket; a superseded or cancelled
    /// ticket must not apply its value.
    pub fn settle(&mut self, ticket: &DebounceTicket) -> bool {
        if ticket.generation != self.generation || ticket.token.is_cancelled() {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Wait out `delay` unless `token` is cancelled first.
///
/// Returns `true` when the full period elapsed.
pub async fn quiet_period(token: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
