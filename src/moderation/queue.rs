//! Moderation queue: a collection view over pending submissions plus the
//! approve/reject transitions.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::ViewConfig;
use crate::model::{
    ContentStatus, ModerationItem, ModerationKind, ModerationStatus, ProposalStatus,
};
use crate::view::{RemoteCollectionView, ViewState};

use super::filter::{ModerationFilter, StatusFilter, TypeFilter};
use super::source::{ModerationSource, PendingCounts};

/// Label of the merged queue in logs; each fetch picks its real endpoints.
const QUEUE_ENDPOINT: &str = "/api/moderation";

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("{kind} {id} is {status}; only pending items can be moderated")]
    InvalidTransition {
        kind: &'static str,
        id: i64,
        status: &'static str,
    },

    #[error("No pending {kind} with id {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Moderation request failed: {0}")]
    Api(#[from] ApiError),
}

impl ModerationError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ModerationError::InvalidTransition { .. } => "invalid_transition",
            ModerationError::NotFound { .. } => "not_found",
            ModerationError::Api(e) => e.error_type(),
        }
    }
}

/// A moderator's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Terminal status this verdict moves a `kind` item to.
    pub fn target(&self, kind: ModerationKind) -> ModerationStatus {
        match (self, kind) {
            (Decision::Approve, ModerationKind::Proposal) => {
                ModerationStatus::Proposal(ProposalStatus::Approved)
            }
            (Decision::Approve, _) => ModerationStatus::Content(ContentStatus::Published),
            (Decision::Reject, ModerationKind::Proposal) => {
                ModerationStatus::Proposal(ProposalStatus::Rejected)
            }
            (Decision::Reject, _) => ModerationStatus::Content(ContentStatus::Rejected),
        }
    }
}

/// Check that `item` may move to `decision`'s target. No I/O.
pub fn check_transition(
    item: &ModerationItem,
    decision: Decision,
) -> Result<ModerationStatus, ModerationError> {
    let target = decision.target(item.kind);
    let allowed = match (item.status, target) {
        (ModerationStatus::Content(from), ModerationStatus::Content(to)) => {
            from.can_transition_to(to)
        }
        (ModerationStatus::Proposal(from), ModerationStatus::Proposal(to)) => {
            from.can_transition_to(to)
        }
        // "pending"/"rejected" on a proposal deserialize as content statuses.
        (ModerationStatus::Content(from), ModerationStatus::Proposal(_)) => {
            from == ContentStatus::Pending
        }
        (ModerationStatus::Proposal(_), ModerationStatus::Content(_)) => false,
    };
    if !allowed {
        return Err(ModerationError::InvalidTransition {
            kind: item.kind.as_str(),
            id: item.id,
            status: item.status.as_str(),
        });
    }
    Ok(target)
}

/// The moderation screen: filters, the queue view, and transitions.
pub struct ModerationQueue {
    source: ModerationSource,
    filter: Arc<RwLock<ModerationFilter>>,
    view: RemoteCollectionView<ModerationItem>,
}

impl ModerationQueue {
    /// Mount with the default filters (all types, pending).
    pub fn mount(client: ApiClient, config: &ViewConfig) -> Self {
        Self::mount_with(client, config, ModerationFilter::default())
    }

    pub fn mount_with(client: ApiClient, config: &ViewConfig, filter: ModerationFilter) -> Self {
        let filter = Arc::new(RwLock::new(filter));
        let source = ModerationSource::new(client, Arc::clone(&filter));
        let view = RemoteCollectionView::mount(
            Arc::new(source.clone()),
            QUEUE_ENDPOINT,
            config,
            Vec::new(),
        );
        Self {
            source,
            filter,
            view,
        }
    }

    pub fn view(&self) -> &RemoteCollectionView<ModerationItem> {
        &self.view
    }

    pub fn snapshot(&self) -> ViewState<ModerationItem> {
        self.view.snapshot()
    }

    pub fn filter(&self) -> ModerationFilter {
        *self.filter.read()
    }

    /// Switch sources; back to page 1 and refetch when it changed.
    pub fn set_type_filter(&self, kind: TypeFilter) {
        if self.update_filter(|filter| filter.kind = kind) {
            self.view.reset();
        }
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        if self.update_filter(|filter| filter.status = status) {
            self.view.reset();
        }
    }

    pub fn set_search_term(&self, raw: impl Into<String>) {
        self.view.set_search_term(raw);
    }

    pub fn set_page(&self, n: u32) -> bool {
        self.view.set_page(n)
    }

    pub async fn approve(&self, item: &ModerationItem) -> Result<(), ModerationError> {
        self.transition(item, Decision::Approve).await
    }

    pub async fn reject(&self, item: &ModerationItem) -> Result<(), ModerationError> {
        self.transition(item, Decision::Reject).await
    }

    /// Apply `decision` to `item`, then refetch the whole queue.
    ///
    /// On failure the queue is left as is.
    pub async fn transition(
        &self,
        item: &ModerationItem,
        decision: Decision,
    ) -> Result<(), ModerationError> {
        let target = check_transition(item, decision)?;
        let client = self.source.client();
        if let Err(e) = client.update_status(item.kind, item.id, target.as_str()).await {
            tracing::warn!(
                kind = item.kind.as_str(),
                id = item.id,
                status = target.as_str(),
                error_type = e.error_type(),
                error = %e,
                "Moderation transition failed"
            );
            return Err(e.into());
        }
        tracing::info!(
            kind = item.kind.as_str(),
            id = item.id,
            status = target.as_str(),
            "Moderation transition applied"
        );
        self.view.reload();
        Ok(())
    }

    /// Apply `decision` to the pending `kind` item with `id`.
    pub async fn decide_by_id(
        &self,
        kind: ModerationKind,
        id: i64,
        decision: Decision,
    ) -> Result<ModerationItem, ModerationError> {
        let item = self
            .source
            .find_pending(kind, id)
            .await?
            .ok_or(ModerationError::NotFound {
                kind: kind.as_str(),
                id,
            })?;
        self.transition(&item, decision).await?;
        Ok(item)
    }

    pub async fn pending_counts(&self) -> Result<PendingCounts, ModerationError> {
        Ok(self.source.pending_counts().await?)
    }

    pub fn unmount(&self) {
        self.view.unmount();
    }

    fn update_filter(&self, change: impl FnOnce(&mut ModerationFilter)) -> bool {
        let mut filter = self.filter.write();
        let before = *filter;
        change(&mut filter);
        *filter != before
    }
}
