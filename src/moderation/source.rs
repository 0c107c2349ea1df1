//! Moderation queue source: one or all three moderated collections.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{collection_path, ApiClient, ApiError, FetchRequest};
use crate::model::{Guide, ModerationItem, ModerationKind, Page, Prompt, Proposal};
use crate::view::CollectionSource;

use super::filter::{ModerationFilter, StatusFilter};

/// Page size used per source when merging all three.
pub const MERGE_LIMIT: u32 = 100;

/// Pending items per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingCounts {
    pub prompts: u64,
    pub guides: u64,
    pub proposals: u64,
}

impl PendingCounts {
    pub fn total(&self) -> u64 {
        self.prompts + self.guides + self.proposals
    }
}

/// List endpoint feeding the queue for `kind`.
pub fn moderation_endpoint(kind: ModerationKind) -> String {
    match kind {
        ModerationKind::Prompt | ModerationKind::Guide => {
            format!("{}/moderation/pending", collection_path(kind.collection()))
        }
        ModerationKind::Proposal => collection_path(kind.collection()),
    }
}

/// Reads the filters at fetch time, so a filter change followed by a view
/// reset always fetches with the new filters.
#[derive(Clone)]
pub struct ModerationSource {
    client: ApiClient,
    filter: Arc<RwLock<ModerationFilter>>,
}

impl ModerationSource {
    pub fn new(client: ApiClient, filter: Arc<RwLock<ModerationFilter>>) -> Self {
        Self { client, filter }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// One page of a single source under `status`.
    pub async fn fetch_kind(
        &self,
        kind: ModerationKind,
        status: StatusFilter,
        request: &FetchRequest,
    ) -> Result<Page<ModerationItem>, ApiError> {
        let mut request = request.retarget(moderation_endpoint(kind), request.page, request.limit);
        if let Some(value) = status.query_value(kind) {
            request = request.with_filter("status", value);
        }

        match kind {
            ModerationKind::Prompt => Ok(self
                .client
                .list_page::<Prompt>(&request)
                .await?
                .map(ModerationItem::from)),
            ModerationKind::Guide => Ok(self
                .client
                .list_page::<Guide>(&request)
                .await?
                .map(ModerationItem::from)),
            ModerationKind::Proposal => Ok(self
                .client
                .list_page::<Proposal>(&request)
                .await?
                .map(ModerationItem::from)),
        }
    }

    /// Page 1 of every source, merged newest first, then windowed to the
    /// requested page.
    async fn fetch_merged(
        &self,
        status: StatusFilter,
        request: &FetchRequest,
    ) -> Result<Page<ModerationItem>, ApiError> {
        let first = request.retarget(request.endpoint.clone(), 1, MERGE_LIMIT);
        let (prompts, guides, proposals) = tokio::try_join!(
            self.fetch_kind(ModerationKind::Prompt, status, &first),
            self.fetch_kind(ModerationKind::Guide, status, &first),
            self.fetch_kind(ModerationKind::Proposal, status, &first),
        )?;

        let mut items: Vec<ModerationItem> = prompts
            .items
            .into_iter()
            .chain(guides.items)
            .chain(proposals.items)
            .collect();
        sort_newest_first(&mut items);

        let total = items.len() as u64;
        let limit = request.limit.max(1);
        let start = (request.page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let window = items.into_iter().skip(start).take(limit as usize).collect();
        Ok(Page::new(window, total, request.page, limit))
    }

    /// Read each source's pending `total` with a one-item page.
    pub async fn pending_counts(&self) -> Result<PendingCounts, ApiError> {
        let probe = FetchRequest::new("", 1, 1, "");
        let pending = StatusFilter::Pending;
        let (prompts, guides, proposals) = tokio::try_join!(
            self.fetch_kind(ModerationKind::Prompt, pending, &probe),
            self.fetch_kind(ModerationKind::Guide, pending, &probe),
            self.fetch_kind(ModerationKind::Proposal, pending, &probe),
        )?;
        Ok(PendingCounts {
            prompts: prompts.total,
            guides: guides.total,
            proposals: proposals.total,
        })
    }

    /// Look up a pending item by id within the first [`MERGE_LIMIT`]
    /// pending entries of its source.
    pub async fn find_pending(
        &self,
        kind: ModerationKind,
        id: i64,
    ) -> Result<Option<ModerationItem>, ApiError> {
        let request = FetchRequest::new("", 1, MERGE_LIMIT, "");
        let page = self.fetch_kind(kind, StatusFilter::Pending, &request).await?;
        Ok(page.items.into_iter().find(|item| item.id == id))
    }
}

#[async_trait]
impl CollectionSource<ModerationItem> for ModerationSource {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<ModerationItem>, ApiError> {
        let filter = *self.filter.read();
        match filter.kind.kind() {
            Some(kind) => self.fetch_kind(kind, filter.status, request).await,
            None => self.fetch_merged(filter.status, request).await,
        }
    }
}

/// ISO 8601 timestamps in one zone order lexicographically. Items without a
/// timestamp go last.
pub fn sort_newest_first(items: &mut [ModerationItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
