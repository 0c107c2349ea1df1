//! Remote collection view: fallback data, debounced search, cancellable
//! paginated fetches, one reconciled state.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::api::{collection_path, ApiClient, ApiError};
use crate::config::ViewConfig;
use crate::fallback::Fallback;
use crate::model::{Page, Resource};
use crate::mvi::Reducer;

use super::coordinator::{self, FetchCoordinator, FetchTicket};
use super::debounce::{quiet_period, DebounceTicket, Debouncer};
use super::intent::CollectionIntent;
use super::query::QueryParams;
use super::reducer::CollectionReducer;
use super::source::CollectionSource;
use super::state::ViewState;

/// Live, paginated and searchable view over one collection.
///
/// Handles are cheap to clone. All operations return immediately; fetches and
/// debounce timers run as tokio tasks, so the view must be mounted inside a
/// runtime. State changes are published on a watch channel.
///
/// Dropping the last handle unmounts the view.
pub struct RemoteCollectionView<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RemoteCollectionView<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    endpoint: String,
    source: Arc<dyn CollectionSource<T>>,
    fallback: Vec<T>,
    delay: Duration,
    core: Mutex<Core>,
    state_tx: watch::Sender<ViewState<T>>,
}

/// Everything guarded by the view lock besides the published state.
struct Core {
    query: QueryParams,
    coordinator: FetchCoordinator,
    debouncer: Debouncer,
    unmounted: bool,
}

impl<T: Resource + Fallback> RemoteCollectionView<T> {
    /// Mount a view over `/api/{T::COLLECTION}` with the type's bundled
    /// fallback.
    pub fn for_resource(client: ApiClient, config: &ViewConfig) -> Self {
        Self::mount(
            Arc::new(client),
            collection_path(T::COLLECTION),
            config,
            T::fallback(),
        )
    }
}

impl<T> RemoteCollectionView<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Mount a view: publish `fallback` right away and issue the first fetch.
    pub fn mount(
        source: Arc<dyn CollectionSource<T>>,
        endpoint: impl Into<String>,
        config: &ViewConfig,
        fallback: Vec<T>,
    ) -> Self {
        let query = QueryParams::new(config.page_size);
        let (state_tx, _) = watch::channel(ViewState::mounted(fallback.clone(), query.limit()));
        let inner = Arc::new(Inner {
            endpoint: endpoint.into(),
            source,
            fallback,
            delay: config.debounce(),
            core: Mutex::new(Core {
                query,
                coordinator: FetchCoordinator::new(),
                debouncer: Debouncer::new(config.debounce()),
                unmounted: false,
            }),
            state_tx,
        });

        {
            let mut core = inner.core.lock();
            inner.refetch(&mut core);
        }
        Self { inner }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Record raw search input and restart the debounce timer.
    ///
    /// The remote query only sees the term once input has been quiet for
    /// the configured period.
    pub fn set_search_term(&self, raw: impl Into<String>) {
        let raw = raw.into();
        let ticket = {
            let mut core = self.inner.core.lock();
            if core.unmounted {
                return;
            }
            core.query.set_search_term(raw.clone());
            self.inner
                .apply(CollectionIntent::SearchTermChanged { raw: raw.clone() });
            core.debouncer.restart()
        };

        let weak = Arc::downgrade(&self.inner);
        let delay = self.inner.delay;
        tokio::spawn(async move {
            if !quiet_period(ticket.token(), delay).await {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.settle_search(&ticket, &raw);
            }
        });
    }

    /// Apply `raw` to the remote query now, skipping the quiet period (the
    /// search box was submitted).
    pub fn submit_search(&self, raw: impl Into<String>) {
        let raw = raw.into();
        let mut core = self.inner.core.lock();
        if core.unmounted {
            return;
        }
        core.debouncer.cancel();
        core.query.set_search_term(raw.clone());
        self.inner
            .apply(CollectionIntent::SearchTermChanged { raw: raw.clone() });
        if core.query.apply_debounced(raw.trim()) {
            let page = core.query.page();
            self.inner.apply(CollectionIntent::PageChanged { page });
            self.inner.refetch(&mut core);
        }
    }

    /// Go to page `n`. Returns `false` when `n` is out of range or already
    /// current; no fetch is issued then.
    pub fn set_page(&self, n: u32) -> bool {
        let mut core = self.inner.core.lock();
        if core.unmounted {
            return false;
        }
        let pages = self.inner.state_tx.borrow().pages;
        if !core.query.set_page(n, pages) {
            return false;
        }
        self.inner.apply(CollectionIntent::PageChanged { page: n });
        self.inner.refetch(&mut core);
        true
    }

    /// Refetch the current query, e.g. after a remote mutation.
    pub fn reload(&self) {
        let mut core = self.inner.core.lock();
        if core.unmounted {
            return;
        }
        self.inner.refetch(&mut core);
    }

    /// Back to page 1 and refetch, e.g. after a filter change.
    pub fn reset(&self) {
        let mut core = self.inner.core.lock();
        if core.unmounted {
            return;
        }
        core.query.reset_page();
        self.inner.apply(CollectionIntent::PageChanged { page: 1 });
        self.inner.refetch(&mut core);
    }

    /// Cancel pending work; later operations are no-ops.
    pub fn unmount(&self) {
        let mut core = self.inner.core.lock();
        if core.unmounted {
            return;
        }
        core.unmounted = true;
        core.coordinator.cancel();
        core.debouncer.cancel();
        self.inner.apply(CollectionIntent::Unmounted);
        tracing::debug!(endpoint = %self.inner.endpoint, "View unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.core.lock().unmounted
    }

    pub fn snapshot(&self) -> ViewState<T> {
        self.inner.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.inner.state_tx.subscribe()
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_for(&self, predicate: impl FnMut(&ViewState<T>) -> bool) -> ViewState<T> {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(predicate).await {
            Ok(state) => (*state).clone(),
            // The sender lives as long as `self`.
            Err(_) => self.snapshot(),
        };
        state
    }

    /// Wait until no fetch is in flight.
    pub async fn settled(&self) -> ViewState<T> {
        self.wait_for(|state| state.is_settled()).await
    }
}

impl<T> Inner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn apply(&self, intent: CollectionIntent<T>) {
        self.state_tx.send_modify(|state| {
            *state = CollectionReducer::<T>::reduce(std::mem::take(state), intent);
        });
    }

    /// Cancel the in-flight request and issue one for the current query.
    /// Caller holds the core lock.
    fn refetch(self: &Arc<Self>, core: &mut Core) {
        let request = core.query.to_request(&self.endpoint);
        let ticket = core.coordinator.begin(request);
        self.apply(CollectionIntent::FetchStarted);

        let source = Arc::clone(&self.source);
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let result = coordinator::run(source.as_ref(), &ticket).await;
            commit(weak, &ticket, result);
        });
    }

    fn settle_search(self: &Arc<Self>, ticket: &DebounceTicket, term: &str) {
        let mut core = self.core.lock();
        if core.unmounted || !core.debouncer.settle(ticket) {
            return;
        }
        if core.query.apply_debounced(term.trim()) {
            let page = core.query.page();
            self.apply(CollectionIntent::PageChanged { page });
            self.refetch(&mut core);
        }
    }
}

/// Reconcile a finished fetch, unless it was superseded or the view is gone.
fn commit<T>(weak: Weak<Inner<T>>, ticket: &FetchTicket, result: Result<Page<T>, ApiError>)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let request = ticket.request();
    // Held through the commit so no newer request can start in between.
    let mut core = inner.core.lock();
    if !core.coordinator.finish(ticket) {
        tracing::debug!(
            request_id = %request.id,
            endpoint = %request.endpoint,
            page = request.page,
            "Discarding superseded response"
        );
        return;
    }

    match result {
        Ok(page) => inner.apply(CollectionIntent::FetchSucceeded {
            result: page,
            requested_page: request.page,
            requested_limit: request.limit,
        }),
        Err(e) if e.is_cancelled() => {}
        Err(e) => {
            // The bundled list is unpaged; keep the query on the page it shows.
            if !inner.fallback.is_empty() {
                core.query.reset_page();
            }
            tracing::warn!(
                request_id = %request.id,
                endpoint = %request.endpoint,
                page = request.page,
                error_type = e.error_type(),
                error = %e,
                "Fetch failed, showing fallback"
            );
            inner.apply(CollectionIntent::FetchFailed {
                message: e.user_message(),
                fallback: inner.fallback.clone(),
            });
        }
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        let core = self.core.get_mut();
        core.coordinator.cancel();
        core.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::api::FetchRequest;
    use crate::view::state::DataOrigin;

    /// Answers every page after a per-page delay.
    #[derive(Default)]
    struct Scripted {
        calls: Mutex<Vec<FetchRequest>>,
        completed: AtomicUsize,
        failing: AtomicBool,
        slow_page: Option<u32>,
    }

    impl Scripted {
        fn slow(page: u32) -> Self {
            Self {
                slow_page: Some(page),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<FetchRequest> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl CollectionSource<String> for Scripted {
        async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<String>, ApiError> {
            self.calls.lock().push(request.clone());
            let delay = if self.slow_page == Some(request.page) {
                500
            } else {
                10
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ApiError::Server {
                    status: 503,
                    detail: "Service unavailable".to_string(),
                });
            }
            let search = request.search.as_deref().unwrap_or("");
            let item = format!("p{}:{}", request.page, search);
            Ok(Page::new(vec![item], 60, request.page, request.limit))
        }
    }

    fn config() -> ViewConfig {
        ViewConfig {
            page_size: 20,
            debounce_ms: 300,
        }
    }

    fn mount(source: &Arc<Scripted>, fallback: Vec<String>) -> RemoteCollectionView<String> {
        let dyn_source: Arc<dyn CollectionSource<String>> = source.clone();
        RemoteCollectionView::mount(dyn_source, "/api/things", &config(), fallback)
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_the_full_quiet_period() {
        let source = Arc::new(Scripted::default());
        let view = mount(&source, Vec::new());
        view.settled().await;

        view.set_search_term("a");
        tokio::time::sleep(Duration::from_millis(200)).await;
        view.set_search_term("ab");
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(source.calls().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].search.as_deref(), Some("ab"));
        assert_eq!(calls[1].page, 1);

        let state = view.settled().await;
        assert_eq!(state.items, vec!["p1:ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_only_change_does_not_refetch() {
        let source = Arc::new(Scripted::default());
        let view = mount(&source, Vec::new());
        view.settled().await;

        view.set_search_term("mcp");
        tokio::time::sleep(Duration::from_millis(400)).await;
        view.set_search_term("mcp ");
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(source.calls().len(), 2);
        assert_eq!(view.snapshot().search_term, "mcp ");
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_page_never_wins() {
        let source = Arc::new(Scripted::slow(1));
        let view = mount(&source, Vec::new());
        assert_eq!(view.settled().await.pages, 3);

        view.reload();
        tokio::task::yield_now().await;
        assert!(view.set_page(3));

        let state = view.settled().await;
        assert_eq!(state.items, vec!["p3:".to_string()]);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = view.snapshot();
        assert_eq!(state.page, 3);
        assert_eq!(state.items, vec!["p3:".to_string()]);
        // The superseded page-1 request was dropped before it finished.
        assert_eq!(source.completed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_without_fallback_keeps_last_items() {
        let source = Arc::new(Scripted::default());
        let view = mount(&source, Vec::new());
        assert_eq!(view.settled().await.items, vec!["p1:".to_string()]);

        source.failing.store(true, Ordering::SeqCst);
        view.reload();
        let state = view.settled().await;
        assert_eq!(state.items, vec!["p1:".to_string()]);
        assert_eq!(state.error.as_deref(), Some("Service unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_restores_fallback() {
        let source = Arc::new(Scripted::default());
        source.failing.store(true, Ordering::SeqCst);
        let view = mount(&source, vec!["local".to_string()]);

        let state = view.settled().await;
        assert_eq!(state.items, vec!["local".to_string()]);
        assert_eq!(state.origin, DataOrigin::Fallback);
        assert_eq!(state.total, 1);
        assert!(state.has_error());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_on_later_page_shows_fallback_from_page_one() {
        let source = Arc::new(Scripted::default());
        let view = mount(&source, vec!["local".to_string()]);
        view.settled().await;
        assert!(view.set_page(3));
        assert_eq!(view.settled().await.page, 3);

        source.failing.store(true, Ordering::SeqCst);
        view.reload();
        let state = view.settled().await;
        assert_eq!(state.items, vec!["local".to_string()]);
        assert_eq!(state.page, 1);
        assert_eq!(state.pages, 1);

        // The query followed the view back, so recovery starts at page 1.
        source.failing.store(false, Ordering::SeqCst);
        view.reload();
        let state = view.settled().await;
        assert_eq!(state.items, vec!["p1:".to_string()]);
        assert!(view.set_page(2));
        assert_eq!(view.settled().await.items, vec!["p2:".to_string()]);
        assert_eq!(source.calls().last().map(|r| r.page), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_settles_an_in_flight_fetch() {
        let source = Arc::new(Scripted::slow(1));
        let view = mount(&source, Vec::new());
        tokio::task::yield_now().await;
        assert!(view.snapshot().loading);

        view.unmount();
        let state = view.settled().await;
        assert!(!state.loading);
        assert!(state.items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_view_cancels_its_fetch() {
        let source = Arc::new(Scripted::slow(1));
        let view = mount(&source, Vec::new());
        tokio::task::yield_now().await;
        assert_eq!(source.calls().len(), 1);

        drop(view);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_returns_to_first_page() {
        let source = Arc::new(Scripted::default());
        let view = mount(&source, Vec::new());
        view.settled().await;
        assert!(view.set_page(2));
        assert_eq!(view.settled().await.page, 2);

        view.reset();
        assert_eq!(view.snapshot().page, 1);
        let state = view.settled().await;
        assert_eq!(state.items, vec!["p1:".to_string()]);
        assert_eq!(source.calls().last().map(|r| r.page), Some(1));
    }
}
