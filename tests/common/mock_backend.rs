//! Scripted HTTP server for testing the API client and collection views.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Response, StatusCode, Uri};
use axum::routing::any;
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// Path plus query string, as the server saw it.
    pub fn uri(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::page(&[], 0, 1, 20)
    }
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.as_bytes().to_vec(),
            delay_ms: 0,
        }
    }

    /// A paginated list body.
    pub fn page(items: &[serde_json::Value], total: u64, page: u32, limit: u32) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        let body = serde_json::json!({
            "items": items,
            "total": total,
            "page": page,
            "limit": limit,
            "pages": pages,
        });
        Self::json(&body.to_string())
    }

    /// Error body in the API's `{"detail": ...}` shape.
    pub fn detail_error(status: u16, detail: &str) -> Self {
        let body = serde_json::json!({ "detail": detail });
        Self {
            status,
            ..Self::json(&body.to_string())
        }
    }

    /// Non-JSON body, e.g. a proxy's HTML error page.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: body.as_bytes().to_vec(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Default)]
struct Script {
    log: Mutex<Vec<CapturedRequest>>,
    queue: Mutex<VecDeque<MockResponse>>,
}

/// Mock API server answering every path from a response queue.
///
/// Requests without a queued response get an empty page.
pub struct MockBackend {
    base_url: String,
    script: Arc<Script>,
    arrived: watch::Receiver<usize>,
    stop: CancellationToken,
}

impl MockBackend {
    pub async fn start() -> Self {
        let script = Arc::new(Script::default());
        let (arrived_tx, arrived) = watch::channel(0usize);
        let stop = CancellationToken::new();

        let app = Router::new()
            .route("/{*path}", any(answer))
            .with_state((script.clone(), Arc::new(arrived_tx)));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let shutdown = stop.clone().cancelled_owned();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await;
        });

        Self {
            base_url,
            script,
            arrived,
            stop,
        }
    }

    /// Queue the response for the next unanswered request.
    pub async fn enqueue_response(&self, resp: MockResponse) {
        self.script.queue.lock().push_back(resp);
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.script.log.lock().clone()
    }

    /// Path and query of every captured request, in arrival order.
    pub async fn captured_uris(&self) -> Vec<String> {
        self.script.log.lock().iter().map(CapturedRequest::uri).collect()
    }

    /// Wait until at least `n` requests arrived. `false` on timeout.
    pub async fn wait_for_requests(&self, n: usize, timeout: Duration) -> bool {
        let mut arrived = self.arrived.clone();
        tokio::time::timeout(timeout, arrived.wait_for(|count| *count >= n))
            .await
            .is_ok_and(|seen| seen.is_ok())
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

type Shared = (Arc<Script>, Arc<watch::Sender<usize>>);

async fn answer(
    State((script, arrived)): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Body> {
    let captured = CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };
    let reply = {
        let mut log = script.log.lock();
        log.push(captured);
        arrived.send_replace(log.len());
        script.queue.lock().pop_front().unwrap_or_default()
    };

    if reply.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(reply.delay_ms)).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Response::builder().status(status);
    for (name, value) in reply.headers {
        response = response.header(name, value);
    }
    response.body(Body::from(reply.body)).unwrap()
}
