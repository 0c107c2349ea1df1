//! In-memory RIG API for workflow tests.
//!
//! Keeps every collection as JSON objects and implements just enough of the
//! REST surface (list with page/limit/search/status, item CRUD, moderation
//! status transitions, login) to drive the client end to end.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const ADMIN_EMAIL: &str = "admin@rig.ai";
pub const ADMIN_PASSWORD: &str = "correct horse";
pub const ADMIN_TOKEN: &str = "admin-token";

type Params = Query<HashMap<String, String>>;

#[derive(Default)]
struct Db {
    collections: HashMap<String, Vec<Value>>,
    next_id: i64,
    log: Vec<String>,
    fail_status_updates: bool,
}

#[derive(Clone)]
struct FakeState {
    db: Arc<Mutex<Db>>,
}

pub struct FakeRig {
    pub addr: SocketAddr,
    state: FakeState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl FakeRig {
    pub async fn start() -> Self {
        let state = FakeState {
            db: Arc::new(Mutex::new(Db {
                next_id: 1000,
                ..Db::default()
            })),
        };

        let app = Router::new()
            .route("/api/health", get(health))
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/{collection}", get(list).post(create))
            .route("/api/{collection}/moderation/pending", get(moderation_list))
            .route(
                "/api/{collection}/{id}",
                get(get_item).patch(update_item).delete(delete_item),
            )
            .route("/api/{collection}/{id}/status", patch(update_status))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake RIG server");
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn insert(&self, collection: &str, item: Value) {
        let mut db = self.state.db.lock().await;
        db.collections
            .entry(collection.to_string())
            .or_default()
            .push(item);
    }

    pub async fn items(&self, collection: &str) -> Vec<Value> {
        let db = self.state.db.lock().await;
        db.collections.get(collection).cloned().unwrap_or_default()
    }

    pub async fn find(&self, collection: &str, id: i64) -> Option<Value> {
        self.items(collection)
            .await
            .into_iter()
            .find(|item| item["id"].as_i64() == Some(id))
    }

    /// `"METHOD /path?query"` for every request served so far.
    pub async fn log(&self) -> Vec<String> {
        self.state.db.lock().await.log.clone()
    }

    pub async fn clear_log(&self) {
        self.state.db.lock().await.log.clear();
    }

    /// Make every status transition answer 500.
    pub async fn fail_status_updates(&self, fail: bool) {
        self.state.db.lock().await.fail_status_updates = fail;
    }
}

impl Drop for FakeRig {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// -- Fixtures -----------------------------------------------------------------

pub fn prompt(id: i64, title: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "desc": format!("{title} description"),
        "author_name": "tester",
        "copies": "0",
        "tags": ["test"],
        "tech": "Claude",
        "content": "prompt body",
        "status": status,
        "created_at": created_at,
    })
}

pub fn guide(id: i64, title: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "desc": format!("{title} description"),
        "author_name": "tester",
        "category": "MCP",
        "time": "5 min",
        "views": "0",
        "date": "2025-01-01",
        "content": "guide body",
        "status": status,
        "created_at": created_at,
    })
}

pub fn proposal(id: i64, title: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "type": "prompt",
        "title": title,
        "description": "proposal description",
        "content": "proposal body",
        "email": "author@example.com",
        "tags": ["idea"],
        "status": status,
        "created_at": created_at,
    })
}

pub fn user(id: i64, name: &str, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": name,
        "role": role,
        "is_active": true,
        "requires_approval": false,
        "created_at": "2025-01-01T00:00:00",
    })
}

// -- Handlers -----------------------------------------------------------------

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn is_admin(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {ADMIN_TOKEN}"))
        .unwrap_or(false)
}

fn record(db: &mut Db, method: &str, path: &str, params: &HashMap<String, String>) {
    let mut keys: Vec<_> = params.iter().collect();
    keys.sort();
    let query: Vec<String> = keys.iter().map(|(k, v)| format!("{k}={v}")).collect();
    if query.is_empty() {
        db.log.push(format!("{method} {path}"));
    } else {
        db.log.push(format!("{method} {path}?{}", query.join("&")));
    }
}

fn paginate(items: Vec<Value>, params: &HashMap<String, String>) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20);
    let total = items.len();
    let start = (page.max(1) - 1) * limit;
    let window: Vec<Value> = items.into_iter().skip(start).take(limit).collect();
    json!({
        "items": window,
        "total": total,
        "page": page,
        "limit": limit,
        "pages": if limit == 0 { 0 } else { total.div_ceil(limit) },
    })
}

fn filtered(
    items: &[Value],
    params: &HashMap<String, String>,
    default_status: Option<&str>,
) -> Vec<Value> {
    let status = params
        .get("status")
        .map(String::as_str)
        .or(default_status)
        .filter(|s| *s != "all");
    let search = params.get("search").map(|s| s.to_lowercase());

    let mut matched: Vec<Value> = items
        .iter()
        .filter(|item| status.is_none_or(|s| item["status"].as_str() == Some(s)))
        .filter(|item| {
            search.as_ref().is_none_or(|needle| {
                item["title"]
                    .as_str()
                    .or_else(|| item["name"].as_str())
                    .map(|t| t.to_lowercase().contains(needle))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect();
    matched.sort_by(|a, b| {
        b["created_at"]
            .as_str()
            .unwrap_or("")
            .cmp(a["created_at"].as_str().unwrap_or(""))
    });
    matched
}

async fn health(State(state): State<FakeState>) -> Response {
    state.db.lock().await.log.push("GET /api/health".to_string());
    Json(json!({ "status": "ok" })).into_response()
}

async fn login(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    state.db.lock().await.log.push("POST /api/auth/login".to_string());
    if body["email"] == ADMIN_EMAIL && body["password"] == ADMIN_PASSWORD {
        Json(json!({ "access_token": ADMIN_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn me(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.db.lock().await.log.push("GET /api/auth/me".to_string());
    if !is_admin(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(user(1, "Admin", ADMIN_EMAIL, "ADMIN")).into_response()
}

async fn list(
    State(state): State<FakeState>,
    Path(collection): Path<String>,
    Query(params): Params,
) -> Response {
    let mut db = state.db.lock().await;
    record(&mut db, "GET", &format!("/api/{collection}"), &params);
    let items = db.collections.get(&collection).cloned().unwrap_or_default();
    Json(paginate(filtered(&items, &params, None), &params)).into_response()
}

async fn moderation_list(
    State(state): State<FakeState>,
    Path(collection): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    let mut db = state.db.lock().await;
    record(
        &mut db,
        "GET",
        &format!("/api/{collection}/moderation/pending"),
        &params,
    );
    if !is_admin(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let items = db.collections.get(&collection).cloned().unwrap_or_default();
    Json(paginate(filtered(&items, &params, Some("pending")), &params)).into_response()
}

async fn create(
    State(state): State<FakeState>,
    Path(collection): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut db = state.db.lock().await;
    record(&mut db, "POST", &format!("/api/{collection}"), &HashMap::new());

    let missing_email = body.get("email").and_then(Value::as_str).unwrap_or("").is_empty();
    if collection == "proposals" && missing_email {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Email is required");
    }
    let duplicate = collection == "users"
        && db
            .collections
            .get("users")
            .map(|users| users.iter().any(|u| u["email"] == body["email"]))
            .unwrap_or(false);
    if duplicate {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }

    db.next_id += 1;
    body["id"] = json!(db.next_id);
    body["created_at"] = json!("2025-06-01T00:00:00");
    if collection == "proposals" {
        body["status"] = json!("pending");
    }
    if collection == "users" {
        if let Some(fields) = body.as_object_mut() {
            fields.remove("password");
        }
        body["is_active"] = json!(true);
        body["requires_approval"] = json!(false);
    }
    db.collections
        .entry(collection)
        .or_default()
        .push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_item(
    State(state): State<FakeState>,
    Path((collection, id)): Path<(String, i64)>,
) -> Response {
    let mut db = state.db.lock().await;
    record(&mut db, "GET", &format!("/api/{collection}/{id}"), &HashMap::new());
    let found = db
        .collections
        .get(&collection)
        .and_then(|items| items.iter().find(|i| i["id"].as_i64() == Some(id)))
        .cloned();
    match found {
        Some(item) => Json(item).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Not found"),
    }
}

async fn update_item(
    State(state): State<FakeState>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    Json(changes): Json<Value>,
) -> Response {
    let mut db = state.db.lock().await;
    record(&mut db, "PATCH", &format!("/api/{collection}/{id}"), &HashMap::new());
    if !is_admin(&headers) {
        return detail(StatusCode::FORBIDDEN, "Insufficient permissions");
    }
    let Some(item) = db
        .collections
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|i| i["id"].as_i64() == Some(id)))
    else {
        return detail(StatusCode::NOT_FOUND, "Not found");
    };
    if let (Some(target), Some(fields)) = (item.as_object_mut(), changes.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(item.clone()).into_response()
}

async fn delete_item(
    State(state): State<FakeState>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    let mut db = state.db.lock().await;
    record(&mut db, "DELETE", &format!("/api/{collection}/{id}"), &HashMap::new());
    if !is_admin(&headers) {
        return detail(StatusCode::FORBIDDEN, "Insufficient permissions");
    }
    let Some(items) = db.collections.get_mut(&collection) else {
        return detail(StatusCode::NOT_FOUND, "Not found");
    };
    let before = items.len();
    items.retain(|i| i["id"].as_i64() != Some(id));
    if items.len() == before {
        return detail(StatusCode::NOT_FOUND, "Not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn update_status(
    State(state): State<FakeState>,
    Path((collection, id)): Path<(String, i64)>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    let mut db = state.db.lock().await;
    record(
        &mut db,
        "PATCH",
        &format!("/api/{collection}/{id}/status"),
        &params,
    );
    if !is_admin(&headers) {
        return detail(StatusCode::FORBIDDEN, "Insufficient permissions");
    }
    if db.fail_status_updates {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let key = if collection == "proposals" {
        "new_status"
    } else {
        "status"
    };
    let Some(new_status) = params.get(key).cloned() else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Missing status");
    };
    let Some(item) = db
        .collections
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|i| i["id"].as_i64() == Some(id)))
    else {
        return detail(StatusCode::NOT_FOUND, "Not found");
    };
    item["status"] = json!(new_status);
    Json(json!({ "success": true })).into_response()
}
