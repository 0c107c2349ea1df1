use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{server_detail, ApiError};
use crate::api::request::{collection_path, FetchRequest};
use crate::config::{bearer_header, ApiConfig, CredentialProvider};
use crate::model::{
    LoginRequest, ModerationKind, Page, Proposal, ProposalDraft, Resource, TokenResponse, User,
};

/// Thin JSON client for the RIG REST API.
///
/// Cheap to clone; clones share the connection pool and the credential
/// provider.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            ApiError::InvalidRequest(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {endpoint}?page=&limit=&search=` decoded as a page of `T`.
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        request: &FetchRequest,
    ) -> Result<Page<T>, ApiError> {
        let url = self.url(&request.endpoint, &request.query_pairs())?;
        tracing::debug!(
            request_id = %request.id,
            endpoint = %request.endpoint,
            page = request.page,
            limit = request.limit,
            "Fetching page"
        );
        self.send_json(self.request(Method::GET, url.clone()), &url)
            .await
    }

    /// `GET /api/{collection}/{id}`.
    pub async fn get<T: Resource>(&self, id: i64) -> Result<T, ApiError> {
        let url = self.url(&item_path(T::COLLECTION, id), &[])?;
        self.send_json(self.request(Method::GET, url.clone()), &url)
            .await
    }

    /// `POST /api/{collection}`.
    pub async fn create<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: Resource,
        B: Serialize + ?Sized,
    {
        let url = self.url(&collection_path(T::COLLECTION), &[])?;
        let builder = self.request(Method::POST, url.clone()).json(body);
        self.send_json(builder, &url).await
    }

    /// `PATCH /api/{collection}/{id}` with a partial body.
    pub async fn update<T, B>(&self, id: i64, body: &B) -> Result<T, ApiError>
    where
        T: Resource,
        B: Serialize + ?Sized,
    {
        let url = self.url(&item_path(T::COLLECTION, id), &[])?;
        let builder = self.request(Method::PATCH, url.clone()).json(body);
        self.send_json(builder, &url).await
    }

    /// `PATCH /api/{collection}/{id}/status?{key}={status}`.
    ///
    /// The response body differs between collections and is not needed.
    pub async fn update_status(
        &self,
        kind: ModerationKind,
        id: i64,
        status: &str,
    ) -> Result<(), ApiError> {
        let path = format!("{}/status", item_path(kind.collection(), id));
        let url = self.url(&path, &[(kind.status_param(), status.to_string())])?;
        self.execute(self.request(Method::PATCH, url.clone()), &url)
            .await
            .map(drop)
    }

    /// `DELETE /api/{collection}/{id}`.
    pub async fn delete<T: Resource>(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&item_path(T::COLLECTION, id), &[])?;
        self.execute(self.request(Method::DELETE, url.clone()), &url)
            .await
            .map(drop)
    }

    /// `POST /api/auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.url("/api/auth/login", &[])?;
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let builder = self.request(Method::POST, url.clone()).json(&body);
        self.send_json(builder, &url).await
    }

    /// `GET /api/auth/me` for the current credentials.
    pub async fn me(&self) -> Result<User, ApiError> {
        let url = self.url("/api/auth/me", &[])?;
        self.send_json(self.request(Method::GET, url.clone()), &url)
            .await
    }

    /// `POST /api/proposals`; does not require a session.
    pub async fn submit_proposal(&self, draft: &ProposalDraft) -> Result<Proposal, ApiError> {
        self.create::<Proposal, _>(draft).await
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.url("/api/health", &[])?;
        self.send_json(self.request(Method::GET, url.clone()), &url)
            .await
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid URL '{}': {}", raw, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = bearer_header(self.credentials.as_ref()) {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder
    }

    async fn execute(&self, builder: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            detail: server_detail(status.as_u16(), &body),
        })
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &Url,
    ) -> Result<R, ApiError> {
        let response = self.execute(builder, url).await?;
        let body = response.bytes().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn item_path(collection: &str, id: i64) -> String {
    format!("{}/{}", collection_path(collection), id)
}
