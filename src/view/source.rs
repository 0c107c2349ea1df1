//! Where a collection view gets its pages from.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, FetchRequest};
use crate::model::{Page, Resource};

/// A paginated, searchable list endpoint.
///
/// Dropping the returned future must abort the request; the view relies on
/// that to cancel superseded fetches.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<T>, ApiError>;
}

#[async_trait]
impl<T: Resource> CollectionSource<T> for ApiClient {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<Page<T>, ApiError> {
        self.list_page(request).await
    }
}
