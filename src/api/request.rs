use uuid::Uuid;

/// One issued list request, derived from the view's query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Correlates log lines for this request.
    pub id: String,
    /// Path below the base URL, e.g. `/api/guides`.
    pub endpoint: String,
    pub page: u32,
    pub limit: u32,
    /// Omitted from the query string when `None`.
    pub search: Option<String>,
    /// Extra query pairs, e.g. a moderation status filter.
    pub filters: Vec<(&'static str, String)>,
}

impl FetchRequest {
    pub fn new(endpoint: impl Into<String>, page: u32, limit: u32, search: &str) -> Self {
        let search = search.trim();
        Self {
            id: Uuid::new_v4().to_string(),
            endpoint: endpoint.into(),
            page,
            limit,
            search: (!search.is_empty()).then(|| search.to_string()),
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.filters.push((key, value.into()));
        self
    }

    /// Query pairs in wire order: `page`, `limit`, `search`, then filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        pairs
    }

    /// Same id and search against another endpoint. Filters are not carried
    /// over.
    pub fn retarget(&self, endpoint: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            id: self.id.clone(),
            endpoint: endpoint.into(),
            page,
            limit,
            search: self.search.clone(),
            filters: Vec::new(),
        }
    }
}

/// `/api/{collection}`.
pub fn collection_path(collection: &str) -> String {
    format!("/api/{}", collection)
}
