use async_trait::async_trait;
use reqwest::Method;

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::id::RecordId;
use crate::endpoint::Endpoints;
use crate::error::ApiResult;
use crate::infra::http::{ApiClient, Operation, request_url};
use crate::services::CatalogService;

pub struct CatalogClient {
    api: ApiClient,
    endpoints: Endpoints,
}

impl CatalogClient {
    pub fn new(api: ApiClient, endpoints: Endpoints) -> Self {
        Self { api, endpoints }
    }

    fn category_url(&self, pk: &RecordId, operation: Operation) -> ApiResult<reqwest::Url> {
        request_url(self.endpoints.category(pk.as_str()), operation)
    }
}

#[async_trait]
impl CatalogService for CatalogClient {
    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let request = self.api.request(Method::GET, self.endpoints.categories());
        self.api.send_json(request, Operation::ListCategories).await
    }

    async fn create_category(&self, draft: CategoryDraft) -> ApiResult<Category> {
        let request = self
            .api
            .request(Method::POST, self.endpoints.categories())
            .json(&draft);
        self.api.send_json(request, Operation::CreateCategory).await
    }

    async fn update_category(&self, pk: RecordId, draft: CategoryDraft) -> ApiResult<Category> {
        let url = self.category_url(&pk, Operation::UpdateCategory)?;
        let request = self.api.request(Method::PUT, url).json(&draft);
        self.api.send_json(request, Operation::UpdateCategory).await
    }

    async fn delete_category(&self, pk: RecordId) -> ApiResult<()> {
        let url = self.category_url(&pk, Operation::DeleteCategory)?;
        let request = self.api.request(Method::DELETE, url);
        self.api.send_empty(request, Operation::DeleteCategory).await
    }
}
