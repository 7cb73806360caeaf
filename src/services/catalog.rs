use async_trait::async_trait;

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::id::RecordId;
use crate::error::ApiResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_categories(&self) -> ApiResult<Vec<Category>>;
    async fn create_category(&self, draft: CategoryDraft) -> ApiResult<Category>;
    /// The key is immutable; only name and subcategories change.
    async fn update_category(&self, pk: RecordId, draft: CategoryDraft) -> ApiResult<Category>;
    async fn delete_category(&self, pk: RecordId) -> ApiResult<()>;
}
