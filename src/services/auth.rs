use async_trait::async_trait;
use serde_json::Value;

use crate::domain::user::{Credentials, Registration, TokenResponse};
use crate::error::ApiResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns the created account as the backend describes it.
    async fn register(&self, registration: Registration) -> ApiResult<Value>;
    async fn login(&self, credentials: Credentials) -> ApiResult<TokenResponse>;
}
