use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::domain::user::{Credentials, Registration, TokenResponse};
use crate::endpoint::Endpoints;
use crate::error::ApiResult;
use crate::infra::http::{ApiClient, Operation};
use crate::services::AuthService;

pub struct AuthClient {
    api: ApiClient,
    endpoints: Endpoints,
}

impl AuthClient {
    pub fn new(api: ApiClient, endpoints: Endpoints) -> Self {
        Self { api, endpoints }
    }
}

#[async_trait]
impl AuthService for AuthClient {
    async fn register(&self, registration: Registration) -> ApiResult<Value> {
        let request = self
            .api
            .request(Method::POST, self.endpoints.register())
            .json(&registration);
        self.api.send_json(request, Operation::Register).await
    }

    async fn login(&self, credentials: Credentials) -> ApiResult<TokenResponse> {
        let request = self
            .api
            .request(Method::POST, self.endpoints.login())
            .json(&credentials);
        self.api.send_json(request, Operation::Login).await
    }
}
