use reqwest::{
    Client, IntoUrl, Method, RequestBuilder, Response, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult, AppResult, ErrorKind};
use crate::session::SessionContext;

/// Backend operations, each with the message shown when the server gives no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    ListCategories,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
    ListTickets,
    CreateTicket,
    UploadAttachment,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::ListCategories => "list_categories",
            Operation::CreateCategory => "create_category",
            Operation::UpdateCategory => "update_category",
            Operation::DeleteCategory => "delete_category",
            Operation::ListTickets => "list_tickets",
            Operation::CreateTicket => "create_ticket",
            Operation::UploadAttachment => "upload_attachment",
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Register => "Error al registrar usuario",
            Operation::Login => "Credenciales inválidas",
            Operation::ListCategories => "Error al obtener categorías",
            Operation::CreateCategory => "Error al crear categoría",
            Operation::UpdateCategory => "Error al actualizar categoría",
            Operation::DeleteCategory => "Error al eliminar categoría",
            Operation::ListTickets => "Error al obtener tickets",
            Operation::CreateTicket => "Error al crear ticket",
            Operation::UploadAttachment => "Error al subir archivo",
        }
    }
}

/// Thin wrapper over `reqwest` that turns every outcome into an `ApiResult`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(session: SessionContext) -> Self {
        Self::with_client(Client::new(), session)
    }

    pub fn with_client(http: Client, session: SessionContext) -> Self {
        Self { http, session }
    }

    /// Starts a request, attaching the bearer token when someone is logged in.
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        match self.session.snapshot() {
            Some(session) => builder.header(AUTHORIZATION, format!("Bearer {}", session.access_token)),
            None => builder,
        }
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: Operation,
    ) -> ApiResult<T> {
        let response = self.execute(request, operation).await?;
        response.json::<T>().await.map_err(|err| {
            tracing::warn!(operation = operation.name(), %err, "failed to decode response body");
            ApiError::new(ErrorKind::InvalidResponse, operation.fallback_message())
        })
    }

    /// Sends a request whose success body carries nothing the caller needs.
    pub async fn send_empty(&self, request: RequestBuilder, operation: Operation) -> ApiResult<()> {
        self.execute(request, operation).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder, operation: Operation) -> ApiResult<Response> {
        tracing::debug!(operation = operation.name(), "sending request");

        let response = request.send().await.map_err(|err| {
            tracing::warn!(operation = operation.name(), %err, "backend unreachable");
            ApiError::new(ErrorKind::NetworkError, operation.fallback_message())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = failure_from_body(status.as_u16(), &body, operation);
        tracing::warn!(
            operation = operation.name(),
            status = error.status,
            kind = %error.kind,
            message = %error.message,
            "backend rejected request"
        );
        Err(error)
    }
}

/// Converts an endpoint-building failure into the operation's adapter error.
pub fn request_url(url: AppResult<Url>, operation: Operation) -> ApiResult<Url> {
    url.map_err(|err| {
        tracing::warn!(operation = operation.name(), %err, "cannot build request URL");
        ApiError::new(ErrorKind::InvalidRequest, operation.fallback_message())
    })
}

/// Builds the error for a non-2xx response.
pub fn failure_from_body(status: u16, body: &[u8], operation: Operation) -> ApiError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| detail_message(&value))
        .unwrap_or_else(|| operation.fallback_message().to_string());
    ApiError::new(ErrorKind::from_status(status), message).with_status(status)
}

/// Extracts the human-readable `detail` field of an error body, if any.
pub fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(entries) => {
            let messages = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.trim().is_empty())
                .collect::<Vec<_>>();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
