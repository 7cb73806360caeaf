use async_trait::async_trait;
use reqwest::{
    Method,
    multipart::{Form, Part},
};

use crate::domain::ticket::{AttachmentFile, NewTicket, StoredAttachment, Ticket};
use crate::endpoint::Endpoints;
use crate::error::ApiResult;
use crate::infra::http::{ApiClient, Operation, request_url};
use crate::services::TicketService;

pub struct TicketClient {
    api: ApiClient,
    endpoints: Endpoints,
}

impl TicketClient {
    pub fn new(api: ApiClient, endpoints: Endpoints) -> Self {
        Self { api, endpoints }
    }
}

#[async_trait]
impl TicketService for TicketClient {
    async fn list_tickets(&self, user_email: String) -> ApiResult<Vec<Ticket>> {
        let url = request_url(
            self.endpoints.tickets_for(&user_email),
            Operation::ListTickets,
        )?;
        let request = self.api.request(Method::GET, url);
        self.api.send_json(request, Operation::ListTickets).await
    }

    async fn create_ticket(&self, user_email: String, ticket: NewTicket) -> ApiResult<Ticket> {
        let url = request_url(
            self.endpoints.tickets_for(&user_email),
            Operation::CreateTicket,
        )?;
        let request = self.api.request(Method::POST, url).json(&ticket);
        self.api.send_json(request, Operation::CreateTicket).await
    }

    async fn upload_attachment(
        &self,
        user_email: String,
        file: AttachmentFile,
    ) -> ApiResult<StoredAttachment> {
        let url = request_url(
            self.endpoints.ticket_upload_for(&user_email),
            Operation::UploadAttachment,
        )?;
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new().part("file", part);
        let request = self.api.request(Method::POST, url).multipart(form);
        self.api.send_json(request, Operation::UploadAttachment).await
    }
}
