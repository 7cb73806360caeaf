use async_trait::async_trait;

use crate::domain::ticket::{AttachmentFile, NewTicket, StoredAttachment, Ticket};
use crate::error::ApiResult;

/// Ticket operations, always scoped to one user's email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketService: Send + Sync {
    async fn list_tickets(&self, user_email: String) -> ApiResult<Vec<Ticket>>;
    async fn create_ticket(&self, user_email: String, ticket: NewTicket) -> ApiResult<Ticket>;
    async fn upload_attachment(
        &self,
        user_email: String,
        file: AttachmentFile,
    ) -> ApiResult<StoredAttachment>;
}
