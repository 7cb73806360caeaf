use crate::context::AppContext;
use crate::domain::category::Category;
use crate::domain::ticket::{AttachmentFile, NewTicket, Ticket, TicketStats};
use crate::error::{AppError, AppResult};

/// State of the "create ticket" form.
///
/// Uploading is a separate step from submitting: a stored file whose ticket is
/// never submitted stays orphaned on the backend.
#[derive(Debug)]
pub struct TicketComposer {
    categories: Vec<Category>,
    category: Option<usize>,
    subcategory: Option<String>,
    description: String,
    file: Option<AttachmentFile>,
    attachment_key: Option<String>,
}

impl TicketComposer {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            category: None,
            subcategory: None,
            description: String::new(),
            file: None,
            attachment_key: None,
        }
    }

    pub async fn load(ctx: &AppContext) -> AppResult<Self> {
        let categories = ctx.catalog.list_categories().await?;
        Ok(Self::new(categories))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.category.map(|index| &self.categories[index])
    }

    /// Selecting a category resets the subcategory.
    pub fn select_category(&mut self, name: &str) -> AppResult<()> {
        let index = self
            .categories
            .iter()
            .position(|category| category.name == name)
            .ok_or_else(|| AppError::Validation(format!("unknown category '{name}'")))?;
        self.category = Some(index);
        self.subcategory = None;
        Ok(())
    }

    pub fn select_subcategory(&mut self, name: &str) -> AppResult<()> {
        let category = self.selected_category().ok_or_else(|| {
            AppError::Validation("select a category before its subcategory".to_string())
        })?;
        if !category.subcategories.iter().any(|sub| sub == name) {
            return Err(AppError::Validation(format!(
                "'{name}' is not a subcategory of '{}'",
                category.name
            )));
        }
        self.subcategory = Some(name.to_string());
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Choosing another file forgets any key obtained for the previous one.
    pub fn choose_file(&mut self, file: AttachmentFile) {
        self.file = Some(file);
        self.attachment_key = None;
    }

    /// Attaches a key obtained by an earlier, separate upload.
    pub fn use_uploaded_key(&mut self, key: String) {
        self.file = None;
        self.attachment_key = Some(key);
    }

    pub fn attachment_key(&self) -> Option<&str> {
        self.attachment_key.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.category.is_some() && self.subcategory.is_some()
    }

    pub async fn upload(&mut self, ctx: &AppContext) -> AppResult<&str> {
        let file = self
            .file
            .clone()
            .ok_or_else(|| AppError::Validation("select a file to upload first".to_string()))?;
        let session = ctx.session.require()?;

        let file_name = file.file_name.clone();
        let stored = ctx
            .tickets
            .upload_attachment(session.email.clone(), file)
            .await?;
        tracing::info!(file = %file_name, key = %stored.key, "attachment uploaded");

        Ok(self.attachment_key.insert(stored.key).as_str())
    }

    pub async fn submit(&self, ctx: &AppContext) -> AppResult<Ticket> {
        if !self.can_submit() {
            return Err(AppError::Validation(
                "category and subcategory are required".to_string(),
            ));
        }
        let ticket = NewTicket::new(
            self.selected_category()
                .map(|category| category.name.as_str())
                .unwrap_or_default(),
            self.subcategory.as_deref().unwrap_or_default(),
            &self.description,
            self.attachment_key.clone(),
        )?;
        let session = ctx.session.require()?;

        let created = ctx
            .tickets
            .create_ticket(session.email.clone(), ticket)
            .await?;
        tracing::info!(id = %created.id, "ticket created");
        Ok(created)
    }
}

#[derive(Debug)]
pub struct MyTickets {
    pub tickets: Vec<Ticket>,
    pub stats: TicketStats,
}

pub async fn list_my_tickets(ctx: &AppContext) -> AppResult<MyTickets> {
    let session = ctx.session.require()?;
    let tickets = ctx.tickets.list_tickets(session.email.clone()).await?;
    let stats = TicketStats::from_tickets(&tickets);
    Ok(MyTickets { tickets, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::RecordId;
    use crate::domain::session::Session;
    use crate::domain::ticket::StoredAttachment;
    use crate::error::{ApiError, ErrorKind};
    use crate::services::{MockAuthService, MockCatalogService, MockTicketService};

    fn categories() -> Vec<Category> {
        vec![
            Category {
                pk: RecordId::from("hardware"),
                name: "Hardware".to_string(),
                subcategories: vec!["Laptops".to_string(), "Desktops".to_string()],
            },
            Category {
                pk: RecordId::from("redes"),
                name: "Redes".to_string(),
                subcategories: vec!["WiFi".to_string()],
            },
        ]
    }

    fn created(attachment_key: Option<String>) -> Ticket {
        Ticket {
            id: RecordId::from("t-1"),
            user_email: Some("ana@example.com".to_string()),
            category: "Hardware".to_string(),
            subcategory: "Laptops".to_string(),
            description: "No enciende".to_string(),
            attachment_key,
            created_at: None,
        }
    }

    fn context(tickets: MockTicketService) -> AppContext {
        AppContext::for_tests(
            MockAuthService::new(),
            MockCatalogService::new(),
            tickets,
            Some(Session::new("ana@example.com", "tok", "bearer")),
        )
    }

    fn composer() -> TicketComposer {
        let mut composer = TicketComposer::new(categories());
        composer.select_category("Hardware").unwrap();
        composer.select_subcategory("Laptops").unwrap();
        composer.set_description("No enciende");
        composer
    }

    fn file() -> AttachmentFile {
        AttachmentFile {
            file_name: "foto.png".to_string(),
            bytes: vec![0x89, 0x50],
        }
    }

    #[tokio::test]
    async fn loads_categories_from_catalog() {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(categories()));
        let ctx = AppContext::for_tests(
            MockAuthService::new(),
            catalog,
            MockTicketService::new(),
            None,
        );

        let composer = TicketComposer::load(&ctx).await.unwrap();

        assert_eq!(composer.categories().len(), 2);
        assert!(!composer.can_submit());
    }

    #[test]
    fn changing_category_clears_subcategory() {
        let mut composer = composer();
        assert!(composer.can_submit());

        composer.select_category("Redes").unwrap();
        assert!(!composer.can_submit());
        assert!(matches!(
            composer.select_subcategory("Laptops"),
            Err(AppError::Validation(_))
        ));
        composer.select_subcategory("WiFi").unwrap();
        assert!(composer.can_submit());
    }

    #[test]
    fn rejects_unknown_category() {
        let mut composer = TicketComposer::new(categories());
        assert!(composer.select_category("Software").is_err());
        assert!(composer.select_subcategory("Laptops").is_err());
    }

    #[tokio::test]
    async fn creates_ticket_without_attachment() {
        let mut tickets = MockTicketService::new();
        tickets.expect_upload_attachment().never();
        tickets
            .expect_create_ticket()
            .withf(|email, ticket| email == "ana@example.com" && ticket.attachment_key.is_none())
            .times(1)
            .returning(|_, ticket| Ok(created(ticket.attachment_key)));
        let ctx = context(tickets);

        let ticket = composer().submit(&ctx).await.unwrap();

        assert_eq!(ticket.attachment_key, None);
    }

    #[tokio::test]
    async fn uploaded_key_is_attached_to_ticket() {
        let mut tickets = MockTicketService::new();
        tickets
            .expect_upload_attachment()
            .withf(|email, file| email == "ana@example.com" && file.file_name == "foto.png")
            .times(1)
            .returning(|_, _| {
                Ok(StoredAttachment {
                    key: "uploads/ana@example.com/foto.png".to_string(),
                })
            });
        tickets
            .expect_create_ticket()
            .withf(|_, ticket| {
                ticket.attachment_key.as_deref() == Some("uploads/ana@example.com/foto.png")
            })
            .times(1)
            .returning(|_, ticket| Ok(created(ticket.attachment_key)));
        let ctx = context(tickets);

        let mut composer = composer();
        composer.choose_file(file());
        let key = composer.upload(&ctx).await.unwrap().to_string();
        let ticket = composer.submit(&ctx).await.unwrap();

        assert_eq!(key, "uploads/ana@example.com/foto.png");
        assert_eq!(ticket.attachment_name(), Some("foto.png"));
    }

    #[tokio::test]
    async fn choosing_new_file_drops_previous_key() {
        let mut tickets = MockTicketService::new();
        tickets.expect_upload_attachment().times(1).returning(|_, _| {
            Ok(StoredAttachment {
                key: "uploads/first.png".to_string(),
            })
        });
        let ctx = context(tickets);

        let mut composer = composer();
        composer.choose_file(file());
        composer.upload(&ctx).await.unwrap();
        assert_eq!(composer.attachment_key(), Some("uploads/first.png"));

        composer.choose_file(file());
        assert_eq!(composer.attachment_key(), None);
    }

    #[tokio::test]
    async fn upload_without_file_issues_no_call() {
        let mut tickets = MockTicketService::new();
        tickets.expect_upload_attachment().never();
        let ctx = context(tickets);

        let mut composer = composer();
        assert!(matches!(
            composer.upload(&ctx).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn failed_upload_keeps_form_submittable() {
        let mut tickets = MockTicketService::new();
        tickets
            .expect_upload_attachment()
            .times(1)
            .returning(|_, _| Err(ApiError::new(ErrorKind::ServerError, "Error al subir archivo")));
        let ctx = context(tickets);

        let mut composer = composer();
        composer.choose_file(file());
        let error = composer.upload(&ctx).await.unwrap_err();

        assert_eq!(error.to_string(), "Error al subir archivo");
        assert_eq!(composer.attachment_key(), None);
        assert!(composer.can_submit());
    }

    #[tokio::test]
    async fn requires_session() {
        let mut tickets = MockTicketService::new();
        tickets.expect_list_tickets().never();
        let ctx = AppContext::for_tests(
            MockAuthService::new(),
            MockCatalogService::new(),
            tickets,
            None,
        );

        assert!(matches!(
            list_my_tickets(&ctx).await,
            Err(AppError::Session(_))
        ));
    }

    #[tokio::test]
    async fn lists_tickets_with_stats() {
        let mut tickets = MockTicketService::new();
        tickets
            .expect_list_tickets()
            .withf(|email| email == "ana@example.com")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    created(Some("uploads/a.pdf".to_string())),
                    created(None),
                ])
            });
        let ctx = context(tickets);

        let mine = list_my_tickets(&ctx).await.unwrap();

        assert_eq!(mine.tickets.len(), 2);
        assert_eq!(mine.stats.with_attachment, 1);
    }
}
