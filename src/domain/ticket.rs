use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::id::RecordId;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    pub id: RecordId,
    #[serde(default)]
    pub user_email: Option<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attachment_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn attachment_name(&self) -> Option<&str> {
        self.attachment_key.as_deref().map(attachment_name)
    }
}

/// Display name of a stored file: the last segment of its storage key.
pub fn attachment_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub category: String,
    pub subcategory: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_key: Option<String>,
}

impl NewTicket {
    pub fn new(
        category: &str,
        subcategory: &str,
        description: &str,
        attachment_key: Option<String>,
    ) -> AppResult<Self> {
        let description = description.trim();
        if category.trim().is_empty() || subcategory.trim().is_empty() {
            return Err(AppError::Validation(
                "category and subcategory are required".to_string(),
            ));
        }
        if description.is_empty() {
            return Err(AppError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        Ok(Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            description: description.to_string(),
            attachment_key,
        })
    }
}

/// Response of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredAttachment {
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketStats {
    pub total: usize,
    pub with_attachment: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            total: tickets.len(),
            with_attachment: tickets
                .iter()
                .filter(|ticket| ticket.attachment_key.is_some())
                .count(),
        }
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    // Naive timestamps are emitted in UTC.
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
