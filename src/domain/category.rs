use serde::{Deserialize, Serialize};

use crate::domain::id::RecordId;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub pk: RecordId,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Body of category create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub subcategories: Vec<String>,
}

/// Separator used when subcategories are typed as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubcategoryFormat {
    #[default]
    Lines,
    Commas,
}

impl SubcategoryFormat {
    pub fn separator(&self) -> char {
        match self {
            SubcategoryFormat::Lines => '\n',
            SubcategoryFormat::Commas => ',',
        }
    }

    /// Renders a list back into editable text.
    pub fn join(&self, subcategories: &[String]) -> String {
        match self {
            SubcategoryFormat::Lines => subcategories.join("\n"),
            SubcategoryFormat::Commas => subcategories.join(", "),
        }
    }
}

pub fn parse_subcategories(text: &str, format: SubcategoryFormat) -> Vec<String> {
    text.split(format.separator())
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl CategoryDraft {
    pub fn from_form(name: &str, subcategories: &str, format: SubcategoryFormat) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "category name must not be empty".to_string(),
            ));
        }
        let subcategories = parse_subcategories(subcategories, format);
        if subcategories.is_empty() {
            return Err(AppError::Validation(
                "at least one subcategory is required".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            subcategories,
        })
    }
}
