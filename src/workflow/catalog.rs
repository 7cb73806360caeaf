use crate::context::AppContext;
use crate::domain::category::{Category, CategoryDraft, SubcategoryFormat};
use crate::domain::id::RecordId;
use crate::error::{ApiResult, AppResult};

/// Interactive yes/no gate in front of destructive actions.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Raw category form input as typed by the user.
#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub name: String,
    pub subcategories: String,
    pub format: SubcategoryFormat,
}

impl CategoryForm {
    /// Prefills the edit form from an existing category.
    pub fn editing(category: &Category, format: SubcategoryFormat) -> Self {
        Self {
            name: category.name.clone(),
            subcategories: format.join(&category.subcategories),
            format,
        }
    }

    fn draft(&self) -> AppResult<CategoryDraft> {
        CategoryDraft::from_form(&self.name, &self.subcategories, self.format)
    }
}

/// Result of a successful mutation followed by a list refresh.
///
/// The refresh is reported separately: the mutation stands even if reloading fails.
#[derive(Debug)]
pub struct CatalogChange {
    pub category: Option<Category>,
    pub refreshed: ApiResult<Vec<Category>>,
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted(CatalogChange),
}

pub async fn load_categories(ctx: &AppContext) -> AppResult<Vec<Category>> {
    Ok(ctx.catalog.list_categories().await?)
}

pub async fn create_category(ctx: &AppContext, form: CategoryForm) -> AppResult<CatalogChange> {
    let draft = form.draft()?;
    let created = ctx.catalog.create_category(draft).await?;
    tracing::info!(pk = %created.pk, name = %created.name, "category created");

    Ok(CatalogChange {
        category: Some(created),
        refreshed: ctx.catalog.list_categories().await,
    })
}

pub async fn update_category(
    ctx: &AppContext,
    pk: RecordId,
    form: CategoryForm,
) -> AppResult<CatalogChange> {
    let draft = form.draft()?;
    let updated = ctx.catalog.update_category(pk, draft).await?;
    tracing::info!(pk = %updated.pk, "category updated");

    Ok(CatalogChange {
        category: Some(updated),
        refreshed: ctx.catalog.list_categories().await,
    })
}

/// Deletes after explicit confirmation, then reloads the list.
pub async fn delete_category(
    ctx: &AppContext,
    pk: RecordId,
    confirmer: &dyn Confirmer,
) -> AppResult<DeleteOutcome> {
    let prompt = format!("¿Estás seguro de eliminar la categoría \"{pk}\"?");
    if !confirmer.confirm(&prompt) {
        tracing::debug!(%pk, "deletion cancelled");
        return Ok(DeleteOutcome::Cancelled);
    }

    ctx.catalog.delete_category(pk.clone()).await?;
    tracing::info!(%pk, "category deleted");

    Ok(DeleteOutcome::Deleted(CatalogChange {
        category: None,
        refreshed: ctx.catalog.list_categories().await,
    }))
}
