use clap::{Args, Subcommand};

use crate::cmd::prompt::{AssumeYes, StdinConfirmer, ask_lines, value_or_ask};
use crate::context::AppContext;
use crate::domain::category::{Category, SubcategoryFormat};
use crate::domain::id::RecordId;
use crate::error::{AppError, AppResult};
use crate::workflow::catalog::{
    self, CatalogChange, CategoryForm, Confirmer, DeleteOutcome,
};

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogCommand {
    /// List categories and their subcategories.
    List,
    /// Create a category.
    Create(CategoryFields),
    /// Rename a category or replace its subcategories. The key never changes.
    Update {
        pk: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category after confirmation.
    Delete {
        pk: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Subcategories, newline separated (or comma separated with --commas).
    #[arg(long)]
    pub subcategories: Option<String>,
    #[arg(long)]
    pub commas: bool,
}

impl CategoryFields {
    fn format(&self) -> SubcategoryFormat {
        if self.commas {
            SubcategoryFormat::Commas
        } else {
            SubcategoryFormat::Lines
        }
    }
}

pub async fn run(ctx: &AppContext, command: CatalogCommand) -> AppResult<()> {
    match command {
        CatalogCommand::List => {
            let categories = catalog::load_categories(ctx).await?;
            print_categories(&categories);
            Ok(())
        }
        CatalogCommand::Create(fields) => run_create(ctx, fields).await,
        CatalogCommand::Update { pk, fields } => run_update(ctx, RecordId(pk), fields).await,
        CatalogCommand::Delete { pk, yes } => {
            let confirmer: &dyn Confirmer = if yes { &AssumeYes } else { &StdinConfirmer };
            match catalog::delete_category(ctx, RecordId(pk.clone()), confirmer).await? {
                DeleteOutcome::Cancelled => println!("Cancelled."),
                DeleteOutcome::Deleted(change) => {
                    println!("Deleted category {pk}.");
                    print_refresh(change);
                }
            }
            Ok(())
        }
    }
}

async fn run_create(ctx: &AppContext, fields: CategoryFields) -> AppResult<()> {
    let format = fields.format();
    let form = CategoryForm {
        name: value_or_ask(fields.name, "Name")?,
        subcategories: match fields.subcategories {
            Some(text) => text,
            None => ask_lines("Subcategories")?,
        },
        format,
    };

    let change = catalog::create_category(ctx, form).await?;
    if let Some(category) = &change.category {
        println!("Created category {} ({}).", category.name, category.pk);
    }
    print_refresh(change);
    Ok(())
}

async fn run_update(ctx: &AppContext, pk: RecordId, fields: CategoryFields) -> AppResult<()> {
    let format = fields.format();
    let current = catalog::load_categories(ctx)
        .await?
        .into_iter()
        .find(|category| category.pk == pk)
        .ok_or_else(|| AppError::Validation(format!("no category with key {pk}")))?;

    let mut form = CategoryForm::editing(&current, format);
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(subcategories) = fields.subcategories {
        form.subcategories = subcategories;
    }

    let change = catalog::update_category(ctx, pk, form).await?;
    if let Some(category) = &change.category {
        println!("Updated category {} ({}).", category.name, category.pk);
    }
    print_refresh(change);
    Ok(())
}

fn print_refresh(change: CatalogChange) {
    match change.refreshed {
        Ok(categories) => print_categories(&categories),
        Err(err) => eprintln!("Warning: {err}"),
    }
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories yet.");
        return;
    }
    for category in categories {
        println!("{} [{}]", category.name, category.pk);
        for subcategory in &category.subcategories {
            println!("  - {subcategory}");
        }
    }
}
