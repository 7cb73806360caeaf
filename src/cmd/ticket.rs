use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::domain::ticket::{AttachmentFile, Ticket, attachment_name};
use crate::error::{AppError, AppResult};
use crate::workflow::ticket::{self, TicketComposer};

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketCommand {
    /// List your tickets.
    List,
    /// Upload a file and print its storage key.
    Upload { path: PathBuf },
    /// Open a ticket.
    Create(CreateTicketArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateTicketArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub subcategory: String,
    #[arg(long)]
    pub description: String,
    /// Upload this file first and attach it.
    #[arg(long, conflicts_with = "attachment_key")]
    pub attach: Option<PathBuf>,
    /// Storage key returned by an earlier `ticket upload`.
    #[arg(long)]
    pub attachment_key: Option<String>,
}

pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<()> {
    match command {
        TicketCommand::List => run_list(ctx).await,
        TicketCommand::Upload { path } => {
            let mut composer = TicketComposer::new(Vec::new());
            composer.choose_file(read_attachment(&path).await?);
            let key = composer.upload(ctx).await?;
            println!("Uploaded {} as {key}", attachment_name(key));
            Ok(())
        }
        TicketCommand::Create(args) => run_create(ctx, args).await,
    }
}

async fn run_list(ctx: &AppContext) -> AppResult<()> {
    let mine = ticket::list_my_tickets(ctx).await?;
    if mine.tickets.is_empty() {
        println!("You have no tickets yet.");
        return Ok(());
    }
    for ticket in &mine.tickets {
        print_ticket(ticket);
    }
    println!(
        "{} tickets, {} with attachments",
        mine.stats.total, mine.stats.with_attachment
    );
    Ok(())
}

async fn run_create(ctx: &AppContext, args: CreateTicketArgs) -> AppResult<()> {
    ctx.session.require()?;

    let mut composer = TicketComposer::load(ctx).await?;
    if let Err(err) = composer.select_category(&args.category) {
        let names = composer
            .categories()
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>();
        eprintln!("Available categories: {}", names.join(", "));
        return Err(err);
    }
    composer.select_subcategory(&args.subcategory)?;
    composer.set_description(&args.description);

    if let Some(path) = &args.attach {
        composer.choose_file(read_attachment(path).await?);
        composer.upload(ctx).await?;
    }
    if let Some(key) = args.attachment_key {
        composer.use_uploaded_key(key);
    }
    if let Some(key) = composer.attachment_key() {
        println!("Attaching {}", attachment_name(key));
    }

    let created = composer.submit(ctx).await?;
    println!("Ticket created with ID: {}", created.id);
    Ok(())
}

async fn read_attachment(path: &Path) -> AppResult<AttachmentFile> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Validation(format!("{} is not a file", path.display())))?
        .to_string();
    let bytes = tokio::fs::read(path).await?;
    Ok(AttachmentFile { file_name, bytes })
}

fn print_ticket(ticket: &Ticket) {
    println!(
        "Ticket #{}  {} - {}",
        ticket.id, ticket.category, ticket.subcategory
    );
    if let Some(owner) = &ticket.user_email {
        println!("  Owner: {owner}");
    }
    if !ticket.description.is_empty() {
        println!("  {}", ticket.description);
    }
    if let Some(name) = ticket.attachment_name() {
        println!("  Attachment: {name}");
    }
    if let Some(created_at) = ticket.created_at {
        println!("  Created: {}", created_at.format("%Y-%m-%d %H:%M UTC"));
    }
}
