mod cmd;
mod config;
mod context;
mod domain;
mod endpoint;
mod error;
mod infra;
mod logging;
mod services;
mod session;
mod workflow;

use clap::{Parser, Subcommand};

use crate::cmd::auth::{self as auth_cmd, LoginArgs, RegisterArgs};
use crate::cmd::catalog::{self as catalog_cmd, CatalogArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self as ticket_cmd, TicketArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(name = "tiqfix", author, version, about = "Support ticket client")]
struct Cli {
    /// Override the API base URL for this invocation.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Log requests and workflow steps to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account.
    Register(RegisterArgs),
    /// Log in and keep the session for later commands.
    Login(LoginArgs),
    /// End the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Browse and manage categories.
    Catalog(CatalogArgs),
    /// Open and list your tickets.
    Ticket(TicketArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    logging::setup_tracing(cli.verbose)?;

    let api_url = cli.api_url;

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command, api_url),
        Commands::Register(args) => auth_cmd::run_register(&connect(api_url)?, args).await,
        Commands::Login(args) => auth_cmd::run_login(&connect(api_url)?, args).await,
        Commands::Logout => auth_cmd::run_logout(&connect(api_url)?),
        Commands::Whoami => auth_cmd::run_whoami(&connect(api_url)?),
        Commands::Catalog(args) => catalog_cmd::run(&connect(api_url)?, args.command).await,
        Commands::Ticket(args) => ticket_cmd::run(&connect(api_url)?, args.command).await,
    }
}

fn connect(api_url: Option<String>) -> AppResult<AppContext> {
    let config = AppConfig::load(api_url)?;
    AppContext::connect(config)
}
