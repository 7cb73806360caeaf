use chrono::Utc;
use clap::Args;
use tokio::sync::watch;

use crate::cmd::prompt::{ask, value_or_ask};
use crate::context::AppContext;
use crate::domain::user::{Credentials, RegistrationForm};
use crate::error::AppResult;
use crate::session::SessionSnapshot;
use crate::workflow::{login, register};

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub firstname: Option<String>,
    #[arg(long)]
    pub lastname: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Prompted for when omitted.
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub confirm_password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,
    /// Prompted for when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn run_register(ctx: &AppContext, args: RegisterArgs) -> AppResult<()> {
    let form = RegistrationForm {
        firstname: value_or_ask(args.firstname, "First name")?,
        lastname: value_or_ask(args.lastname, "Last name")?,
        email: value_or_ask(args.email, "Email")?,
        phone: match args.phone {
            Some(phone) => phone,
            None => ask("Phone (optional)")?,
        },
        password: value_or_ask(args.password, "Password")?,
        confirm_password: value_or_ask(args.confirm_password, "Confirm password")?,
    };

    register::register(ctx, form).await?;
    println!("Account created. Log in with `tiqfix login`.");
    Ok(())
}

pub async fn run_login(ctx: &AppContext, args: LoginArgs) -> AppResult<()> {
    let email = value_or_ask(args.email, "Email")?;
    let password = value_or_ask(args.password, "Password")?;
    let credentials = Credentials::new(&email, &password)?;

    let mut updates = ctx.session.subscribe();
    let session = login::login(ctx, credentials).await?;
    persist_session(ctx, &mut updates)?;

    println!("Welcome, {}", session.display_name());
    Ok(())
}

pub fn run_logout(ctx: &AppContext) -> AppResult<()> {
    let mut updates = ctx.session.subscribe();
    let previous = login::logout(ctx);
    persist_session(ctx, &mut updates)?;

    match previous {
        Some(session) => println!("Logged out {}", session.email),
        None => println!("No active session."),
    }
    Ok(())
}

pub fn run_whoami(ctx: &AppContext) -> AppResult<()> {
    let session = ctx.session.require()?;
    println!("Logged in as {} ({})", session.email, session.display_name());
    match session.expires_at() {
        Some(expiry) if expiry > Utc::now() => println!("Session expires at {expiry}"),
        Some(expiry) => println!("Session expired at {expiry}"),
        None => println!("Session expiry unknown"),
    }
    Ok(())
}

/// Writes the latest published session to disk so the next invocation sees it.
fn persist_session(
    ctx: &AppContext,
    updates: &mut watch::Receiver<SessionSnapshot>,
) -> AppResult<()> {
    let snapshot = updates.borrow_and_update().clone();
    ctx.session_store().sync(&snapshot)
}
