use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
use crate::endpoint::{Capability, Endpoints, RoutingMode};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration.
    Show,
    /// Print the endpoint URLs resolved from the effective configuration.
    Endpoints,
}

pub fn run(command: ConfigCommand, api_url_override: Option<String>) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
        ConfigCommand::Endpoints => run_endpoints(api_url_override),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring tiqfix.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "API base URL (e.g., https://api.example.com)",
        &mut cfg.api_base_url,
    )?;
    apply_prompt("Routing (auto/ports/gateway)", &mut cfg.routing)?;
    if let Some(routing) = &cfg.routing {
        routing.parse::<RoutingMode>()?;
    }
    apply_port_prompt("Auth service port", &mut cfg.auth_port)?;
    apply_port_prompt("Catalog service port", &mut cfg.catalog_port)?;
    apply_port_prompt("Tickets service port", &mut cfg.tickets_port)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("API base URL: {}", display_value(&cfg.api_base_url));
    println!("Routing: {}", display_value(&cfg.routing));
    println!("Auth port: {}", display_port(cfg.auth_port));
    println!("Catalog port: {}", display_port(cfg.catalog_port));
    println!("Tickets port: {}", display_port(cfg.tickets_port));

    Ok(())
}

fn run_endpoints(api_url_override: Option<String>) -> AppResult<()> {
    let config = AppConfig::load(api_url_override)?;
    let options = config.resolver_options();
    let endpoints = Endpoints::resolve(&options, &config.ports)?;

    println!("Base URL: {}", config.api_base_url);
    println!(
        "Routing: {} ({})",
        config.routing.as_str(),
        if options.local { "per-service ports" } else { "gateway" }
    );
    for capability in Capability::ALL {
        println!("{:<8} {}", capability.as_str(), endpoints.capability(capability));
    }
    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_port_prompt(field: &str, target: &mut Option<u16>) -> AppResult<()> {
    let current = target.map(|port| port.to_string());
    match prompt(field, current.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => {
            let port = value
                .parse::<u16>()
                .map_err(|_| AppError::Configuration(format!("invalid port '{value}'")))?;
            *target = Some(port);
        }
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn display_port(port: Option<u16>) -> String {
    port.map(|port| port.to_string())
        .unwrap_or_else(|| "<default>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_answers() {
        assert_eq!(PromptAction::parse("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::parse(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::parse("https://api.example.com\n"),
            PromptAction::Set("https://api.example.com".to_string())
        );
    }

    #[test]
    fn displays_unset_values() {
        assert_eq!(display_value(&None), "<not set>");
        assert_eq!(display_value(&Some(String::new())), "<not set>");
        assert_eq!(display_port(None), "<default>");
        assert_eq!(display_port(Some(8003)), "8003");
    }
}
