use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

const LOG_ENV: &str = "TIQFIX_LOG";

/// Diagnostics go to stderr so command output on stdout stays clean.
pub fn setup_tracing(verbose: bool) -> AppResult<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV)
        .from_env()
        .map_err(|err| AppError::Configuration(format!("invalid {LOG_ENV}: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
