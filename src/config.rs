use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::endpoint::{ResolverOptions, RoutingMode, ServicePorts};
use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost";

const CONFIG_FILE_NAME: &str = "config.json";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub routing: RoutingMode,
    pub ports: ServicePorts,
    pub config_dir: PathBuf,
}

/// Values read from the process environment (after `.env` is applied).
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_base_url: Option<String>,
    pub routing: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_base_url: non_empty_var("TIQFIX_API_BASE_URL"),
            routing: non_empty_var("TIQFIX_ROUTING"),
        }
    }
}

impl AppConfig {
    pub fn load(api_url_override: Option<String>) -> AppResult<Self> {
        let config_dir = config_directory()?;
        let stored = StoredConfig::load()?;
        Self::from_sources(stored, EnvOverrides::from_env(), api_url_override, config_dir)
    }

    /// Merges defaults, the stored file, the environment and the CLI flag, later wins.
    pub fn from_sources(
        stored: StoredConfig,
        env: EnvOverrides,
        api_url_override: Option<String>,
        config_dir: PathBuf,
    ) -> AppResult<Self> {
        let api_base_url = api_url_override
            .or(env.api_base_url)
            .or(stored.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let routing = match env.routing.or(stored.routing) {
            Some(value) => value.parse::<RoutingMode>()?,
            None => RoutingMode::Auto,
        };

        let defaults = ServicePorts::default();
        let ports = ServicePorts {
            auth: stored.auth_port.unwrap_or(defaults.auth),
            catalog: stored.catalog_port.unwrap_or(defaults.catalog),
            tickets: stored.tickets_port.unwrap_or(defaults.tickets),
        };

        Ok(Self {
            api_base_url,
            routing,
            ports,
            config_dir,
        })
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions::new(&self.api_base_url, &self.routing)
    }

    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE_NAME)
    }
}

/// Settings persisted by `tiqfix config init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub routing: Option<String>,
    #[serde(default)]
    pub auth_port: Option<u16>,
    #[serde(default)]
    pub catalog_port: Option<u16>,
    #[serde(default)]
    pub tickets_port: Option<u16>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    if let Some(dir) = non_empty_var("TIQFIX_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = non_empty_var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(dir).join("tiqfix"));
    }
    non_empty_var("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("tiqfix"))
        .ok_or_else(|| {
            AppError::Configuration(
                "cannot locate a config directory; set TIQFIX_CONFIG_DIR".to_string(),
            )
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
