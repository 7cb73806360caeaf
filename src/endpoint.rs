use std::str::FromStr;

use reqwest::Url;

use crate::error::{AppError, AppResult};

/// One backend responsibility area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Auth,
    Catalog,
    Tickets,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::Auth, Capability::Catalog, Capability::Tickets];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Auth => "auth",
            Capability::Catalog => "catalog",
            Capability::Tickets => "tickets",
        }
    }

    pub fn path_prefix(&self) -> &'static str {
        match self {
            Capability::Auth => "/auth",
            Capability::Catalog => "/catalog",
            Capability::Tickets => "/tickets",
        }
    }
}

/// How capabilities are addressed relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// Per-service ports when the base URL points at localhost, gateway paths otherwise.
    #[default]
    Auto,
    /// Per-service ports in every environment.
    Ports,
    /// Single gateway multiplexing capabilities by path.
    Gateway,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Auto => "auto",
            RoutingMode::Ports => "ports",
            RoutingMode::Gateway => "gateway",
        }
    }
}

impl FromStr for RoutingMode {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Ok(RoutingMode::Auto),
            "ports" | "local" => Ok(RoutingMode::Ports),
            "gateway" => Ok(RoutingMode::Gateway),
            _ => Err(AppError::Configuration(format!(
                "unknown routing mode '{value}' (expected auto, ports or gateway)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePorts {
    pub auth: u16,
    pub catalog: u16,
    pub tickets: u16,
}

impl Default for ServicePorts {
    fn default() -> Self {
        Self {
            auth: 8001,
            catalog: 8002,
            tickets: 8003,
        }
    }
}

impl ServicePorts {
    pub fn port_for(&self, capability: Capability) -> u16 {
        match capability {
            Capability::Auth => self.auth,
            Capability::Catalog => self.catalog,
            Capability::Tickets => self.tickets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub local: bool,
    pub base_url: String,
}

impl ResolverOptions {
    pub fn new(base_url: &str, routing: &RoutingMode) -> Self {
        let local = match routing {
            RoutingMode::Auto => base_url.contains("localhost"),
            RoutingMode::Ports => true,
            RoutingMode::Gateway => false,
        };
        Self {
            local,
            base_url: base_url.to_string(),
        }
    }
}

/// Absolute URLs for every backend operation, computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    auth: String,
    catalog: String,
    tickets: String,
}

impl Endpoints {
    pub fn resolve(options: &ResolverOptions, ports: &ServicePorts) -> AppResult<Self> {
        let base = parse_base_url(&options.base_url)?;
        let root = |capability: Capability| -> AppResult<String> {
            let mut url = base.clone();
            if options.local {
                url.set_port(Some(ports.port_for(capability))).map_err(|_| {
                    AppError::Configuration(format!(
                        "cannot assign a port to base URL {}",
                        options.base_url
                    ))
                })?;
            }
            Ok(format!(
                "{}{}",
                url.as_str().trim_end_matches('/'),
                capability.path_prefix()
            ))
        };

        Ok(Self {
            auth: root(Capability::Auth)?,
            catalog: root(Capability::Catalog)?,
            tickets: root(Capability::Tickets)?,
        })
    }

    pub fn capability(&self, capability: Capability) -> &str {
        match capability {
            Capability::Auth => &self.auth,
            Capability::Catalog => &self.catalog,
            Capability::Tickets => &self.tickets,
        }
    }

    pub fn login(&self) -> String {
        format!("{}/login", self.auth)
    }

    pub fn register(&self) -> String {
        format!("{}/register", self.auth)
    }

    pub fn categories(&self) -> String {
        format!("{}/categories", self.catalog)
    }

    pub fn category(&self, pk: &str) -> AppResult<Url> {
        let mut url = parse_endpoint(&self.categories())?;
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration("catalog URL cannot carry a path".to_string()))?
            .push(pk);
        Ok(url)
    }

    pub fn tickets_for(&self, user_email: &str) -> AppResult<Url> {
        scoped(&format!("{}/", self.tickets), user_email)
    }

    pub fn ticket_upload_for(&self, user_email: &str) -> AppResult<Url> {
        scoped(&format!("{}/upload", self.tickets), user_email)
    }
}

fn scoped(endpoint: &str, user_email: &str) -> AppResult<Url> {
    let mut url = parse_endpoint(endpoint)?;
    url.query_pairs_mut().append_pair("user_email", user_email);
    Ok(url)
}

fn parse_endpoint(endpoint: &str) -> AppResult<Url> {
    Url::parse(endpoint)
        .map_err(|err| AppError::Configuration(format!("invalid endpoint {endpoint}: {err}")))
}

fn parse_base_url(base_url: &str) -> AppResult<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(AppError::Configuration(
            "API base URL must not be empty".to_string(),
        ));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| AppError::Configuration(format!("invalid API base URL {trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Configuration(format!(
            "unsupported API base URL scheme '{}'",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(AppError::Configuration(format!(
            "API base URL {trimmed} must not carry a query or fragment"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(base_url: &str, routing: RoutingMode) -> Endpoints {
        let options = ResolverOptions::new(base_url, &routing);
        Endpoints::resolve(&options, &ServicePorts::default()).unwrap()
    }

    #[test]
    fn local_base_uses_per_service_ports() {
        let endpoints = endpoints("http://localhost", RoutingMode::Auto);
        assert_eq!(
            endpoints.capability(Capability::Tickets),
            "http://localhost:8003/tickets"
        );
        assert_eq!(endpoints.login(), "http://localhost:8001/auth/login");
        assert_eq!(
            endpoints.categories(),
            "http://localhost:8002/catalog/categories"
        );
    }

    #[test]
    fn production_base_uses_gateway_paths() {
        let endpoints = endpoints("https://api.example.com", RoutingMode::Auto);
        assert_eq!(
            endpoints.capability(Capability::Tickets),
            "https://api.example.com/tickets"
        );
        assert_eq!(endpoints.register(), "https://api.example.com/auth/register");
    }

    #[test]
    fn explicit_routing_overrides_host_detection() {
        let ports = endpoints("https://api.example.com/", RoutingMode::Ports);
        assert_eq!(
            ports.capability(Capability::Catalog),
            "https://api.example.com:8002/catalog"
        );

        let gateway = endpoints("http://localhost:8000", RoutingMode::Gateway);
        assert_eq!(
            gateway.capability(Capability::Auth),
            "http://localhost:8000/auth"
        );
    }

    #[test]
    fn local_port_replaces_existing_port() {
        let endpoints = endpoints("http://localhost:3000", RoutingMode::Auto);
        assert_eq!(
            endpoints.capability(Capability::Auth),
            "http://localhost:8001/auth"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let endpoints = endpoints("https://example.com/api/", RoutingMode::Gateway);
        assert_eq!(
            endpoints.categories(),
            "https://example.com/api/catalog/categories"
        );
    }

    #[test]
    fn builds_scoped_ticket_urls() {
        let endpoints = endpoints("http://localhost", RoutingMode::Auto);
        assert_eq!(
            endpoints.tickets_for("ana+qa@example.com").unwrap().as_str(),
            "http://localhost:8003/tickets/?user_email=ana%2Bqa%40example.com"
        );
        assert_eq!(
            endpoints.ticket_upload_for("ana@example.com").unwrap().as_str(),
            "http://localhost:8003/tickets/upload?user_email=ana%40example.com"
        );
    }

    #[test]
    fn category_url_escapes_key() {
        let endpoints = endpoints("https://api.example.com", RoutingMode::Auto);
        assert_eq!(
            endpoints.category("hardware").unwrap().as_str(),
            "https://api.example.com/catalog/categories/hardware"
        );
        assert_eq!(
            endpoints.category("a b").unwrap().as_str(),
            "https://api.example.com/catalog/categories/a%20b"
        );
    }

    #[test]
    fn rejects_invalid_base_urls() {
        let ports = ServicePorts::default();
        for base in [
            "",
            "not a url",
            "ftp://localhost",
            "https://api.example.com/?env=prod",
            "https://api.example.com/#top",
        ] {
            let options = ResolverOptions::new(base, &RoutingMode::Auto);
            assert!(matches!(
                Endpoints::resolve(&options, &ports),
                Err(AppError::Configuration(_))
            ));
        }
    }

    #[test]
    fn parses_routing_mode() {
        assert_eq!("Gateway".parse::<RoutingMode>().unwrap(), RoutingMode::Gateway);
        assert_eq!("ports".parse::<RoutingMode>().unwrap(), RoutingMode::Ports);
        assert_eq!("local".parse::<RoutingMode>().unwrap(), RoutingMode::Ports);
        assert_eq!(" auto ".parse::<RoutingMode>().unwrap(), RoutingMode::Auto);
        assert!(matches!(
            "mesh".parse::<RoutingMode>(),
            Err(AppError::Configuration(_))
        ));
    }
}
