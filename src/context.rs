use std::sync::Arc;

use crate::config::AppConfig;
use crate::endpoint::Endpoints;
use crate::error::AppResult;
use crate::infra::auth::AuthClient;
use crate::infra::catalog::CatalogClient;
use crate::infra::http::ApiClient;
use crate::infra::tickets::TicketClient;
use crate::services::{AuthService, CatalogService, TicketService};
use crate::session::{SessionContext, SessionStore};

/// Everything a workflow needs, passed explicitly.
///
/// Endpoints are resolved once in [`AppContext::connect`] and owned by the adapters.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: SessionContext,
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
    pub tickets: Arc<dyn TicketService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        session: SessionContext,
        auth: Arc<dyn AuthService>,
        catalog: Arc<dyn CatalogService>,
        tickets: Arc<dyn TicketService>,
    ) -> Self {
        Self {
            config,
            session,
            auth,
            catalog,
            tickets,
        }
    }

    /// Resolves endpoints once, restores any stored session and wires the HTTP adapters.
    pub fn connect(config: AppConfig) -> AppResult<Self> {
        let endpoints = Endpoints::resolve(&config.resolver_options(), &config.ports)?;
        tracing::debug!(
            base_url = %config.api_base_url,
            routing = config.routing.as_str(),
            "resolved endpoints"
        );

        let session = SessionContext::new(SessionStore::new(config.session_file()).load()?);
        let api = ApiClient::new(session.clone());

        Ok(Self::new(
            config,
            session,
            Arc::new(AuthClient::new(api.clone(), endpoints.clone())),
            Arc::new(CatalogClient::new(api.clone(), endpoints.clone())),
            Arc::new(TicketClient::new(api, endpoints)),
        ))
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.config.session_file())
    }
}

#[cfg(test)]
impl AppContext {
    pub fn for_tests(
        auth: impl AuthService + 'static,
        catalog: impl CatalogService + 'static,
        tickets: impl TicketService + 'static,
        session: Option<crate::domain::session::Session>,
    ) -> Self {
        use crate::config::{EnvOverrides, StoredConfig};

        let config = AppConfig::from_sources(
            StoredConfig::default(),
            EnvOverrides::default(),
            None,
            std::env::temp_dir().join("tiqfix-context-tests"),
        )
        .unwrap();
        Self::new(
            config,
            SessionContext::new(session),
            Arc::new(auth),
            Arc::new(catalog),
            Arc::new(tickets),
        )
    }
}
