use std::sync::{Arc, Mutex};

use axum::Router;

use crate::endpoint::{Endpoints, ResolverOptions, RoutingMode, ServicePorts};
use crate::infra::http::ApiClient;
use crate::session::SessionContext;

/// Requests observed by a test backend, as `METHOD path?query`.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Serves `router` on an ephemeral port and returns gateway-style endpoints for it.
pub async fn spawn(router: Router) -> Endpoints {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let options = ResolverOptions::new(&format!("http://{address}"), &RoutingMode::Gateway);
    Endpoints::resolve(&options, &ServicePorts::default()).unwrap()
}

/// Endpoints pointing at a port nothing listens on.
pub fn unreachable() -> Endpoints {
    let options = ResolverOptions::new("http://127.0.0.1:9", &RoutingMode::Gateway);
    Endpoints::resolve(&options, &ServicePorts::default()).unwrap()
}

/// Client that talks to the local test backend directly, ignoring proxy settings.
pub fn api(session: SessionContext) -> ApiClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    ApiClient::with_client(http, session)
}
