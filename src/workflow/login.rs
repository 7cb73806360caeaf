use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::session::Session;
use crate::domain::user::Credentials;
use crate::error::AppResult;

/// Authenticates and publishes the new session on success.
pub async fn login(ctx: &AppContext, credentials: Credentials) -> AppResult<Arc<Session>> {
    let email = credentials.email.clone();
    let token = ctx.auth.login(credentials).await?;

    ctx.session
        .login(Session::new(&email, &token.access_token, &token.token_type));
    tracing::info!(%email, "logged in");

    ctx.session.require()
}

/// Drops the current session, returning it if there was one.
pub fn logout(ctx: &AppContext) -> Option<Arc<Session>> {
    let previous = ctx.session.logout();
    if let Some(session) = &previous {
        tracing::info!(email = %session.email, "logged out");
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::TokenResponse;
    use crate::error::{ApiError, ErrorKind};
    use crate::services::{MockAuthService, MockCatalogService, MockTicketService};

    fn context(auth: MockAuthService) -> AppContext {
        AppContext::for_tests(auth, MockCatalogService::new(), MockTicketService::new(), None)
    }

    #[tokio::test]
    async fn successful_login_publishes_session() {
        let mut auth = MockAuthService::new();
        auth.expect_login().times(1).returning(|_| {
            Ok(TokenResponse {
                access_token: "tok-1".to_string(),
                token_type: "bearer".to_string(),
            })
        });
        let ctx = context(auth);
        let mut updates = ctx.session.subscribe();

        let session = login(&ctx, Credentials::new("ana@example.com", "pw").unwrap())
            .await
            .unwrap();

        assert_eq!(session.email, "ana@example.com");
        assert_eq!(session.access_token, "tok-1");
        assert!(updates.has_changed().unwrap());
        assert_eq!(
            updates.borrow_and_update().as_ref().map(|s| s.email.clone()),
            Some("ana@example.com".to_string())
        );

        let previous = logout(&ctx).unwrap();
        assert_eq!(previous.email, "ana@example.com");
        assert!(ctx.session.snapshot().is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_empty() {
        let mut auth = MockAuthService::new();
        auth.expect_login()
            .times(1)
            .returning(|_| Err(ApiError::new(ErrorKind::Unauthorized, "Credenciales inválidas")));
        let ctx = context(auth);

        let error = login(&ctx, Credentials::new("ana@example.com", "bad").unwrap())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Credenciales inválidas");
        assert!(ctx.session.snapshot().is_none());
    }
}
