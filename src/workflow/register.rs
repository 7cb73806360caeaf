use serde_json::Value;

use crate::context::AppContext;
use crate::domain::user::RegistrationForm;
use crate::error::AppResult;

/// Validates locally, then creates the account. Nothing is sent when validation fails.
pub async fn register(ctx: &AppContext, form: RegistrationForm) -> AppResult<Value> {
    let registration = form.validate()?;
    tracing::info!(email = %registration.email, "registering account");
    let created = ctx.auth.register(registration).await?;
    Ok(created)
}
