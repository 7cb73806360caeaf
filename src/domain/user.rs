use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";

/// Payload accepted by the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Checks the form locally and drops the confirmation field.
    pub fn validate(self) -> AppResult<Registration> {
        require("firstname", &self.firstname)?;
        require("lastname", &self.lastname)?;
        require("email", &self.email)?;
        require("password", &self.password)?;

        if self.password != self.confirm_password {
            return Err(AppError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        let phone = self.phone.trim();
        Ok(Registration {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> AppResult<Self> {
        require("email", email)?;
        require("password", password)?;
        Ok(Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}
