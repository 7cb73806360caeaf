use base64::prelude::{BASE64_URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn new(email: &str, access_token: &str, token_type: &str) -> Self {
        Self {
            email: email.to_string(),
            access_token: access_token.to_string(),
            token_type: token_type.to_string(),
        }
    }

    /// Local part of the email, used for greetings.
    pub fn display_name(&self) -> &str {
        self.email
            .split('@')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("Usuario")
    }

    /// Expiry read from the token's `exp` claim, when the token is a JWT.
    /// The signature is not verified; the backend stays the authority.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.access_token.split('.').nth(1)?;
        let decoded = BASE64_URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: TokenClaims = serde_json::from_slice(&decoded).ok()?;
        DateTime::from_timestamp(claims.exp?, 0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        let header = BASE64_URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = BASE64_URL_SAFE_NO_PAD.encode(claims);
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn display_name_is_email_local_part() {
        let session = Session::new("ana.perez@example.com", "token", "bearer");
        assert_eq!(session.display_name(), "ana.perez");
        assert_eq!(Session::new("@x", "t", "bearer").display_name(), "Usuario");
    }

    #[test]
    fn reads_expiry_from_jwt() {
        let session = Session::new(
            "ana@example.com",
            &jwt(r#"{"sub":"ana@example.com","exp":1700000000}"#),
            "bearer",
        );
        let expiry = session.expires_at().unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
        assert!(session.is_expired(DateTime::from_timestamp(1_700_000_001, 0).unwrap()));
        assert!(!session.is_expired(DateTime::from_timestamp(1_600_000_000, 0).unwrap()));
    }

    #[test]
    fn opaque_tokens_never_expire_locally() {
        let session = Session::new("ana@example.com", "opaque-token", "bearer");
        assert_eq!(session.expires_at(), None);
        assert!(!session.is_expired(Utc::now()));
    }
}
