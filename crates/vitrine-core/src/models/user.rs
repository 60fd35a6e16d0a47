use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::Credential;

/// Profile of the authenticated user, as returned by `/auth/me` and `/auth/login`.
///
/// Every field is optional: the session layer treats the record as opaque and
/// only cares whether one is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, rename = "nome", alias = "name")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "tipo", alias = "kind")]
    pub kind: Option<String>,
    #[serde(default, rename = "ativo", alias = "active")]
    pub active: Option<bool>,
}

impl UserIdentity {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Name for display, falling back to the email address.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unknown user")
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.kind.as_deref() == Some("admin")
    }
}

/// Login form input, sent as `{"email": ..., "senha": ...}`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "email")]
    pub identifier: String,
    #[serde(rename = "senha")]
    pub secret: String,
}

impl LoginRequest {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.identifier.trim().is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "access_token", alias = "credential")]
    pub credential: Credential,
    #[serde(rename = "usuario", alias = "identity")]
    pub identity: UserIdentity,
}
