//! Attaches the stored credential to outbound API requests.

use std::sync::Arc;

use reqwest::{header, RequestBuilder};
use tracing::warn;

use super::credentials::{Credential, CredentialStore};
use crate::api::ApiError;

/// Stateless request transform: reads the store on every call, never writes it.
#[derive(Clone)]
pub struct AuthInterceptor {
    store: Arc<dyn CredentialStore>,
}

impl AuthInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Headers for the next request: `Authorization: Bearer <credential>` when
    /// a credential is stored, empty otherwise.
    pub fn headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(credential) = self.current_credential() {
            headers.insert(header::AUTHORIZATION, Self::bearer_value(&credential)?);
        }
        Ok(headers)
    }

    /// Apply the transform to a request about to be sent
    pub fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(request.headers(self.headers()?))
    }

    fn current_credential(&self) -> Option<Credential> {
        // An unreadable store is treated like an empty one: the request goes out
        // unauthenticated and the server decides.
        match self.store.get() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to read credential store, sending request unauthenticated");
                None
            }
        }
    }

    fn bearer_value(credential: &Credential) -> Result<header::HeaderValue, ApiError> {
        let mut value = header::HeaderValue::from_str(&format!("Bearer {}", credential.as_str()))
            .map_err(|_| ApiError::InvalidCredential)?;
        value.set_sensitive(true);
        Ok(value)
    }
}
