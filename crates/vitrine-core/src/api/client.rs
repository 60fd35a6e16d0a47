//! API client for the storefront backend.
//!
//! This module provides the `ApiClient` struct for the login and current-user
//! calls the session layer depends on, plus the product listing and
//! back-office summary endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::{AuthInterceptor, CredentialStore};
use crate::config::Config;
use crate::models::{DashboardSummary, LoginRequest, LoginResponse, ProductPage, ProductQuery, UserIdentity};

/// Remote calls the session controller needs.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET /auth/me`, authorized with the stored credential
    async fn current_user(&self) -> Result<UserIdentity, ApiError>;
}

/// API client for the storefront backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    interceptor: AuthInterceptor,
}

impl ApiClient {
    /// Create a new API client reading credentials from `store`
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            interceptor: AuthInterceptor::new(store),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send one request through the interceptor. No retries: a rejected
    /// response is returned to the caller as-is.
    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::ACCEPT, "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.interceptor.authorize(request)?;

        debug!(%method, url = %url, "Sending request");
        let response = request.send().await.map_err(|e| {
            warn!(%method, url = %url, error = %e, "Request failed to send");
            ApiError::NetworkError(e)
        })?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, query, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    // ===== Storefront =====

    /// Fetch one page of the public product listing
    pub async fn fetch_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let page: ProductPage = self.get("produtos/", &query.to_params()).await?;
        debug!(count = page.products.len(), total = page.total, "Fetched products");
        Ok(page)
    }

    // ===== Back office =====

    /// Fetch the dashboard summary (requires an authenticated session)
    pub async fn fetch_dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.get("dashboard/resumo", &[]).await
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post("auth/login", request).await
    }

    async fn current_user(&self) -> Result<UserIdentity, ApiError> {
        self.get("auth/me", &[]).await
    }
}
