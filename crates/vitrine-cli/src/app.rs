//! Application wiring for the vitrine CLI.
//!
//! `App` owns the configuration, the shared credential store, the API client,
//! and the session controller. Startup reconciliation runs in the background
//! while a command starts; protected views consult the route guard and wait
//! out the pending state instead of redirecting early.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use vitrine_core::api::{ApiClient, ApiError};
use vitrine_core::auth::{open_store, GuardDecision, RouteGuard, SessionController, SessionError};
use vitrine_core::config::Config;
use vitrine_core::models::{LoginRequest, ProductQuery, UserIdentity};

use crate::routes::Route;
use crate::views;

pub struct App {
    pub config: Config,
    api: ApiClient,
    session: Arc<SessionController>,
    guard: RouteGuard,
    startup: Option<JoinHandle<()>>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let store = open_store(&config).context("Failed to open credential store")?;
        let api = ApiClient::new(&config, store.clone()).context("Failed to build API client")?;
        let session = Arc::new(SessionController::new(Arc::new(api.clone()), store));
        debug!(api = %api.base_url(), "App created");

        Ok(Self {
            config,
            api,
            session,
            guard: RouteGuard::default(),
            startup: None,
        })
    }

    /// Kick off the one-time startup check without blocking the caller
    pub fn start(&mut self) {
        let session = self.session.clone();
        self.startup = Some(tokio::spawn(async move {
            if let Err(e) = session.initialize().await {
                warn!(error = %e, "Session initialization skipped");
            }
        }));
    }

    /// Wait for the background startup check, if one is running
    pub async fn finish_startup(&mut self) {
        if let Some(handle) = self.startup.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Session initialization task failed");
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub async fn current_user(&self) -> Option<UserIdentity> {
        self.session.wait_until_initialized().await.identity
    }

    /// Log in with the given identifier and secret, remembering the identifier
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<UserIdentity> {
        if let Some(user) = self.current_user().await {
            info!(user = %user.display_name(), "Replacing existing session");
        }

        let request = LoginRequest::new(identifier.trim(), secret);
        match self.session.login(&request).await {
            Ok(identity) => {
                self.config.last_identifier = Some(request.identifier.clone());
                if let Err(e) = Config::remember_identifier(&request.identifier) {
                    warn!(error = %e, "Failed to save config");
                }
                Ok(identity)
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                Err(anyhow::anyhow!(Self::login_error_message(&e)))
            }
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        // Let the startup check settle so its outcome is logged before the session ends
        self.finish_startup().await;
        self.session.logout().context("Failed to clear stored credential")
    }

    /// User-facing text for a failed login. Server messages pass through unchanged.
    pub fn login_error_message(err: &SessionError) -> String {
        match err {
            SessionError::Api(ApiError::Rejected { message, .. }) => message.clone(),
            SessionError::Api(ApiError::Unauthorized) => "Invalid email or password".to_string(),
            SessionError::Api(ApiError::NetworkError(e)) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            SessionError::Api(ApiError::NetworkError(e)) if e.is_connect() => {
                "Unable to connect to server. Check your connection.".to_string()
            }
            SessionError::MissingCredentials => err.to_string(),
            other => format!("Login failed: {}", other),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Navigate to `path`, applying the route guard to protected views.
    /// The pending indicator goes to `notice` while the startup check runs.
    pub async fn open(&self, path: &str, notice: &mut impl Write) -> Result<String> {
        let route = Route::from_path(path)
            .ok_or_else(|| anyhow::anyhow!("Unknown page: {}", path))?;

        let mut rx = self.session.subscribe();
        let initial = self.guard.check(route.path(), &rx.borrow());
        if initial == GuardDecision::Pending {
            writeln!(notice, "{}", views::pending())?;
            notice.flush()?;
        }

        match self.guard.settle(route.path(), &mut rx).await {
            GuardDecision::Render => self.render(route).await,
            GuardDecision::Redirect { to } => {
                info!(from = route.path(), to = %to, "Redirecting anonymous visitor");
                Ok(format!("Redirecionando para {}\n{}", to, views::login_hint()))
            }
            GuardDecision::Pending => Ok(views::pending()),
        }
    }

    async fn render(&self, route: Route) -> Result<String> {
        let body = match route {
            Route::Home => views::home(),
            Route::Products => views::products(&self.api.fetch_products(&ProductQuery::default()).await?),
            Route::Login => views::login_hint(),
            Route::Dashboard => views::dashboard(&self.api.fetch_dashboard_summary().await?),
            Route::AdminProducts | Route::AdminSales | Route::AdminCustomers | Route::AdminFinance => {
                views::placeholder(route)
            }
        };
        Ok(body)
    }

    pub async fn products(&self, query: &ProductQuery) -> Result<String> {
        let page = self
            .api
            .fetch_products(query)
            .await
            .context("Failed to fetch products")?;
        Ok(views::products(&page))
    }
}
