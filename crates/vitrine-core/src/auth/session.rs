//! Session state and its transitions.
//!
//! `SessionController` is the only writer of `SessionState`. State is published
//! through a `tokio::sync::watch` channel so views and the route guard can
//! re-evaluate on every change. Three operations mutate it:
//!
//! - `initialize()`: run once at startup; resolves a stored credential into an
//!   identity, or discards the credential if the server rejects it.
//! - `login()`: exchanges a login form for a credential and identity.
//! - `logout()`: drops both.
//!
//! `login()` and `logout()` advance an epoch when they commit. Asynchronous
//! operations remember the epoch they started in and only commit if it is
//! unchanged when the remote call settles, so a `logout()` issued during an
//! in-flight login always wins. The startup check never advances the epoch:
//! it yields to a newer session but cannot cancel a login. Logins are
//! serialized and commit in call order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::credentials::CredentialStore;
use crate::api::{ApiError, RemoteApi};
use crate::models::{LoginRequest, UserIdentity};

#[derive(Error, Debug)]
pub enum SessionError {
    /// Remote failure; rejection messages display verbatim
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Failed to persist credential: {0:#}")]
    Storage(anyhow::Error),

    #[error("Login was superseded by a later session change")]
    Superseded,

    #[error("Session has already been initialized")]
    AlreadyInitialized,
}

/// Snapshot of the session as observers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<UserIdentity>,
    /// True only until the startup resolution settles. Never set again.
    pub initializing: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            initializing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Authenticated,
    Anonymous,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.initializing {
            SessionPhase::Uninitialized
        } else if self.identity.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }
}

pub struct SessionController {
    api: Arc<dyn RemoteApi>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionState>,
    started: AtomicBool,
    epoch: Mutex<u64>,
    login_lock: tokio::sync::Mutex<()>,
}

impl SessionController {
    pub fn new(api: Arc<dyn RemoteApi>, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            store,
            state,
            started: AtomicBool::new(false),
            epoch: Mutex::new(0),
            login_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    /// Receiver notified on every committed transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolves once the startup check has settled.
    pub async fn wait_until_initialized(&self) -> SessionState {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this only fails during teardown
        let settled = rx.wait_for(|s| !s.initializing).await.map(|s| (*s).clone());
        settled.unwrap_or_else(|_| self.state())
    }

    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        // The epoch is a plain counter; a poisoned lock still holds a valid value
        self.epoch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reconcile the stored credential with the server. Runs at most once per
    /// controller; resolution failures are absorbed and leave the session anonymous.
    pub async fn initialize(&self) -> Result<(), SessionError> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("initialize() called more than once");
            return Err(SessionError::AlreadyInitialized);
        }

        let seen = *self.lock_epoch();

        let stored = match self.store.get() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read credential store, starting anonymous");
                None
            }
        };

        if stored.is_none() {
            debug!("No stored credential, starting anonymous");
            self.state.send_modify(|s| s.initializing = false);
            return Ok(());
        }

        debug!("Stored credential found, resolving identity");
        let resolved = self.api.current_user().await;

        // Held until the result is published so no login can commit in between
        let epoch = self.lock_epoch();
        if *epoch != seen {
            debug!("Session changed during startup resolution, keeping newer state");
            self.state.send_modify(|s| s.initializing = false);
            return Ok(());
        }

        match resolved {
            Ok(identity) => {
                info!(user = %identity.display_name(), "Session restored");
                self.state.send_modify(|s| {
                    s.identity = Some(identity);
                    s.initializing = false;
                });
            }
            Err(e) => {
                info!(error = %e, auth_rejection = e.is_auth_rejection(), "Stored credential is no longer valid");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear rejected credential");
                }
                self.state.send_modify(|s| {
                    s.identity = None;
                    s.initializing = false;
                });
            }
        }
        Ok(())
    }

    /// Log in with the given form input. On failure nothing changes and the
    /// error is returned for display.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserIdentity, SessionError> {
        if !request.is_complete() {
            return Err(SessionError::MissingCredentials);
        }

        let _serial = self.login_lock.lock().await;
        let seen = *self.lock_epoch();

        debug!(identifier = %request.identifier, "Logging in");
        let response = match self.api.login(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(e.into());
            }
        };

        if response.credential.is_empty() {
            return Err(ApiError::InvalidResponse("Login response carried an empty credential".to_string()).into());
        }

        let mut epoch = self.lock_epoch();
        if *epoch != seen {
            warn!("Session changed while login was in flight, discarding result");
            return Err(SessionError::Superseded);
        }

        // Credential first: identity must never be visible without it
        self.store.set(&response.credential).map_err(SessionError::Storage)?;
        let identity = response.identity;
        self.state.send_modify(|s| s.identity = Some(identity.clone()));
        *epoch += 1;

        info!(user = %identity.display_name(), "Login successful");
        Ok(identity)
    }

    /// Drop the credential and identity. Safe to call without a session.
    /// Identity is cleared even if the store fails to clear.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut epoch = self.lock_epoch();
        let cleared = self.store.clear();
        self.state.send_if_modified(|s| s.identity.take().is_some());
        *epoch += 1;

        match cleared {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear stored credential on logout");
                Err(SessionError::Storage(e))
            }
        }
    }
}
