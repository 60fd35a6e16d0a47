//! Core library for vitrine, the storefront and back-office client.
//!
//! The interesting part lives in [`auth`]: how the bearer credential is
//! persisted, attached to outbound calls, resolved into a user identity at
//! startup, and used to admit or deny access to protected views.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, RemoteApi};
pub use auth::{
    Credential, CredentialStore, GuardDecision, RouteGuard, SessionController, SessionError,
    SessionPhase, SessionState,
};
pub use config::Config;
