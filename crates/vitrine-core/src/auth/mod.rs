//! Authentication module: credential persistence, request authorization,
//! session state, and route guarding.
//!
//! This module provides:
//! - `CredentialStore`: durable storage for the single bearer credential
//! - `AuthInterceptor`: attaches the credential to outbound requests
//! - `SessionController`: owns the observable `SessionState` and its transitions
//! - `RouteGuard`: decides whether a protected view may render

pub mod credentials;
pub mod guard;
pub mod interceptor;
pub mod session;

pub use credentials::{
    open_store, Credential, CredentialStore, FileCredentialStore, KeyringCredentialStore,
    MemoryCredentialStore,
};
pub use guard::{GuardDecision, RouteGuard};
pub use interceptor::AuthInterceptor;
pub use session::{SessionController, SessionError, SessionPhase, SessionState};
