//! REST API client module for the storefront backend.
//!
//! This module provides the `ApiClient` for communicating with the backend
//! and the `RemoteApi` trait the session controller is written against.
//!
//! Every request passes through the `AuthInterceptor`, which attaches the
//! stored bearer credential when one exists.

pub mod client;
pub mod error;

pub use client::{ApiClient, RemoteApi};
pub use error::ApiError;
pub use reqwest::StatusCode;
