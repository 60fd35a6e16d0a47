//! Data models for the storefront API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `UserIdentity`, `LoginRequest`, `LoginResponse`: authentication payloads
//! - `Product`, `ProductPage`, `ProductQuery`: public product listing
//! - `DashboardSummary`: back-office metrics

pub mod dashboard;
pub mod product;
pub mod user;

pub use dashboard::DashboardSummary;
pub use product::{Category, Product, ProductOrder, ProductPage, ProductQuery};
pub use user::{LoginRequest, LoginResponse, UserIdentity};
