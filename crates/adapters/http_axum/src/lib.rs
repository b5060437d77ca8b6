//! # meshbridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON admin API** (`/api/devices`, `/api/stats`)
//! - Map HTTP requests into bridge calls (driving adapter)
//! - Map bridge results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `meshbridge-app` (for port traits and the bridge) and
//! `meshbridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
