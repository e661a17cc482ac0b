//! HTTP layer for the dashboard
//!
//! Serves the embedded dashboard page and a small JSON API over the
//! hierarchy, report and analytics services.

pub mod handler;
pub mod server;

pub use server::{build_router, AppState, HttpServer, ServerConfig, ServerError};
