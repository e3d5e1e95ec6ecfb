//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the provisioning service.

pub mod auth;
pub(crate) mod handlers;
mod rate_limit;
mod server;

pub use auth::Caller;
pub use handlers::{ApiError, AppState};
pub use rate_limit::RateLimiterState;
pub use server::HttpServer;
