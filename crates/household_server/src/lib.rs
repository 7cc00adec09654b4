//! HTTP transport for the household API.
//!
//! Owns process configuration and the axum route table; all domain behavior
//! is delegated to `household_core`.

pub mod config;
pub mod routes;

pub use config::ServerConfig;
pub use routes::{router, AppState};
