//! Data access for the dashboard. Route handlers and the activation flow work
//! with these functions instead of building queries themselves.

pub mod config_service;
pub mod credential_service;
pub mod history_service;
pub mod user_service;

pub use config_service::*;
pub use credential_service::*;
pub use history_service::*;
pub use user_service::*;
