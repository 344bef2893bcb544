pub mod activation_service;
pub mod auth_service;
pub mod broker_service;
pub mod encryption_service;
pub mod plan_service;
