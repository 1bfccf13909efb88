pub mod ai_client;
pub mod auth_service;
pub mod metrics_service;
pub mod property_service;
