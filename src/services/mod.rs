pub mod ad_service;
pub mod auth_service;
pub mod user_service;
