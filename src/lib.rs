pub mod analytics;
pub mod api_client;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod forecast;
pub mod machines;
pub mod prediction_model;
pub mod push_channel;
pub mod refill_requests;
pub mod session;
