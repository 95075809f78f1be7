pub mod analytics;
pub mod api;
pub mod config;
pub mod formatter;
pub mod models;
