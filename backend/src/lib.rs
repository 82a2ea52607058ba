pub mod analysis;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod render;
pub mod sanitize;
