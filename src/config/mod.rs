//! Configuration module
//!
//! Resolution of the three backend base addresses consumed by the
//! API client.

pub mod config;

pub use config::AppConfig;
