pub mod api_client;
pub mod config;
pub mod logging;
pub mod models;
pub mod poller;
pub mod session_state;
