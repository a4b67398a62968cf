pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod logging;
pub mod store;
pub mod vault;

#[cfg(feature = "audit-log")]
pub mod audit;
