pub mod auth;
pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod i18n;
pub mod merge;
pub mod progress;
pub mod security;
pub mod server;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod workflow;
