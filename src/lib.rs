pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;
