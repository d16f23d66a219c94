//! Library crate for the cricket scoreboard backend, exposing modules for binaries and tests.

mod config;
/// Match store backends and their storage errors.
pub mod dao;
mod dto;
mod error;
/// HTTP and WebSocket routing.
pub mod routes;
/// Business services behind the routes.
pub mod services;
/// Shared application state.
pub mod state;

pub use config::AppConfig;
