#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warning; used by tests/
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod callable;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{
    AxumContext, CorsConfig, DEFAULT_CALLER_HEADER, ServerConfig, ServiceConfig, bootstrap,
    drain_telemetry, start_server,
};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
