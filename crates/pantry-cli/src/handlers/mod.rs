//! Command handlers.
//!
//! Handlers are thin: read configuration, call into `pantry-axum`, and
//! format output for the terminal.

pub mod config;
pub mod serve;
