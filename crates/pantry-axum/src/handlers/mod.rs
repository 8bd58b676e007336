//! HTTP handlers, one module per callable operation.
//!
//! Handlers only translate between the wire format and `PantryFunctions`;
//! validation, telemetry and error flattening live in the core services.

pub mod analysis;
pub mod directory;
pub mod notifications;
