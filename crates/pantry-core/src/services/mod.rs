//! Core services - the request orchestration layer.
//!
//! Each service is a stateless orchestrator over ports: it validates input,
//! sequences external calls, records lifecycle telemetry and flattens
//! failures into [`crate::error::RequestError`]. Services never know about
//! concrete provider implementations.

mod analysis;
mod directory;
mod entitlements;
mod functions;
mod notifications;

pub use analysis::AnalysisPipeline;
pub use directory::DirectoryService;
pub use entitlements::EntitlementResolver;
pub use functions::{FunctionsConfig, PantryFunctions};
pub use notifications::NotificationDispatcher;
