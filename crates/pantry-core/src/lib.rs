#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use domain::{
    ContentItem, DirectoryEntry, Identity, ImageAnalysisParams, ImageAnalysisRequest,
    ImageAnalysisResult, ImageData, ImageMediaType, NO_DISPLAY_NAME, NotificationRequest,
    PresentationHints, RecipientId, SPOKEN_ANSWER_PREFIX,
};
pub use error::{OperationFailure, RequestError};
pub use ports::{
    ContentStore, IdentityProvider, NoopTelemetry, ProviderError, Providers, PurchaseRecords,
    PushDelivery, SpeechModel, TelemetryCollector, TelemetrySink, VisionModel,
};
pub use services::{
    AnalysisPipeline, DirectoryService, EntitlementResolver, FunctionsConfig,
    NotificationDispatcher, PantryFunctions,
};
pub use telemetry::{
    EventSource, Operation, Severity, TelemetryEvent, TelemetryQueue, TracingCollector,
};
