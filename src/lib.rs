//! Easel Library
//!
//! This library exposes the core modules of Easel for use in integration
//! tests and as a library for other applications: room-scoped event logs,
//! the transform registry, and the HTTP API over both.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod transform;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{DrawCommand, FilterRequest, ValidationError, ValidationErrorKind};

// Re-export core components
pub use store::EventLogStore;
pub use transform::{Availability, TransformRegistry, TransformRegistryBuilder};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal};

// Re-export health check types
pub use api::{AppState, BuildInfo, ComponentHealth, HealthResponse, HealthStatus, ReadyResponse};
