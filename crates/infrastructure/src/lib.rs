//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the speech client,
//! text-to-speech, the recommendation webhook and local file storage.
//! Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, BatchAppConfig, LogFormat, LoggingConfig, RecommenderConfig, ServerConfig,
    apply_speech_env,
};
pub use telemetry::{TelemetryError, init_logging};
