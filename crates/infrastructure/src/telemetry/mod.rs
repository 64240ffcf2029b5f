//! Logging initialization
//!
//! Installs a `tracing` subscriber with an env filter and a text or JSON
//! formatter.

mod logging;

pub use logging::{TelemetryError, init_logging};
