//! Parley HTTP presentation layer
//!
//! Serves `/health`, `/transcribe` and `/transcribe-blob` on top of the
//! transcription service.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{build_app, cors_layer, create_router};
pub use state::AppState;
