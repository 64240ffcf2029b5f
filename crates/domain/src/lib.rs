//! Domain layer for Parley
//!
//! Contains the dialogue corpus model, transcript value types, language codes
//! and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
